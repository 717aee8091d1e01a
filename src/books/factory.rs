use tracing::info;
use crate::books::repository::BookRepository;
use crate::books::repository::file_book_repository::FileBookRepository;
use crate::books::repository::pg_book_repository::PgBookRepository;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;
use crate::utils::pg::build_pool;

// builds the configured repository and makes sure its backing store exists
pub async fn create_book_repository(config: &Configuration) -> LibraryResult<Box<dyn BookRepository>> {
    let repo: Box<dyn BookRepository> = match config.store {
        RepositoryStore::File => {
            Box::new(FileBookRepository::new(config.data_file.as_str()))
        }
        RepositoryStore::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| LibraryError::validation(
                "postgres store requires a database url", Some("DATABASE_URL".to_string())))?;
            let pool = build_pool(url, config.pool_size).await?;
            Box::new(PgBookRepository::new(pool, config.table_name.as_str()))
        }
    };
    repo.setup().await?;
    info!(store = repo.store_name(), "book repository ready");
    Ok(repo)
}
