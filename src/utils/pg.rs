use std::time::Duration;
use bb8::{Pool, RunError};
use bb8_postgres::PostgresConnectionManager;
use tokio_postgres::error::SqlState;
use tokio_postgres::NoTls;
use tracing::info;
use crate::core::library::{LibraryError, LibraryResult};

pub type PgPool = Pool<PostgresConnectionManager<NoTls>>;

// helper method to build a bounded connection pool, connections are checked out
// per operation and returned when the guard drops
pub async fn build_pool(database_url: &str, max_size: u32) -> LibraryResult<PgPool> {
    let manager = PostgresConnectionManager::new_from_stringlike(database_url, NoTls)?;
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_secs(10))
        .build(manager)
        .await?;
    info!(max_size, "postgres pool ready");
    Ok(pool)
}

pub async fn create_table(pool: &PgPool, table_name: &str) -> LibraryResult<()> {
    let conn = pool.get().await?;
    conn.batch_execute(format!(
        "CREATE TABLE IF NOT EXISTS {} (isbn TEXT PRIMARY KEY, title TEXT NOT NULL, author TEXT NOT NULL)",
        table_name).as_str()).await?;
    Ok(())
}

pub async fn delete_table(pool: &PgPool, table_name: &str) -> LibraryResult<()> {
    let conn = pool.get().await?;
    conn.batch_execute(format!("DROP TABLE IF EXISTS {}", table_name).as_str()).await?;
    Ok(())
}

pub(crate) fn is_unique_violation(err: &tokio_postgres::Error) -> bool {
    err.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

impl From<tokio_postgres::Error> for LibraryError {
    fn from(err: tokio_postgres::Error) -> Self {
        if is_unique_violation(&err) {
            return LibraryError::duplicate_key(format!("duplicate key {}", err).as_str());
        }
        let reason = err.code().map(|code| code.code().to_string());
        let retryable = err.is_closed() || reason.as_deref().map(|c| c.starts_with("08")).unwrap_or(false);
        LibraryError::database(format!("postgres database error {}", err).as_str(), reason, retryable)
    }
}

impl From<RunError<tokio_postgres::Error>> for LibraryError {
    fn from(err: RunError<tokio_postgres::Error>) -> Self {
        match err {
            RunError::User(err) => LibraryError::from(err),
            RunError::TimedOut => LibraryError::database(
                "timed out waiting for a pooled postgres connection", Some("TimedOut".to_string()), true),
        }
    }
}
