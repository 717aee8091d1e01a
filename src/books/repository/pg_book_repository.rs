use async_trait::async_trait;
use tokio_postgres::Row;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::utils::pg::{create_table, PgPool};

// PgBookRepository maps books onto a single table keyed by isbn. Every operation
// checks a connection out of the pool for the duration of one statement.
pub struct PgBookRepository {
    pool: PgPool,
    table_name: String,
}

impl PgBookRepository {
    pub fn new(pool: PgPool, table_name: &str) -> Self {
        Self {
            pool,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for PgBookRepository {
    async fn setup(&self) -> LibraryResult<()> {
        create_table(&self.pool, self.table_name.as_str()).await
    }

    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let conn = self.pool.get().await?;
        let sql = format!("INSERT INTO {} (isbn, title, author) VALUES ($1, $2, $3)", self.table_name);
        conn.execute(sql.as_str(), &[&entity.isbn, &entity.title, &entity.author])
            .await.map(|n| n as usize).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT isbn, title, author FROM {} WHERE isbn = $1", self.table_name);
        match conn.query_opt(sql.as_str(), &[&id]).await? {
            Some(row) => map_to_book(&row),
            None => Err(LibraryError::not_found(format!("book not found for {}", id).as_str())),
        }
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let conn = self.pool.get().await?;
        let sql = format!("DELETE FROM {} WHERE isbn = $1", self.table_name);
        conn.execute(sql.as_str(), &[&id])
            .await.map(|n| n as usize).map_err(LibraryError::from)
    }

    async fn query_all(&self) -> LibraryResult<Vec<BookEntity>> {
        let conn = self.pool.get().await?;
        let sql = format!("SELECT isbn, title, author FROM {}", self.table_name);
        conn.query(sql.as_str(), &[]).await?
            .iter().map(map_to_book).collect()
    }
}

impl BookRepository for PgBookRepository {
    fn store_name(&self) -> &'static str {
        "postgres"
    }
}

fn map_to_book(row: &Row) -> LibraryResult<BookEntity> {
    Ok(BookEntity {
        isbn: row.try_get("isbn")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
    })
}
