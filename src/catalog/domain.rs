pub mod service;

use async_trait::async_trait;
use crate::books::dto::BookDto;
use crate::core::library::LibraryResult;

#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn add_book(&self, isbn: &str) -> LibraryResult<BookDto>;
    async fn remove_book(&self, isbn: &str) -> LibraryResult<bool>;
    async fn list_books(&self) -> LibraryResult<Vec<BookDto>>;
    async fn find_book(&self, isbn: &str) -> LibraryResult<Option<BookDto>>;
}
