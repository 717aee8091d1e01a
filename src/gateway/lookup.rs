use async_trait::async_trait;
use crate::books::dto::BookDto;
use crate::core::library::LibraryResult;

// BookLookup resolves an isbn into bibliographic data from an external catalog.
// Ok(None) means the catalog answered but has no entry for the isbn.
#[async_trait]
pub trait BookLookup: Sync + Send {
    async fn lookup(&self, isbn: &str) -> LibraryResult<Option<BookDto>>;
}
