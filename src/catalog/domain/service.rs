use async_trait::async_trait;
use tracing::{info, warn};
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::lookup::BookLookup;

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
    book_lookup: Box<dyn BookLookup>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(book_repository: Box<dyn BookRepository>,
                      book_lookup: Box<dyn BookLookup>) -> Self {
        Self {
            book_repository,
            book_lookup,
        }
    }
}

fn normalize_isbn(isbn: &str) -> LibraryResult<&str> {
    let isbn = isbn.trim();
    if isbn.is_empty() {
        return Err(LibraryError::validation("isbn cannot be empty", Some("isbn".to_string())));
    }
    Ok(isbn)
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, isbn: &str) -> LibraryResult<BookDto> {
        let isbn = normalize_isbn(isbn)?;
        if self.find_book(isbn).await?.is_some() {
            warn!(isbn, "book already exists");
            return Err(LibraryError::duplicate_key(
                format!("book with isbn {} already exists", isbn).as_str()));
        }
        let book = self.book_lookup.lookup(isbn).await?.ok_or_else(|| {
            warn!(isbn, "no book found upstream");
            LibraryError::not_found(format!("no book found with isbn {}", isbn).as_str())
        })?;
        // a concurrent add that won the race surfaces here as DuplicateKey
        let _ = self.book_repository.create(&BookEntity::from(&book)).await?;
        info!(isbn, "successfully added: {}", book);
        Ok(book)
    }

    async fn remove_book(&self, isbn: &str) -> LibraryResult<bool> {
        let removed = self.book_repository.delete(isbn.trim()).await? > 0;
        if removed {
            info!(isbn, "book removed");
        }
        Ok(removed)
    }

    async fn list_books(&self) -> LibraryResult<Vec<BookDto>> {
        let books = self.book_repository.query_all().await?;
        Ok(books.iter().map(BookDto::from).collect())
    }

    async fn find_book(&self, isbn: &str) -> LibraryResult<Option<BookDto>> {
        match self.book_repository.get(isbn.trim()).await {
            Ok(book) => Ok(Some(BookDto::from(&book))),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            title: other.title.to_string(),
            author: other.author.to_string(),
            isbn: other.isbn.to_string(),
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            title: other.title.to_string(),
            author: other.author.to_string(),
            isbn: other.isbn.to_string(),
        }
    }
}
