use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub const BOOK_DELETED_MESSAGE: &str = "Book successfully deleted";

pub struct RemoveBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl RemoveBookCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveBookCommandRequest {
    pub isbn: String,
}

impl RemoveBookCommandRequest {
    pub fn new(isbn: &str) -> Self {
        Self {
            isbn: isbn.to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct RemoveBookCommandResponse {
    pub message: String,
    pub isbn: String,
}

impl RemoveBookCommandResponse {
    pub fn new(isbn: &str) -> Self {
        Self {
            message: BOOK_DELETED_MESSAGE.to_string(),
            isbn: isbn.to_string(),
        }
    }
}

#[async_trait]
impl Command<RemoveBookCommandRequest, RemoveBookCommandResponse> for RemoveBookCommand {
    async fn execute(&self, req: RemoveBookCommandRequest) -> Result<RemoveBookCommandResponse, CommandError> {
        let isbn = req.isbn.trim();
        if self.catalog_service.remove_book(isbn).await? {
            Ok(RemoveBookCommandResponse::new(isbn))
        } else {
            Err(CommandError::not_found(format!("no book found with isbn {}", isbn).as_str()))
        }
    }
}
