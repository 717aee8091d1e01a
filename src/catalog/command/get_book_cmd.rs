use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub struct GetBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl GetBookCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetBookCommandRequest {
    pub isbn: String,
}

impl GetBookCommandRequest {
    pub fn new(isbn: &str) -> Self {
        Self {
            isbn: isbn.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetBookCommandResponse {
    pub book: BookDto,
}

impl GetBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        match self.catalog_service.find_book(req.isbn.as_str()).await? {
            Some(book) => Ok(GetBookCommandResponse::new(book)),
            None => Err(CommandError::not_found(format!("no book found with isbn {}", req.isbn).as_str())),
        }
    }
}
