use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl BookDto {
    pub fn new(isbn: &str, title: &str, author: &str) -> BookDto {
        BookDto {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        }
    }
}

impl Identifiable for BookDto {
    fn id(&self) -> String {
        self.isbn.to_string()
    }
}

impl Book for BookDto {
    fn title(&self) -> &str {
        self.title.as_str()
    }

    fn author(&self) -> &str {
        self.author.as_str()
    }
}

impl Display for BookDto {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
