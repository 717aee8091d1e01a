use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;

// BookEntity is the persisted catalog entry, keyed by isbn. The serialized field
// names are the on-disk format of the file store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntity {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl BookEntity {
    pub fn new(isbn: &str, title: &str, author: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.isbn.to_string()
    }
}

impl Book for BookEntity {
    fn title(&self) -> &str {
        self.title.as_str()
    }

    fn author(&self) -> &str {
        self.author.as_str()
    }
}
