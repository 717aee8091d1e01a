pub mod file_book_repository;
pub mod pg_book_repository;

use crate::books::domain::model::BookEntity;
use crate::core::repository::Repository;

pub trait BookRepository: Repository<BookEntity> {
    fn store_name(&self) -> &'static str;
}
