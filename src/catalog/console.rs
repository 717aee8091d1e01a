use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use crate::books::domain::Book;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::LibraryResult;

const MENU: &str = "\n--- Library Menu ---\n\
1. Add Book (by ISBN)\n\
2. Remove Book\n\
3. List Books\n\
4. Find Book\n\
5. Exit\n";

// Console runs the interactive library menu over any line reader and writer.
pub struct Console<R, W> {
    catalog_service: Arc<dyn CatalogService>,
    lines: Lines<R>,
    writer: W,
}

impl<R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin> Console<R, W> {
    pub fn new(catalog_service: Arc<dyn CatalogService>, reader: R, writer: W) -> Self {
        Self {
            catalog_service,
            lines: reader.lines(),
            writer,
        }
    }

    // returns when the user exits or the input ends
    pub async fn run(&mut self) -> LibraryResult<()> {
        loop {
            self.write(MENU).await?;
            let choice = match self.prompt("Enter your choice (1-5): ").await? {
                Some(choice) => choice,
                None => return Ok(()),
            };
            match choice.as_str() {
                "1" => self.add_book().await?,
                "2" => self.remove_book().await?,
                "3" => self.list_books().await?,
                "4" => self.find_book().await?,
                "5" => {
                    self.write("Exiting the application. Goodbye!\n").await?;
                    return Ok(());
                }
                _ => self.write("Invalid choice. Please enter a number between 1 and 5.\n").await?,
            }
        }
    }

    async fn add_book(&mut self) -> LibraryResult<()> {
        let isbn = self.prompt("Enter the 10 or 13-digit ISBN of the book: ").await?.unwrap_or_default();
        if isbn.is_empty() {
            return self.write("Error: ISBN cannot be empty.\n").await;
        }
        self.write(format!("Fetching book data for ISBN: {}...\n", isbn).as_str()).await?;
        let cmd = AddBookCommand::new(self.catalog_service.clone());
        let message = match cmd.execute(AddBookCommandRequest::new(isbn.as_str())).await {
            Ok(res) => format!("Successfully added: {}\n", res.book.describe()),
            Err(CommandError::DuplicateKey { .. }) => format!("Error: Book with ISBN {} already exists.\n", isbn),
            Err(CommandError::NotFound { .. }) => format!("Error: No book found with ISBN {}.\n", isbn),
            Err(err) => format!("Error: could not add book with ISBN {}: {:?}\n", isbn, err),
        };
        self.write(message.as_str()).await
    }

    async fn remove_book(&mut self) -> LibraryResult<()> {
        let isbn = self.prompt("Enter ISBN of the book to remove: ").await?.unwrap_or_default();
        let found = GetBookCommand::new(self.catalog_service.clone())
            .execute(GetBookCommandRequest::new(isbn.as_str())).await;
        let book = match found {
            Ok(res) => res.book,
            Err(CommandError::NotFound { .. }) => {
                return self.write(format!("No book found with ISBN {}.\n", isbn).as_str()).await;
            }
            Err(err) => {
                return self.write(format!("Error: could not remove book with ISBN {}: {:?}\n", isbn, err).as_str()).await;
            }
        };
        let cmd = RemoveBookCommand::new(self.catalog_service.clone());
        let message = match cmd.execute(RemoveBookCommandRequest::new(isbn.as_str())).await {
            Ok(_) => format!("Book removed: {}\n", book.describe()),
            Err(CommandError::NotFound { .. }) => format!("No book found with ISBN {}.\n", isbn),
            Err(err) => format!("Error: could not remove book with ISBN {}: {:?}\n", isbn, err),
        };
        self.write(message.as_str()).await
    }

    async fn list_books(&mut self) -> LibraryResult<()> {
        let cmd = ListBooksCommand::new(self.catalog_service.clone());
        let message = match cmd.execute(ListBooksCommandRequest::default()).await {
            Ok(res) if res.books.is_empty() => "The library is empty.\n".to_string(),
            Ok(res) => res.books.iter().map(|b| format!("{}\n", b.describe())).collect(),
            Err(err) => format!("Error: could not list books: {:?}\n", err),
        };
        self.write(message.as_str()).await
    }

    async fn find_book(&mut self) -> LibraryResult<()> {
        let isbn = self.prompt("Enter ISBN of the book to find: ").await?.unwrap_or_default();
        let cmd = GetBookCommand::new(self.catalog_service.clone());
        let message = match cmd.execute(GetBookCommandRequest::new(isbn.as_str())).await {
            Ok(res) => format!("Found book: {}\n", res.book.describe()),
            Err(CommandError::NotFound { .. }) => format!("No book found with ISBN {}.\n", isbn),
            Err(err) => format!("Error: could not find book with ISBN {}: {:?}\n", isbn, err),
        };
        self.write(message.as_str()).await
    }

    async fn prompt(&mut self, text: &str) -> LibraryResult<Option<String>> {
        self.write(text).await?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }

    async fn write(&mut self, text: &str) -> LibraryResult<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
