use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::sync::Mutex;
use tracing::debug;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;

// FileBookRepository keeps the whole catalog as a json array and rewrites it on every
// mutation. The mutex serializes read-modify-write cycles within the process.
#[derive(Debug)]
pub struct FileBookRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileBookRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    async fn load(&self) -> LibraryResult<Vec<BookEntity>> {
        match tokio::fs::read(&self.path).await {
            // a freshly touched file holds no books yet
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(vec![]),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(err) => Err(LibraryError::from(err)),
        }
    }

    async fn save(&self, books: &[BookEntity]) -> LibraryResult<()> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        books.serialize(&mut ser)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &buf).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), size = books.len(), "saved books");
        Ok(())
    }
}

#[async_trait]
impl Repository<BookEntity> for FileBookRepository {
    async fn setup(&self) -> LibraryResult<()> {
        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => self.save(&[]).await,
            Err(err) => Err(LibraryError::from(err)),
        }
    }

    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let _guard = self.lock.lock().await;
        let mut books = self.load().await?;
        if books.iter().any(|b| b.id() == entity.id()) {
            return Err(LibraryError::duplicate_key(
                format!("book with isbn {} already exists", entity.isbn).as_str()));
        }
        books.push(entity.clone());
        self.save(&books).await?;
        Ok(1)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let _guard = self.lock.lock().await;
        self.load().await?
            .into_iter()
            .find(|b| b.isbn == id)
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let _guard = self.lock.lock().await;
        let mut books = self.load().await?;
        let before = books.len();
        books.retain(|b| b.isbn != id);
        let removed = before - books.len();
        if removed > 0 {
            self.save(&books).await?;
        }
        Ok(removed)
    }

    async fn query_all(&self) -> LibraryResult<Vec<BookEntity>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }
}

impl BookRepository for FileBookRepository {
    fn store_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::file_book_repository::FileBookRepository;
    use crate::core::library::LibraryError;
    use crate::core::repository::Repository;

    async fn build_repo() -> (tempfile::TempDir, FileBookRepository) {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let repo = FileBookRepository::new(dir.path().join("data").join("library.json"));
        repo.setup().await.expect("should setup file");
        (dir, repo)
    }

    #[tokio::test]
    async fn test_should_setup_idempotently() {
        let (_dir, repo) = build_repo().await;
        repo.create(&BookEntity::new("isbn", "test book", "author")).await.expect("should create book");
        repo.setup().await.expect("should setup again");
        assert_eq!(1, repo.query_all().await.expect("should list books").len());
        let raw = std::fs::read_to_string(repo.path()).expect("should read file");
        assert!(raw.contains("\n    {"));
    }

    #[tokio::test]
    async fn test_should_create_get_books() {
        let (_dir, repo) = build_repo().await;
        let book = BookEntity::new("isbn", "test book", "author");
        let size = repo.create(&book).await.expect("should create book");
        assert_eq!(1, size);

        let loaded = repo.get("isbn").await.expect("should return book");
        assert_eq!(book, loaded);
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_books() {
        let (_dir, repo) = build_repo().await;
        let book = BookEntity::new("isbn", "test book", "author");
        repo.create(&book).await.expect("should create book");
        let res = repo.create(&BookEntity::new("isbn", "other", "other")).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { .. })));
        assert_eq!(vec![book], repo.query_all().await.expect("should list books"));
    }

    #[tokio::test]
    async fn test_should_create_delete_books() {
        let (_dir, repo) = build_repo().await;
        repo.create(&BookEntity::new("isbn1", "one", "author")).await.expect("should create book");
        repo.create(&BookEntity::new("isbn2", "two", "author")).await.expect("should create book");

        assert_eq!(1, repo.delete("isbn1").await.expect("should delete book"));
        assert_eq!(0, repo.delete("isbn1").await.expect("should delete nothing"));
        assert!(repo.get("isbn1").await.expect_err("should be gone").is_not_found());
        let remaining = repo.query_all().await.expect("should list books");
        assert_eq!(1, remaining.len());
        assert_eq!("isbn2", remaining[0].isbn.as_str());
    }

    #[tokio::test]
    async fn test_should_read_missing_file_as_empty() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let repo = FileBookRepository::new(dir.path().join("absent.json"));
        assert!(repo.query_all().await.expect("should list books").is_empty());
    }

    #[tokio::test]
    async fn test_should_read_empty_file_as_empty() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("library.json");
        std::fs::write(&path, "").expect("should touch file");
        let repo = FileBookRepository::new(&path);
        repo.setup().await.expect("should setup over empty file");
        assert!(repo.query_all().await.expect("should list books").is_empty());

        std::fs::write(&path, " \n\t").expect("should write blank file");
        let book = BookEntity::new("isbn", "test book", "author");
        assert_eq!(1, repo.create(&book).await.expect("should create book"));
        assert_eq!(vec![book], repo.query_all().await.expect("should list books"));
    }

    #[tokio::test]
    async fn test_should_fail_on_malformed_file() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("library.json");
        std::fs::write(&path, "{not json").expect("should write file");
        let repo = FileBookRepository::new(&path);
        assert!(matches!(repo.query_all().await, Err(LibraryError::Serialization { .. })));
        let res = repo.create(&BookEntity::new("isbn", "test book", "author")).await;
        assert!(matches!(res, Err(LibraryError::Serialization { .. })));
        assert_eq!("{not json", std::fs::read_to_string(&path).expect("should read file"));
    }

    #[tokio::test]
    async fn test_should_keep_one_book_for_concurrent_creates() {
        let (_dir, repo) = build_repo().await;
        let book = BookEntity::new("isbn", "test book", "author");
        let (a, b) = tokio::join!(repo.create(&book), repo.create(&book));
        assert!(a.is_ok() ^ b.is_ok());
        assert_eq!(1, repo.query_all().await.expect("should list books").len());
    }
}
