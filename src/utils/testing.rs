use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::books::dto::BookDto;
use crate::books::repository::file_book_repository::FileBookRepository;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::gateway::lookup::BookLookup;

pub(crate) const HOBBIT_ISBN: &str = "9780345339683";

pub(crate) fn hobbit_response() -> Value {
    json!({
        format!("ISBN:{}", HOBBIT_ISBN): {
            "title": "The Hobbit",
            "authors": [{"name": "J.R.R. Tolkien"}]
        }
    })
}

// serves the router on an ephemeral local port until the test runtime shuts down
pub(crate) async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("should bind listener");
    let addr = listener.local_addr().expect("should read local addr");
    let server = axum::Server::from_tcp(listener).expect("should build server")
        .serve(router.into_make_service());
    tokio::spawn(async move {
        let _ = server.await;
    });
    format!("http://{}", addr)
}

type StubEntries = Arc<HashMap<String, (StatusCode, Value)>>;

async fn stub_books(
    State(entries): State<StubEntries>,
    Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let isbn = params.get("bibkeys")
        .and_then(|k| k.strip_prefix("ISBN:"))
        .unwrap_or_default();
    match entries.get(isbn) {
        Some((status, body)) => (*status, Json(body.clone())),
        None => (StatusCode::OK, Json(json!({}))),
    }
}

// local stand-in for the books api, answers `{}` for unknown isbns
pub(crate) async fn spawn_open_library(entries: Vec<(String, StatusCode, Value)>) -> String {
    let entries: StubEntries = Arc::new(entries.into_iter()
        .map(|(isbn, status, body)| (isbn, (status, body))).collect());
    let router = Router::new()
        .route("/api/books", get(stub_books))
        .with_state(entries);
    format!("{}/api/books", spawn_router(router).await)
}

#[derive(Debug, Clone)]
pub(crate) enum StubAnswer {
    Found(BookDto),
    Failing,
}

// in-process lookup; isbns without an answer are reported as missing
#[derive(Debug, Default)]
pub(crate) struct StubLookup {
    answers: HashMap<String, StubAnswer>,
}

impl StubLookup {
    pub(crate) fn with_book(mut self, isbn: &str, title: &str, author: &str) -> Self {
        self.answers.insert(isbn.to_string(), StubAnswer::Found(BookDto::new(isbn, title, author)));
        self
    }

    pub(crate) fn with_failure(mut self, isbn: &str) -> Self {
        self.answers.insert(isbn.to_string(), StubAnswer::Failing);
        self
    }
}

#[async_trait]
impl BookLookup for StubLookup {
    async fn lookup(&self, isbn: &str) -> LibraryResult<Option<BookDto>> {
        match self.answers.get(isbn) {
            Some(StubAnswer::Found(book)) => Ok(Some(book.clone())),
            Some(StubAnswer::Failing) => Err(LibraryError::upstream("stub lookup failure", Some("503".to_string()))),
            None => Ok(None),
        }
    }
}

pub(crate) fn default_lookup() -> StubLookup {
    StubLookup::default()
        .with_book(HOBBIT_ISBN, "The Hobbit", "J.R.R. Tolkien")
        .with_book("9780199535675", "Ulysses", "James Joyce")
        .with_book("9780060853983", "Good Omens", "Terry Pratchett, Neil Gaiman")
        .with_failure("5555555555555")
}

// catalog service over a temp json file; keep the TempDir alive for the test
pub(crate) async fn build_catalog_service(lookup: StubLookup) -> (tempfile::TempDir, Arc<dyn CatalogService>) {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let repo = FileBookRepository::new(dir.path().join("library.json"));
    repo.setup().await.expect("should setup repository");
    let svc: Arc<dyn CatalogService> = Arc::new(CatalogServiceImpl::new(Box::new(repo), Box::new(lookup)));
    (dir, svc)
}
