use axum::{
    body::HttpBody,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    BoxError, Router,
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use crate::books::dto::BookDto;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, json_to_server_error, server_error, ServerError};

// The request body type is chosen by the caller: lambda_http::Body under the lambda
// runtime, hyper's Body for the standalone server.
pub fn catalog_router<B>(state: AppState) -> Router<(), B>
    where B: HttpBody + Send + 'static,
          B::Data: Send,
          B::Error: Into<BoxError> {
    Router::new()
        .route("/books", get(list_books).post(add_book))
        .route("/books/:isbn",
               get(find_book_by_isbn).delete(remove_book))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

// Listing never fails at the boundary; a storage error is logged and answered with
// an empty collection.
pub async fn list_books(
    State(state): State<AppState>) -> Json<Vec<BookDto>> {
    let cmd = ListBooksCommand::new(state.catalog_service.clone());
    match cmd.execute(ListBooksCommandRequest::default()).await {
        Ok(res) => Json(res.books),
        Err(err) => {
            error!(?err, "failed to list books");
            Json(vec![])
        }
    }
}

// Every add failure (duplicate, upstream miss or failure, storage) is answered with
// the same 404; the actual cause only goes to the log.
pub async fn add_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<(StatusCode, Json<BookDto>), ServerError> {
    let req: AddBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let isbn = req.isbn.clone();
    match AddBookCommand::new(state.catalog_service.clone()).execute(req).await {
        Ok(res) => Ok((StatusCode::CREATED, Json(res.book))),
        Err(err) => {
            warn!(%isbn, ?err, "failed to add book");
            Err(server_error(StatusCode::NOT_FOUND, format!(
                "Book with ISBN {} not found or already exists in the database.", isbn).as_str()))
        }
    }
}

pub async fn find_book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<Json<BookDto>, ServerError> {
    let req = GetBookCommandRequest::new(isbn.as_str());
    match GetBookCommand::new(state.catalog_service.clone()).execute(req).await {
        Ok(res) => Ok(Json(res.book)),
        Err(CommandError::NotFound { .. }) => Err(not_in_database(isbn.as_str())),
        Err(err) => Err(ServerError::from(err)),
    }
}

pub async fn remove_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let req = RemoveBookCommandRequest::new(isbn.as_str());
    match RemoveBookCommand::new(state.catalog_service.clone()).execute(req).await {
        Ok(res) => Ok(Json(res)),
        Err(CommandError::NotFound { .. }) => Err(not_in_database(isbn.as_str())),
        Err(err) => {
            error!(%isbn, ?err, "failed to remove book");
            Err(ServerError::from(err))
        }
    }
}

fn not_in_database(isbn: &str) -> ServerError {
    server_error(StatusCode::NOT_FOUND, format!("Book with ISBN {} not found in the database.", isbn).as_str())
}
