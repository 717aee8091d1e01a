use std::sync::Arc;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<dyn CatalogService>,
}

impl AppState {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> AppState {
        AppState {
            catalog_service,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

pub type ServerError = (StatusCode, Json<ErrorDetail>);

pub fn server_error(status: StatusCode, detail: &str) -> ServerError {
    (status, Json(ErrorDetail { detail: detail.to_string() }))
}

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    server_error(StatusCode::UNPROCESSABLE_ENTITY, format!("{}", err).as_str())
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            // a dropped connection or exhausted pool may recover, anything else will not
            CommandError::Database { retryable: true, .. } => {
                server_error(StatusCode::SERVICE_UNAVAILABLE, format!("{:?}", err).as_str())
            }
            CommandError::Database { .. } => {
                server_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err).as_str())
            }
            CommandError::DuplicateKey { .. } => {
                server_error(StatusCode::CONFLICT, format!("{:?}", err).as_str())
            }
            CommandError::NotFound { .. } => {
                server_error(StatusCode::NOT_FOUND, format!("{:?}", err).as_str())
            }
            CommandError::Upstream { .. } => {
                server_error(StatusCode::BAD_GATEWAY, format!("{:?}", err).as_str())
            }
            CommandError::Runtime { .. } => {
                server_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", err).as_str())
            }
            CommandError::Serialization { .. } => {
                server_error(StatusCode::BAD_REQUEST, format!("{:?}", err).as_str())
            }
            CommandError::Validation { .. } => {
                server_error(StatusCode::BAD_REQUEST, format!("{:?}", err).as_str())
            }
        }
    }
}
