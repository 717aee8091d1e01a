use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug)]
pub enum CommandError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    Upstream {
        message: String,
        reason_code: Option<String>,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

impl CommandError {
    pub fn not_found(message: &str) -> CommandError {
        CommandError::NotFound { message: message.to_string() }
    }
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::Database { message, reason_code, retryable } => {
                CommandError::Database { message, reason_code, retryable }
            }
            LibraryError::DuplicateKey { message } => {
                CommandError::DuplicateKey { message }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::Upstream { message, reason_code } => {
                CommandError::Upstream { message, reason_code }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code }
            }
        }
    }
}
