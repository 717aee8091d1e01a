use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum LibraryError {
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
    // The bibliographic lookup service could not be reached, timed out or answered
    // with a non-success status.
    Upstream {
        message: String,
        reason_code: Option<String>,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn upstream(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Upstream { message: message.to_string(), reason_code }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LibraryError::NotFound { .. })
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("io {:?}", err).as_str(), Some(format!("{:?}", err.kind())))
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<reqwest::Error> for LibraryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return LibraryError::serialization(
                format!("lookup response parsing {}", err).as_str());
        }
        let reason = if err.is_timeout() {
            Some("Timeout".to_string())
        } else if let Some(status) = err.status() {
            Some(status.as_u16().to_string())
        } else if err.is_connect() {
            Some("Connect".to_string())
        } else {
            None
        };
        LibraryError::upstream(format!("lookup request failed {}", err).as_str(), reason)
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Upstream { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for Repository .
pub type LibraryResult<T> = Result<T, LibraryError>;
