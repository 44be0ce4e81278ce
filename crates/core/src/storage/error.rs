//! Storage error types.

use thiserror::Error;

/// Remote asset store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store client could not be constructed from its configuration.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Request never produced a response (connect, TLS, timeout, body).
    #[error("storage transport error: {0}")]
    Transport(String),

    /// Store answered with a non-success status.
    #[error("storage rejected upload ({status}): {message}")]
    Rejected {
        /// HTTP status code returned by the store.
        status: u16,
        /// Message reported by the store.
        message: String,
    },

    /// Store answered with a body we could not interpret.
    #[error("invalid storage response: {0}")]
    InvalidResponse(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StoreError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a rejection error.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }
}

impl From<opendal::Error> for StoreError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            opendal::ErrorKind::PermissionDenied => Self::Rejected {
                status: 403,
                message: err.to_string(),
            },
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else if err.is_builder() {
            Self::Configuration(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
