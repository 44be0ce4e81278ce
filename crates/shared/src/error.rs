//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or unreadable request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Uploaded file exceeds the size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Uploaded file type is not accepted.
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Operation did not finish in time.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Service is shutting down or otherwise unavailable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::PayloadTooLarge(_) => 413,
            Self::UnsupportedFile(_) => 415,
            Self::ExternalService(_) => 502,
            Self::Unavailable(_) => 503,
            Self::Timeout(_) => 504,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::PayloadTooLarge(_) => "FILE_TOO_LARGE",
            Self::UnsupportedFile(_) => "UNSUPPORTED_FILE_TYPE",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Timeout(_) => "UPLOAD_TIMEOUT",
            Self::Unavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message safe to show to API clients.
    ///
    /// Client errors echo their detail, server-side failures collapse to a
    /// generic message.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::PayloadTooLarge(msg) | Self::UnsupportedFile(msg) => {
                msg.clone()
            }
            Self::Timeout(_) => "upload timed out, please try again".to_string(),
            Self::Unavailable(_) => "service unavailable, please try again".to_string(),
            Self::ExternalService(_) | Self::Internal(_) => "failed to upload file".to_string(),
        }
    }
}
