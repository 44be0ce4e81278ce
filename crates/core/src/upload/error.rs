//! Upload error types.

use assetdrop_shared::AppError;
use thiserror::Error;

use crate::deadline::Interrupted;
use crate::storage::StoreError;

/// Policy violations detected before any byte is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Declared size exceeds the policy maximum.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Declared file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Extension missing or not in the allow-set.
    #[error(
        "file type {} is not allowed",
        .extension.as_deref().map_or_else(|| "(no extension)".to_string(), |e| format!("'{e}'"))
    )]
    UnsupportedFileType {
        /// Lower-cased extension including the dot, if the filename had one.
        extension: Option<String>,
    },
}

impl PolicyError {
    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Create an unsupported file type error.
    #[must_use]
    pub fn unsupported(extension: Option<String>) -> Self {
        Self::UnsupportedFileType { extension }
    }
}

/// Upload pipeline errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// File rejected by the upload policy.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Local file handle could not be opened or read.
    #[error("failed to read uploaded file: {0}")]
    Io(#[from] std::io::Error),

    /// Store client could not be constructed.
    #[error(transparent)]
    Configuration(StoreError),

    /// Upload did not finish before the deadline.
    #[error("upload deadline exceeded")]
    DeadlineExceeded,

    /// Caller cancelled the upload.
    #[error("upload cancelled")]
    Cancelled,

    /// Remote store failed the upload.
    #[error(transparent)]
    Remote(StoreError),
}

impl UploadError {
    /// Whether the file was rejected by policy, i.e. the client's fault.
    #[must_use]
    pub fn is_policy(&self) -> bool {
        matches!(self, Self::Policy(_))
    }
}

impl From<Interrupted> for UploadError {
    fn from(interrupted: Interrupted) -> Self {
        match interrupted {
            Interrupted::DeadlineExceeded => Self::DeadlineExceeded,
            Interrupted::Cancelled => Self::Cancelled,
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        let detail = err.to_string();
        match err {
            UploadError::Policy(PolicyError::FileTooLarge { .. }) => Self::PayloadTooLarge(detail),
            UploadError::Policy(PolicyError::UnsupportedFileType { .. }) => {
                Self::UnsupportedFile(detail)
            }
            UploadError::Io(_) => Self::BadRequest("could not read uploaded file".to_string()),
            UploadError::Configuration(_) => Self::Internal(detail),
            UploadError::DeadlineExceeded => Self::Timeout(detail),
            UploadError::Cancelled => Self::Unavailable(detail),
            UploadError::Remote(_) => Self::ExternalService(detail),
        }
    }
}
