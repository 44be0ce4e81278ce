//! Remote asset store contract and its adapters.
//!
//! The upload pipeline talks to storage through two narrow traits:
//! [`StoreConnector`] builds a client from credentials, [`AssetStore`]
//! performs one deadline-bounded upload and reports the secure URL.
//!
//! # Adapters
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        StoreConnector                         │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │ CloudinaryConnector          │ ObjectStoreConnector           │
//! │ signed multipart POST        │ Apache OpenDAL op.write()      │
//! │ /v1_1/{cloud}/auto/upload    │ S3 / Azure Blob / local fs     │
//! └──────────────────────────────┴───────────────────────────────┘
//! ```

mod backend;
mod cloudinary;
mod error;
mod object_store;

use std::future::Future;

use bytes::Bytes;

use crate::deadline::Deadline;

pub use backend::{BackendStore, StoreBackend};
pub use cloudinary::{CloudinaryConnector, CloudinaryStore};
pub use error::StoreError;
pub use object_store::{ObjectStore, ObjectStoreConnector};

/// Parameters of a single upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadParams {
    /// Object identifier within the folder.
    pub public_id: String,
    /// Destination folder; empty for the store root.
    pub folder: String,
    /// Original filename, forwarded as the multipart part name.
    pub filename: String,
    /// Lower-cased extension without the dot (`"png"`), when known.
    pub format: Option<String>,
}

/// Object created by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// HTTPS URL serving the object.
    pub secure_url: String,
    /// Identifier the store assigned, usually `folder/public_id`.
    pub public_id: String,
    /// Stored size in bytes as reported by the store.
    pub bytes: u64,
}

/// A client able to store one object per call.
pub trait AssetStore: Send + Sync {
    /// Upload `body` under `params`.
    ///
    /// Implementations should honor `deadline` where their transport allows
    /// it; callers still enforce it by dropping the future on expiry.
    fn upload(
        &self,
        body: Bytes,
        params: &UploadParams,
        deadline: &Deadline,
    ) -> impl Future<Output = Result<StoredAsset, StoreError>> + Send;
}

/// Factory that validates credentials and builds an [`AssetStore`].
pub trait StoreConnector: Send + Sync {
    /// Client type produced by [`connect`](Self::connect).
    type Store: AssetStore;

    /// Build a store client.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if the credentials or settings
    /// cannot produce a usable client.
    fn connect(&self) -> Result<Self::Store, StoreError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Map an image extension to the MIME type stored alongside the object.
pub(crate) fn content_type_for(format: Option<&str>) -> &'static str {
    match format {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
