//! Backend selection from configuration.

use assetdrop_shared::{StoreBackendKind, StoreConfig};
use bytes::Bytes;

use super::cloudinary::{CloudinaryConnector, CloudinaryStore};
use super::error::StoreError;
use super::object_store::{ObjectStore, ObjectStoreConnector};
use super::{AssetStore, StoreConnector, StoredAsset, UploadParams};
use crate::deadline::Deadline;

/// Connector for whichever backend the configuration selects.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// Cloudinary hosted image service.
    Cloudinary(CloudinaryConnector),
    /// OpenDAL object storage.
    ObjectStore(ObjectStoreConnector),
}

impl StoreBackend {
    /// Build the connector selected by `config.backend`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if the selected backend's section
    /// is missing.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.backend {
            StoreBackendKind::Cloudinary => config
                .cloudinary
                .clone()
                .map(|c| Self::Cloudinary(CloudinaryConnector::new(c)))
                .ok_or_else(|| StoreError::configuration("missing [store.cloudinary] section")),
            StoreBackendKind::ObjectStore => config
                .object_store
                .clone()
                .map(|c| {
                    Self::ObjectStore(ObjectStoreConnector::new(c.provider, c.public_base_url))
                })
                .ok_or_else(|| StoreError::configuration("missing [store.object_store] section")),
        }
    }
}

impl StoreConnector for StoreBackend {
    type Store = BackendStore;

    fn connect(&self) -> Result<BackendStore, StoreError> {
        match self {
            Self::Cloudinary(connector) => connector.connect().map(BackendStore::Cloudinary),
            Self::ObjectStore(connector) => connector.connect().map(BackendStore::ObjectStore),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Cloudinary(connector) => connector.name(),
            Self::ObjectStore(connector) => connector.name(),
        }
    }
}

/// Store client produced by [`StoreBackend`].
#[derive(Debug, Clone)]
pub enum BackendStore {
    /// Cloudinary client.
    Cloudinary(CloudinaryStore),
    /// OpenDAL client.
    ObjectStore(ObjectStore),
}

impl AssetStore for BackendStore {
    async fn upload(
        &self,
        body: Bytes,
        params: &UploadParams,
        deadline: &Deadline,
    ) -> Result<StoredAsset, StoreError> {
        match self {
            Self::Cloudinary(store) => store.upload(body, params, deadline).await,
            Self::ObjectStore(store) => store.upload(body, params, deadline).await,
        }
    }
}
