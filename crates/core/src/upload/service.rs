//! Upload orchestration.

use std::time::Duration;

use assetdrop_shared::UploadConfig;
use tracing::{debug, info, warn};

use super::buffer::buffer;
use super::error::UploadError;
use super::filename::extension;
use super::policy::UploadPolicy;
use super::source::FileSource;
use crate::deadline::Deadline;
use crate::storage::{AssetStore, StoreConnector, StoredAsset, UploadParams};

/// Validates files and forwards them to a remote asset store.
///
/// Holds only immutable policy and configuration, so one instance can be
/// shared across concurrent requests.
#[derive(Debug)]
pub struct Uploader<C: StoreConnector> {
    connector: C,
    policy: UploadPolicy,
    folder: String,
    timeout: Duration,
}

impl<C: StoreConnector> Uploader<C> {
    /// Default bound on a single upload: 10 seconds.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create an uploader storing into `folder`.
    #[must_use]
    pub fn new(connector: C, policy: UploadPolicy, folder: impl Into<String>) -> Self {
        Self {
            connector,
            policy,
            folder: folder.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Create an uploader from the upload configuration.
    #[must_use]
    pub fn from_config(connector: C, config: &UploadConfig) -> Self {
        Self::new(connector, UploadPolicy::from_config(config), &config.folder)
            .with_timeout(config.timeout())
    }

    /// Set the per-upload timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The upload policy.
    #[must_use]
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Destination folder.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Per-upload timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The store connector.
    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Validate `file` and store it as `logical_name`; returns the secure URL.
    ///
    /// # Errors
    ///
    /// See [`upload_asset`](Self::upload_asset).
    pub async fn upload<F: FileSource>(
        &self,
        file: &F,
        logical_name: &str,
    ) -> Result<String, UploadError> {
        self.upload_within(file, logical_name, &Deadline::never())
            .await
    }

    /// Like [`upload`](Self::upload), bounded additionally by `outer`.
    ///
    /// # Errors
    ///
    /// See [`upload_asset`](Self::upload_asset).
    pub async fn upload_within<F: FileSource>(
        &self,
        file: &F,
        logical_name: &str,
        outer: &Deadline,
    ) -> Result<String, UploadError> {
        self.upload_asset(file, logical_name, outer)
            .await
            .map(|asset| asset.secure_url)
    }

    /// Validate `file` and store it as `logical_name` in the configured
    /// folder, within the upload timeout and `outer`.
    ///
    /// Validation runs first: a rejected file is never opened and the store
    /// is never contacted.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Policy`] if the file violates the policy
    /// - [`UploadError::Configuration`] if the store client cannot be built
    /// - [`UploadError::Io`] if the file cannot be read
    /// - [`UploadError::DeadlineExceeded`] if the timeout elapses first
    /// - [`UploadError::Cancelled`] if `outer` is cancelled
    /// - [`UploadError::Remote`] for any failure reported by the store
    pub async fn upload_asset<F: FileSource>(
        &self,
        file: &F,
        logical_name: &str,
        outer: &Deadline,
    ) -> Result<StoredAsset, UploadError> {
        let filename = file.filename();

        if let Err(e) = self.policy.validate(file.declared_size(), filename) {
            warn!(filename = %filename, error = %e, "Upload rejected by policy");
            return Err(e.into());
        }

        let deadline = outer.child(self.timeout);

        let store = self
            .connector
            .connect()
            .map_err(UploadError::Configuration)?;

        let body = deadline.run(buffer(file)).await??;
        debug!(filename = %filename, bytes = body.len(), "Upload buffered");

        let params = UploadParams {
            public_id: logical_name.to_string(),
            folder: self.folder.clone(),
            filename: filename.to_string(),
            format: extension(filename).map(|ext| ext[1..].to_lowercase()),
        };

        let asset = deadline
            .run(store.upload(body, &params, &deadline))
            .await
            .inspect_err(|_| {
                warn!(
                    backend = self.connector.name(),
                    public_id = %logical_name,
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Upload interrupted"
                );
            })?
            .map_err(UploadError::Remote)?;

        info!(
            backend = self.connector.name(),
            public_id = %asset.public_id,
            bytes = asset.bytes,
            "Upload stored"
        );

        Ok(asset)
    }
}
