//! Object storage adapter using Apache OpenDAL.
//!
//! Objects are written to `{folder}/{public_id}.{format}` and served from a
//! configured public HTTPS base URL (CDN or bucket website endpoint).

use assetdrop_shared::ObjectStoreProvider;
use bytes::Bytes;
use opendal::{Operator, services};
use reqwest::Url;
use tracing::debug;

use super::error::StoreError;
use super::{AssetStore, StoreConnector, StoredAsset, UploadParams, content_type_for};
use crate::deadline::Deadline;

/// Builds [`ObjectStore`] clients from provider settings.
#[derive(Debug, Clone)]
pub struct ObjectStoreConnector {
    provider: ObjectStoreProvider,
    public_base_url: String,
}

impl ObjectStoreConnector {
    /// Create a connector for `provider`, publishing under `public_base_url`.
    #[must_use]
    pub fn new(provider: ObjectStoreProvider, public_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            public_base_url: public_base_url.into(),
        }
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(&self) -> Result<Operator, StoreError> {
        let operator = match &self.provider {
            ObjectStoreProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                Operator::new(builder).map(|op| op.finish())
            }
            ObjectStoreProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);
                Operator::new(builder).map(|op| op.finish())
            }
            ObjectStoreProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StoreError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root)).map(|op| op.finish())
            }
        };

        operator.map_err(|e| StoreError::configuration(e.to_string()))
    }
}

impl StoreConnector for ObjectStoreConnector {
    type Store = ObjectStore;

    fn connect(&self) -> Result<ObjectStore, StoreError> {
        let base = Url::parse(&self.public_base_url)
            .map_err(|e| StoreError::configuration(format!("invalid public base URL: {e}")))?;
        if base.scheme() != "https" {
            return Err(StoreError::configuration(
                "public base URL must use https",
            ));
        }

        Ok(ObjectStore {
            operator: self.create_operator()?,
            public_base_url: self.public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn name(&self) -> &'static str {
        self.provider.name()
    }
}

/// OpenDAL-backed asset store.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    operator: Operator,
    public_base_url: String,
}

impl ObjectStore {
    /// Storage key for an upload.
    ///
    /// Format: `{folder}/{public_id}.{format}`, every segment sanitized.
    #[must_use]
    pub fn object_key(params: &UploadParams) -> String {
        let mut name = sanitize_segment(&params.public_id);
        if let Some(format) = &params.format {
            name.push('.');
            name.push_str(&sanitize_segment(format));
        }

        params
            .folder
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(sanitize_segment)
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl AssetStore for ObjectStore {
    async fn upload(
        &self,
        body: Bytes,
        params: &UploadParams,
        _deadline: &Deadline,
    ) -> Result<StoredAsset, StoreError> {
        let key = Self::object_key(params);
        let bytes = body.len() as u64;

        debug!(key = %key, bytes, "Writing object");
        self.operator
            .write_with(&key, body)
            .content_type(content_type_for(params.format.as_deref()))
            .await?;

        Ok(StoredAsset {
            secure_url: format!("{}/{key}", self.public_base_url),
            public_id: key,
            bytes,
        })
    }
}

/// Sanitize one key segment.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores;
/// a segment made only of dots becomes underscores so it cannot climb out of
/// its folder.
fn sanitize_segment(segment: &str) -> String {
    let sanitized: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        "_".repeat(sanitized.len().max(1))
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(public_id: &str, folder: &str, format: Option<&str>) -> UploadParams {
        UploadParams {
            public_id: public_id.to_string(),
            folder: folder.to_string(),
            filename: "ignored".to_string(),
            format: format.map(String::from),
        }
    }

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("banner-1"), "banner-1");
        assert_eq!(sanitize_segment("my file (1)"), "my_file__1_");
        assert_eq!(sanitize_segment("日本語"), "___");
        assert_eq!(sanitize_segment(".."), "__");
        assert_eq!(sanitize_segment(""), "_");
    }

    #[test]
    fn test_object_key_with_folder() {
        let key = ObjectStore::object_key(&params("banner-1", "products", Some("svg")));
        assert_eq!(key, "products/banner-1.svg");
    }

    #[test]
    fn test_object_key_nested_folder_and_no_format() {
        let key = ObjectStore::object_key(&params("banner-1", "/shop//products/", None));
        assert_eq!(key, "shop/products/banner-1");
    }

    #[test]
    fn test_object_key_cannot_escape_folder() {
        let key = ObjectStore::object_key(&params("../../etc/passwd", "products", None));
        assert!(key.starts_with("products/"));
        assert_eq!(key.matches('/').count(), 1);
    }

    #[test]
    fn test_connect_requires_https_base() {
        let connector = ObjectStoreConnector::new(
            ObjectStoreProvider::local_fs("./storage"),
            "http://cdn.example",
        );
        assert!(matches!(
            connector.connect(),
            Err(StoreError::Configuration(_))
        ));
    }

    #[test]
    fn test_connector_name() {
        let connector = ObjectStoreConnector::new(
            ObjectStoreProvider::local_fs("./storage"),
            "https://cdn.example",
        );
        assert_eq!(connector.name(), "local");
    }

    #[tokio::test]
    async fn test_upload_writes_object_and_reports_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let connector = ObjectStoreConnector::new(
            ObjectStoreProvider::local_fs(dir.path()),
            "https://cdn.example/",
        );
        let store = connector.connect().expect("should connect");

        let asset = store
            .upload(
                Bytes::from_static(b"\x89PNG"),
                &params("banner-1", "avatars", Some("png")),
                &Deadline::never(),
            )
            .await
            .expect("upload should succeed");

        assert_eq!(asset.secure_url, "https://cdn.example/avatars/banner-1.png");
        assert_eq!(asset.public_id, "avatars/banner-1.png");
        assert_eq!(asset.bytes, 4);

        let written = std::fs::read(dir.path().join("avatars").join("banner-1.png"))
            .expect("object should exist on disk");
        assert_eq!(written, b"\x89PNG");
    }
}
