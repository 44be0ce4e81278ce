//! Application configuration management.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload policy configuration.
    pub upload: UploadConfig,
    /// Remote asset store configuration.
    pub store: StoreConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Upload policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Accepted file extensions (case-insensitive, leading dot optional).
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Upper bound for a single remote upload, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Destination folder in the remote store.
    pub folder: String,
}

impl UploadConfig {
    /// Default max file size: 5 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
    /// Default upload timeout: 10 seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    /// Upper bound accepted for `timeout_secs`: one hour.
    pub const MAX_TIMEOUT_SECS: u64 = 3600;

    /// Create an upload config for `folder` with default policy.
    #[must_use]
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: default_allowed_extensions(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            folder: folder.into(),
        }
    }

    /// Upload timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check values serde cannot constrain.
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout_secs` is zero or above
    /// [`MAX_TIMEOUT_SECS`](Self::MAX_TIMEOUT_SECS).
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.timeout_secs == 0 || self.timeout_secs > Self::MAX_TIMEOUT_SECS {
            return Err(config::ConfigError::Message(format!(
                "upload.timeout_secs must be between 1 and {}, got {}",
                Self::MAX_TIMEOUT_SECS,
                self.timeout_secs
            )));
        }
        Ok(())
    }
}

fn default_max_file_size() -> u64 {
    UploadConfig::DEFAULT_MAX_FILE_SIZE
}

fn default_allowed_extensions() -> Vec<String> {
    [".jpg", ".jpeg", ".png", ".svg"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_timeout_secs() -> u64 {
    UploadConfig::DEFAULT_TIMEOUT_SECS
}

/// Which remote store backend receives uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackendKind {
    /// Cloudinary hosted image service.
    Cloudinary,
    /// S3 / Azure Blob / local filesystem through OpenDAL.
    ObjectStore,
}

/// Remote asset store configuration.
///
/// Only the section matching `backend` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Selected backend.
    pub backend: StoreBackendKind,
    /// Cloudinary credentials.
    #[serde(default)]
    pub cloudinary: Option<CloudinaryConfig>,
    /// Object store settings.
    #[serde(default)]
    pub object_store: Option<ObjectStoreConfig>,
}

/// Cloudinary account credentials.
#[derive(Clone, Deserialize)]
pub struct CloudinaryConfig {
    /// Cloud (account) name.
    pub cloud_name: String,
    /// API key.
    pub api_key: String,
    /// API secret used to sign upload requests.
    pub api_secret: String,
    /// API base URL.
    #[serde(default = "default_cloudinary_api_base")]
    pub api_base: String,
}

// Keep the secret out of logs.
impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn default_cloudinary_api_base() -> String {
    "https://api.cloudinary.com".to_string()
}

/// OpenDAL-backed object store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStoreConfig {
    /// Storage provider.
    pub provider: ObjectStoreProvider,
    /// HTTPS base URL under which stored objects are publicly served.
    pub public_base_url: String,
}

/// Object storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectStoreProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl ObjectStoreProvider {
    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("ASSETDROP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("upload.allowed_extensions"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.upload.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const CLOUDINARY_ENV: [(&str, Option<&str>); 5] = [
        ("ASSETDROP__UPLOAD__FOLDER", Some("products")),
        ("ASSETDROP__STORE__BACKEND", Some("cloudinary")),
        ("ASSETDROP__STORE__CLOUDINARY__CLOUD_NAME", Some("demo")),
        ("ASSETDROP__STORE__CLOUDINARY__API_KEY", Some("123456789012345")),
        ("ASSETDROP__STORE__CLOUDINARY__API_SECRET", Some("shh")),
    ];

    #[test]
    fn test_load_cloudinary_defaults() {
        temp_env::with_vars(CLOUDINARY_ENV, || {
            let config = AppConfig::load().expect("config should load");

            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.upload.folder, "products");
            assert_eq!(config.upload.max_file_size, 5 * 1024 * 1024);
            assert_eq!(config.upload.timeout(), Duration::from_secs(10));
            assert_eq!(
                config.upload.allowed_extensions,
                vec![".jpg", ".jpeg", ".png", ".svg"]
            );
            assert_eq!(config.store.backend, StoreBackendKind::Cloudinary);

            let cloudinary = config.store.cloudinary.expect("cloudinary section");
            assert_eq!(cloudinary.cloud_name, "demo");
            assert_eq!(cloudinary.api_key, "123456789012345");
            assert_eq!(cloudinary.api_base, "https://api.cloudinary.com");
        });
    }

    #[test]
    fn test_load_overrides_policy() {
        let mut vars = CLOUDINARY_ENV.to_vec();
        vars.push(("ASSETDROP__UPLOAD__MAX_FILE_SIZE", Some("1024")));
        vars.push(("ASSETDROP__UPLOAD__TIMEOUT_SECS", Some("3")));
        vars.push(("ASSETDROP__UPLOAD__ALLOWED_EXTENSIONS", Some(".png,.webp")));

        temp_env::with_vars(vars, || {
            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.upload.max_file_size, 1024);
            assert_eq!(config.upload.timeout_secs, 3);
            assert_eq!(config.upload.allowed_extensions, vec![".png", ".webp"]);
        });
    }

    #[test]
    fn test_load_object_store() {
        temp_env::with_vars(
            [
                ("ASSETDROP__UPLOAD__FOLDER", Some("avatars")),
                ("ASSETDROP__STORE__BACKEND", Some("object_store")),
                (
                    "ASSETDROP__STORE__OBJECT_STORE__PUBLIC_BASE_URL",
                    Some("https://cdn.example"),
                ),
                (
                    "ASSETDROP__STORE__OBJECT_STORE__PROVIDER__TYPE",
                    Some("local_fs"),
                ),
                (
                    "ASSETDROP__STORE__OBJECT_STORE__PROVIDER__ROOT",
                    Some("/tmp/assetdrop"),
                ),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.store.backend, StoreBackendKind::ObjectStore);
                assert!(config.store.cloudinary.is_none());

                let object_store = config.store.object_store.expect("object store section");
                assert_eq!(object_store.public_base_url, "https://cdn.example");
                assert_eq!(object_store.provider.name(), "local");
            },
        );
    }

    #[test]
    fn test_load_missing_folder_fails() {
        temp_env::with_vars(
            [
                ("ASSETDROP__UPLOAD__FOLDER", None),
                ("ASSETDROP__STORE__BACKEND", Some("cloudinary")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[rstest]
    #[case("0")]
    #[case("3601")]
    #[case("86400")]
    fn test_load_rejects_out_of_range_timeout(#[case] timeout: &str) {
        let mut vars = CLOUDINARY_ENV.to_vec();
        vars.push(("ASSETDROP__UPLOAD__TIMEOUT_SECS", Some(timeout)));

        temp_env::with_vars(vars, || {
            let err = AppConfig::load().unwrap_err();
            assert!(err.to_string().contains("upload.timeout_secs"));
        });
    }

    #[test]
    fn test_upload_config_validate_bounds() {
        let mut config = UploadConfig::new("uploads");
        assert!(config.validate().is_ok());

        config.timeout_secs = UploadConfig::MAX_TIMEOUT_SECS;
        assert!(config.validate().is_ok());

        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cloudinary_debug_redacts_secret() {
        let config = CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "super-secret".to_string(),
            api_base: default_cloudinary_api_base(),
        };

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_upload_config_new_defaults() {
        let config = UploadConfig::new("uploads");
        assert_eq!(config.folder, "uploads");
        assert_eq!(config.max_file_size, UploadConfig::DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.allowed_extensions.len(), 4);
    }
}
