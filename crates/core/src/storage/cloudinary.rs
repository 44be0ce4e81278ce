//! Cloudinary upload API client.
//!
//! Uploads are signed multipart POSTs to `{api_base}/v1_1/{cloud}/auto/upload`.
//! The signature is the SHA-1 hex digest of the alphabetically sorted
//! `key=value` pairs joined with `&`, followed by the API secret.

use std::collections::BTreeMap;

use assetdrop_shared::CloudinaryConfig;
use bytes::Bytes;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::debug;

use super::error::StoreError;
use super::{AssetStore, StoreConnector, StoredAsset, UploadParams};
use crate::deadline::Deadline;

/// Builds [`CloudinaryStore`] clients from account credentials.
#[derive(Debug, Clone)]
pub struct CloudinaryConnector {
    config: CloudinaryConfig,
}

impl CloudinaryConnector {
    /// Create a connector for the given account.
    #[must_use]
    pub fn new(config: CloudinaryConfig) -> Self {
        Self { config }
    }

    fn validate(&self) -> Result<Url, StoreError> {
        let CloudinaryConfig {
            cloud_name,
            api_key,
            api_secret,
            api_base,
        } = &self.config;

        if cloud_name.is_empty() || api_key.is_empty() || api_secret.is_empty() {
            return Err(StoreError::configuration(
                "cloud name, API key and API secret are required",
            ));
        }

        if !cloud_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StoreError::configuration(format!(
                "invalid cloud name '{cloud_name}'"
            )));
        }

        let base = Url::parse(api_base)
            .map_err(|e| StoreError::configuration(format!("invalid API base URL: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(StoreError::configuration(format!(
                "unsupported API base scheme '{}'",
                base.scheme()
            )));
        }

        Ok(base)
    }
}

impl StoreConnector for CloudinaryConnector {
    type Store = CloudinaryStore;

    fn connect(&self) -> Result<CloudinaryStore, StoreError> {
        let base = self.validate()?;

        let client = Client::builder()
            .user_agent(concat!("assetdrop/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::configuration(e.to_string()))?;

        let upload_url = format!(
            "{}/v1_1/{}/auto/upload",
            base.as_str().trim_end_matches('/'),
            self.config.cloud_name
        );

        Ok(CloudinaryStore {
            client,
            upload_url,
            api_key: self.config.api_key.clone(),
            api_secret: self.config.api_secret.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

/// Signed Cloudinary upload client.
#[derive(Clone)]
pub struct CloudinaryStore {
    client: Client,
    upload_url: String,
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for CloudinaryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryStore")
            .field("upload_url", &self.upload_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    bytes: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryStore {
    /// Upload endpoint this client posts to.
    #[must_use]
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

impl AssetStore for CloudinaryStore {
    async fn upload(
        &self,
        body: Bytes,
        params: &UploadParams,
        deadline: &Deadline,
    ) -> Result<StoredAsset, StoreError> {
        let mut signed = BTreeMap::new();
        if !params.folder.is_empty() {
            signed.insert("folder", params.folder.clone());
        }
        signed.insert("public_id", params.public_id.clone());
        signed.insert("timestamp", Utc::now().timestamp().to_string());
        let signature = sign(&signed, &self.api_secret);

        let length = body.len() as u64;
        let file = Part::stream_with_length(body, length).file_name(params.filename.clone());
        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.api_key.clone())
            .text("signature", signature);
        for (key, value) in signed {
            form = form.text(key, value);
        }

        let mut request = self.client.post(&self.upload_url).multipart(form);
        if let Some(remaining) = deadline.remaining() {
            request = request.timeout(remaining);
        }

        debug!(public_id = %params.public_id, bytes = length, "Posting to Cloudinary");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.ok();
            return Err(StoreError::rejected(
                status.as_u16(),
                rejection_message(status, text),
            ));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| StoreError::invalid_response(e.to_string()))?;

        if !parsed.secure_url.starts_with("https://") {
            return Err(StoreError::invalid_response(format!(
                "secure_url is not an HTTPS URL: {}",
                parsed.secure_url
            )));
        }

        Ok(StoredAsset {
            secure_url: parsed.secure_url,
            public_id: parsed.public_id,
            bytes: parsed.bytes,
        })
    }
}

/// Message for a non-success response: the error envelope's message, else
/// the raw body, else the status's canonical reason.
fn rejection_message(status: StatusCode, body: Option<String>) -> String {
    let body = body.filter(|text| !text.trim().is_empty());
    match body {
        Some(text) => serde_json::from_str::<ErrorEnvelope>(&text)
            .map_or(text, |envelope| envelope.error.message),
        None => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}

/// Serialize signed parameters as `k1=v1&k2=v2` in key order.
fn string_to_sign(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// SHA-1 request signature.
fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
