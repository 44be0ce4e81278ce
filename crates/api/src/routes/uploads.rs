//! Image upload endpoint.
//!
//! `POST /uploads` accepts `multipart/form-data` with:
//! - `file`: the image (required, exactly once)
//! - `name`: logical name of the stored object (optional, defaults to the
//!   filename without its extension)

use assetdrop_core::upload::{FileSource, MemoryFile, strip_extension};
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

/// Creates the upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/uploads", post(upload_image))
}

/// Response for a stored image.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// HTTPS URL of the stored image.
    pub url: String,
    /// Identifier assigned by the store.
    pub public_id: String,
}

/// Parsed multipart form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<MemoryFile>,
    name: Option<String>,
}

impl UploadForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let field_name = field.name().map(str::to_owned);
            match field_name.as_deref() {
                Some("file") => {
                    if form.file.is_some() {
                        return Err(ApiError::bad_request("exactly one 'file' field is allowed"));
                    }
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await.map_err(multipart_error)?;
                    form.file = Some(MemoryFile::new(filename, data));
                }
                Some("name") => {
                    let name = field.text().await.map_err(multipart_error)?;
                    form.name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
                }
                other => debug!(field = ?other, "Ignoring multipart field"),
            }
        }

        Ok(form)
    }
}

/// Logical name for an upload: the explicit name, else the filename stem,
/// else a random identifier.
fn logical_name(explicit: Option<String>, filename: &str) -> String {
    explicit
        .or_else(|| Some(strip_extension(filename)).filter(|stem| !stem.is_empty()))
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(err.body_text())
    } else {
        ApiError::bad_request(err.body_text())
    }
}

/// POST `/uploads`
async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let form = UploadForm::read(&mut multipart).await?;
    let file = form
        .file
        .ok_or_else(|| ApiError::bad_request("missing 'file' field"))?;
    let name = logical_name(form.name, file.filename());

    info!(
        filename = %file.filename(),
        size = file.declared_size(),
        name = %name,
        "Upload received"
    );

    let asset = state
        .uploader
        .upload_asset(&file, &name, &state.shutdown)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: asset.secure_url,
            public_id: asset.public_id,
        }),
    ))
}
