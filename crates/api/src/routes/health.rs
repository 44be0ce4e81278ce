//! Liveness endpoint.

use assetdrop_core::storage::StoreConnector;
use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Configured storage backend (`cloudinary`, `s3`, `azure_blob`, `local`).
    pub store: &'static str,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        store: state.uploader.connector().name(),
    })
}

/// `GET /health`
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
