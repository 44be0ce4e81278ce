//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for health and image uploads
//! - JSON error responses
//! - Router assembly with tracing, CORS and body limits

pub mod error;
pub mod routes;

use std::sync::Arc;

use assetdrop_core::Deadline;
use assetdrop_core::storage::StoreBackend;
use assetdrop_core::upload::Uploader;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, COOKIE};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Multipart framing allowance on top of the maximum file size.
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload pipeline bound to the configured store.
    pub uploader: Arc<Uploader<StoreBackend>>,
    /// Server-wide deadline, cancelled on shutdown.
    pub shutdown: Deadline,
}

impl AppState {
    /// Create state around `uploader` with a fresh shutdown deadline.
    #[must_use]
    pub fn new(uploader: Uploader<StoreBackend>) -> Self {
        Self {
            uploader: Arc::new(uploader),
            shutdown: Deadline::never(),
        }
    }

    /// Use `shutdown` as the outer deadline for every upload.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: Deadline) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Request body limit: maximum file size plus multipart framing.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.uploader.policy().max_file_size())
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.body_limit();

    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new([AUTHORIZATION, COOKIE]))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
