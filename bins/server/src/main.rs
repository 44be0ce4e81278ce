//! Assetdrop API Server
//!
//! Main entry point for the image upload service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use assetdrop_api::{AppState, create_router};
use assetdrop_core::Deadline;
use assetdrop_core::storage::{StoreBackend, StoreConnector};
use assetdrop_core::upload::Uploader;
use assetdrop_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load().context("failed to load configuration")?;

    // Fail fast on bad credentials instead of on the first upload
    let backend =
        StoreBackend::from_config(&config.store).context("invalid store configuration")?;
    backend
        .connect()
        .context("failed to build store client")?;

    let uploader = Uploader::from_config(backend, &config.upload);
    info!(
        store = uploader.connector().name(),
        folder = %uploader.folder(),
        max_file_size = uploader.policy().max_file_size(),
        timeout_secs = uploader.timeout().as_secs(),
        "Upload pipeline configured"
    );

    let shutdown = Deadline::never();
    let state = AppState::new(uploader).with_shutdown(shutdown.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Plain text logs by default, JSON when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "assetdrop=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves on Ctrl+C or SIGTERM and cancels in-flight uploads.
async fn shutdown_signal(shutdown: Deadline) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, cancelling in-flight uploads");
    shutdown.cancel();
}
