//! ei-server: HTTP API, blob storage, and image workflows.
//!
//! This crate ties the document store and on-disk blob storage together
//! into a running server application. It provides:
//!
//! - Axum-based HTTP API for uploading, listing, and deleting images
//! - Static serving of uploaded files under `/uploads`
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod images;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use ei_core::config::Config;
use ei_db::store::SqliteDocumentStore;
use tokio::signal;

use crate::context::AppContext;
use crate::images::{DiskBlobStore, ImageService};

/// Start the employee-images server.
///
/// Creates the upload and database directories, opens the database, and
/// serves HTTP until a shutdown signal is received.
pub async fn start(config: Config) -> ei_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let blobs = DiskBlobStore::new(&config.storage.upload_dir);
    blobs.ensure_dir().await?;
    tracing::info!("Storing uploads in {}", blobs.base_dir().display());

    let db_path = &config.server.db_path;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let pool = ei_db::pool::init_pool(db_path)?;
    tracing::info!("Database opened at {}", db_path.display());

    let images = ImageService::new(
        Arc::new(SqliteDocumentStore::new(pool)),
        Arc::new(blobs),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| ei_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let app = router::build_router(AppContext::new(config, images));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ei_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
