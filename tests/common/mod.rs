//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temporary upload
//! directory, and a full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use ei_core::config::Config;
use ei_db::pool::init_memory_pool;
use ei_db::store::SqliteDocumentStore;
use ei_server::context::AppContext;
use ei_server::images::{DiskBlobStore, ImageService};
use ei_server::router::build_router;
use reqwest::multipart::{Form, Part};
use tempfile::TempDir;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a temporary upload directory.
pub struct TestHarness {
    pub ctx: AppContext,
    upload_dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The upload
    /// directory is always replaced by a fresh temporary one.
    pub fn with_config(mut config: Config) -> Self {
        let upload_dir = tempfile::tempdir().expect("failed to create upload dir");
        config.storage.upload_dir = upload_dir.path().to_path_buf();

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let images = ImageService::new(
            Arc::new(SqliteDocumentStore::new(db)),
            Arc::new(DiskBlobStore::new(upload_dir.path())),
        );

        Self {
            ctx: AppContext::new(config, images),
            upload_dir,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// On-disk location of a recorded `uploads/<name>` path.
    pub fn blob_path(&self, recorded: &str) -> PathBuf {
        let name = recorded.strip_prefix("uploads/").unwrap_or(recorded);
        self.upload_dir.path().join(name)
    }

    /// Number of files currently in the upload directory.
    pub fn blob_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("failed to read upload dir")
            .count()
    }
}

/// Build an upload form with the given files and titles.
pub fn upload_form(employee_id: &str, files: &[(&str, &[u8])], titles: &[&str]) -> Form {
    let mut form = Form::new().text("employeeId", employee_id.to_string());
    for title in titles {
        form = form.text("titles", title.to_string());
    }
    for (name, data) in files {
        form = form.part(
            "images",
            Part::bytes(data.to_vec()).file_name(name.to_string()),
        );
    }
    form
}

/// POST `/upload` and return the raw response.
pub async fn upload(
    addr: SocketAddr,
    employee_id: &str,
    files: &[(&str, &[u8])],
    titles: &[&str],
) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(upload_form(employee_id, files, titles))
        .send()
        .await
        .unwrap()
}
