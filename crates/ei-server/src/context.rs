//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use ei_core::config::Config;

use crate::images::ImageService;

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Upload, query, and delete workflows.
    pub images: Arc<ImageService>,
}

impl AppContext {
    pub fn new(config: Config, images: ImageService) -> Self {
        Self {
            config: Arc::new(config),
            images: Arc::new(images),
        }
    }
}
