//! Route handlers for the HTTP API.

pub mod delete;
pub mod health;
pub mod images;
pub mod upload;

use serde::Serialize;

/// Plain `{ "message": ... }` acknowledgement body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
