//! Blob storage and the image workflows built on it.

pub mod service;
pub mod storage;

pub use service::{BlobDeleteFailure, CleanupReport, DeleteOutcome, ImageService, IncomingFile};
pub use storage::{BlobStore, DiskBlobStore, UPLOADS_PREFIX};
