//! ei-db: document persistence for employee image records.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, the record models, and the [`store::DocumentStore`]
//! seam the image workflows are written against.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;
