//! ei-core: shared error type, identifiers, and configuration.
//!
//! This crate is the foundational dependency for the other ei-* crates. It
//! owns the error taxonomy every workflow reports through, the
//! [`EmployeeId`] key type, and the application [`config`].

pub mod config;
pub mod error;
pub mod ids;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::EmployeeId;
