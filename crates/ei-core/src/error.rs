//! Unified error type for the employee-images service.
//!
//! Every workflow funnels its failures into [`Error`], which carries enough
//! context for API handlers to derive an HTTP status code via
//! [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes of the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An upload request carried no image files.
    #[error("No files uploaded")]
    NoFilesProvided,

    /// A query found no image record for the employee.
    #[error("No images found for employee {employee_id}")]
    NotFound {
        /// The employee identifier that was looked up.
        employee_id: String,
    },

    /// A delete targeted an employee without a record.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee identifier that was looked up.
        employee_id: String,
    },

    /// No entry of the employee's record matched the filename fragment.
    #[error("Image not found: {filename} (employee {employee_id})")]
    ImageNotFound {
        /// The employee whose record was scanned.
        employee_id: String,
        /// The filename fragment that matched nothing.
        filename: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The document store rejected a read or write.
    #[error("Persistence failure: {source}")]
    Persistence {
        /// The underlying store error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Writing an uploaded blob to storage failed.
    #[error("Failed to write blob {path}: {source}")]
    BlobWrite {
        /// Target path of the blob.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Removing a blob from storage failed.
    ///
    /// Delete workflows never return this to callers; it is collected into
    /// their cleanup report instead.
    #[error("Failed to delete blob {path}: {source}")]
    BlobDelete {
        /// Recorded path of the blob.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NoFilesProvided => 400,
            Error::Validation(_) => 400,
            Error::NotFound { .. } => 404,
            Error::EmployeeNotFound { .. } => 404,
            Error::ImageNotFound { .. } => 404,
            Error::Persistence { .. } => 500,
            Error::BlobWrite { .. } => 500,
            Error::BlobDelete { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NoFilesProvided => "no_files_provided",
            Error::NotFound { .. } => "not_found",
            Error::EmployeeNotFound { .. } => "employee_not_found",
            Error::ImageNotFound { .. } => "image_not_found",
            Error::Validation(_) => "validation_error",
            Error::Persistence { .. } => "persistence_failure",
            Error::BlobWrite { .. } => "blob_write_failure",
            Error::BlobDelete { .. } => "blob_delete_failure",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(employee_id: impl fmt::Display) -> Self {
        Error::NotFound {
            employee_id: employee_id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::EmployeeNotFound`].
    pub fn employee_not_found(employee_id: impl fmt::Display) -> Self {
        Error::EmployeeNotFound {
            employee_id: employee_id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::ImageNotFound`].
    pub fn image_not_found(employee_id: impl fmt::Display, filename: impl Into<String>) -> Self {
        Error::ImageNotFound {
            employee_id: employee_id.to_string(),
            filename: filename.into(),
        }
    }

    /// Convenience constructor for [`Error::Persistence`].
    pub fn persistence(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Persistence {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::BlobWrite`].
    pub fn blob_write(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::BlobWrite {
            path: path.into(),
            source,
        }
    }

    /// Convenience constructor for [`Error::BlobDelete`].
    pub fn blob_delete(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::BlobDelete {
            path: path.into(),
            source,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
