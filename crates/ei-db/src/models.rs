//! Record models stored in the document store.
//!
//! An [`EmployeeImageRecord`] is one document: the employee key plus the
//! ordered list of [`ImageEntry`] values embedded in it.

use ei_core::EmployeeId;
use serde::{Deserialize, Serialize};

/// Title given to entries uploaded without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// One titled reference to a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub title: String,
    /// Storage-relative location of the blob, e.g. `uploads/images-1718-42.png`.
    pub path: String,
}

impl ImageEntry {
    /// Build an entry, substituting [`DEFAULT_TITLE`] for a missing or empty title.
    pub fn new(title: Option<&str>, path: impl Into<String>) -> Self {
        let title = match title {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_TITLE.to_string(),
        };
        Self {
            title,
            path: path.into(),
        }
    }
}

/// All images of one employee, in upload order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeImageRecord {
    pub employee_id: EmployeeId,
    pub images: Vec<ImageEntry>,
}

impl EmployeeImageRecord {
    /// A fresh record holding exactly `images`.
    pub fn new(employee_id: EmployeeId, images: Vec<ImageEntry>) -> Self {
        Self {
            employee_id,
            images,
        }
    }

    /// Index of the first entry whose path contains `fragment`.
    pub fn position_of(&self, fragment: &str) -> Option<usize> {
        self.images.iter().position(|img| img.path.contains(fragment))
    }

    /// Build from a row of `employee_id, images`.
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let raw_id: String = row.get(0)?;
        let employee_id = EmployeeId::new(raw_id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let images_json: String = row.get(1)?;
        let images = serde_json::from_str(&images_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            employee_id,
            images,
        })
    }
}
