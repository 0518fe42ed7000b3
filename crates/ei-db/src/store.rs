//! Document store seam used by the image workflows.
//!
//! Workflows only see [`DocumentStore`]; [`SqliteDocumentStore`] is the
//! production implementation over the r2d2 pool.

use async_trait::async_trait;
use ei_core::{EmployeeId, Result};

use crate::models::EmployeeImageRecord;
use crate::pool::{get_conn, DbPool};
use crate::queries::employee_images;

/// Persistence for one [`EmployeeImageRecord`] per employee.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the record for an employee, if any.
    async fn find_one(&self, employee_id: &EmployeeId) -> Result<Option<EmployeeImageRecord>>;

    /// Insert or replace the whole record. All-or-nothing for that document.
    async fn save(&self, record: &EmployeeImageRecord) -> Result<()>;

    /// Remove the record. Returns whether one existed.
    async fn delete_one(&self, employee_id: &EmployeeId) -> Result<bool>;
}

/// [`DocumentStore`] backed by the SQLite `employee_images` table.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: DbPool,
}

impl SqliteDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn find_one(&self, employee_id: &EmployeeId) -> Result<Option<EmployeeImageRecord>> {
        let conn = get_conn(&self.pool)?;
        employee_images::find_one(&conn, employee_id)
    }

    async fn save(&self, record: &EmployeeImageRecord) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        employee_images::save(&conn, record)
    }

    async fn delete_one(&self, employee_id: &EmployeeId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        employee_images::delete_one(&conn, employee_id)
    }
}
