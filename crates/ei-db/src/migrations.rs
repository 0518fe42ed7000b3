//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use ei_core::{Error, Result};
use rusqlite::Connection;

/// V1: one JSON document of image entries per employee.
const V1_EMPLOYEE_IMAGES: &str = r#"
CREATE TABLE employee_images (
    employee_id TEXT PRIMARY KEY NOT NULL,
    images      TEXT NOT NULL DEFAULT '[]',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_EMPLOYEE_IMAGES)];

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::persistence(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(Error::persistence)?;

        if already {
            continue;
        }

        let tx = conn.unchecked_transaction().map_err(Error::persistence)?;

        tx.execute_batch(sql)
            .map_err(|e| Error::persistence(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(Error::persistence)?;

        tx.commit().map_err(Error::persistence)?;

        tracing::debug!("Applied migration V{version}");
    }

    Ok(())
}
