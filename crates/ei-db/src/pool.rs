//! SQLite connection pools for the employee image store.
//!
//! Uploads and deletes for different employees write concurrently through
//! the pool, so every connection waits on a locked database for up to
//! [`BUSY_TIMEOUT_MS`] instead of failing immediately with `SQLITE_BUSY`.

use std::path::Path;

use ei_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Connections kept per pool.
const POOL_SIZE: u32 = 4;

/// How long a connection waits on a write lock held elsewhere.
pub const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Open (or create) the store at `db_path` and apply pending migrations.
///
/// Connections run in WAL mode so readers of one employee's record are not
/// blocked by another employee's upload.
pub fn init_pool(db_path: &Path) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
        ))
    });

    let pool = build(manager).map_err(|e| {
        Error::persistence(format!("Failed to open {}: {e}", db_path.display()))
    })?;
    tracing::debug!(path = %db_path.display(), "Opened image store");
    Ok(pool)
}

/// Create a private in-memory store (useful for tests).
///
/// Each call names its own shared-cache database, so pools never see each
/// other's records while connections within one pool share state.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);

    let uri = format!("file:ei_images_{n}?mode=memory&cache=shared");
    let manager = SqliteConnectionManager::file(uri).with_init(|conn| {
        conn.execute_batch(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"))
    });

    build(manager)
        .map_err(|e| Error::persistence(format!("Failed to open in-memory store: {e}")))
}

fn build(manager: SqliteConnectionManager) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(Error::persistence)?;

    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;

    Ok(pool)
}

/// Check a connection out of the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::persistence(format!("No database connection available: {e}")))
}
