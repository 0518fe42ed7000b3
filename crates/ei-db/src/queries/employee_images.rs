//! Employee image record operations.
//!
//! Each employee owns exactly one row; its `images` column holds the whole
//! entry list as a JSON document, so every write replaces the document.

use chrono::Utc;
use ei_core::{EmployeeId, Error, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::EmployeeImageRecord;

const COLS: &str = "employee_id, images";

/// Fetch the record for an employee.
pub fn find_one(
    conn: &Connection,
    employee_id: &EmployeeId,
) -> Result<Option<EmployeeImageRecord>> {
    let q = format!("SELECT {COLS} FROM employee_images WHERE employee_id = ?1");
    conn.query_row(&q, [employee_id.as_str()], EmployeeImageRecord::from_row)
        .optional()
        .map_err(Error::persistence)
}

/// Insert or replace the record for `record.employee_id`.
///
/// `created_at` is kept from the first insert; `updated_at` is bumped on
/// every save.
pub fn save(conn: &Connection, record: &EmployeeImageRecord) -> Result<()> {
    let images = serde_json::to_string(&record.images).map_err(Error::persistence)?;
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO employee_images (employee_id, images, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(employee_id) DO UPDATE SET
            images = excluded.images,
            updated_at = excluded.updated_at",
        rusqlite::params![record.employee_id.as_str(), images, now],
    )
    .map_err(Error::persistence)?;

    Ok(())
}

/// Delete the record for an employee. Returns whether a row was removed.
pub fn delete_one(conn: &Connection, employee_id: &EmployeeId) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM employee_images WHERE employee_id = ?1",
            [employee_id.as_str()],
        )
        .map_err(Error::persistence)?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageEntry;
    use crate::pool::{get_conn, init_memory_pool, PooledConnection};

    fn setup() -> PooledConnection {
        let pool = init_memory_pool().unwrap();
        get_conn(&pool).unwrap()
    }

    fn eid(s: &str) -> EmployeeId {
        EmployeeId::new(s).unwrap()
    }

    fn created_at(conn: &Connection, id: &str) -> String {
        conn.query_row(
            "SELECT created_at FROM employee_images WHERE employee_id = ?1",
            [id],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn find_missing_is_none() {
        let conn = setup();
        assert!(find_one(&conn, &eid("E404")).unwrap().is_none());
    }

    #[test]
    fn save_then_find() {
        let conn = setup();
        let rec = EmployeeImageRecord::new(
            eid("E1"),
            vec![
                ImageEntry::new(Some("Photo A"), "uploads/images-1-a.png"),
                ImageEntry::new(None, "uploads/images-2-b.png"),
            ],
        );
        save(&conn, &rec).unwrap();

        let found = find_one(&conn, &eid("E1")).unwrap().unwrap();
        assert_eq!(found, rec);
        assert_eq!(found.images[1].title, "Untitled");
    }

    #[test]
    fn save_replaces_document_and_keeps_created_at() {
        let conn = setup();
        let mut rec = EmployeeImageRecord::new(eid("E1"), vec![ImageEntry::new(None, "p1")]);
        save(&conn, &rec).unwrap();
        let first_created = created_at(&conn, "E1");

        rec.images.push(ImageEntry::new(Some("second"), "p2"));
        save(&conn, &rec).unwrap();

        let found = find_one(&conn, &eid("E1")).unwrap().unwrap();
        assert_eq!(found.images.len(), 2);
        assert_eq!(created_at(&conn, "E1"), first_created);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM employee_images", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn empty_record_is_kept() {
        let conn = setup();
        save(&conn, &EmployeeImageRecord::new(eid("E1"), vec![])).unwrap();

        let found = find_one(&conn, &eid("E1")).unwrap().unwrap();
        assert!(found.images.is_empty());
    }

    #[test]
    fn delete_one_reports_removal() {
        let conn = setup();
        save(&conn, &EmployeeImageRecord::new(eid("E1"), vec![])).unwrap();

        assert!(delete_one(&conn, &eid("E1")).unwrap());
        assert!(!delete_one(&conn, &eid("E1")).unwrap());
        assert!(find_one(&conn, &eid("E1")).unwrap().is_none());
    }

    #[test]
    fn corrupt_document_is_persistence_error() {
        let conn = setup();
        conn.execute(
            "INSERT INTO employee_images (employee_id, images, created_at, updated_at)
             VALUES ('E1', 'not json', 'now', 'now')",
            [],
        )
        .unwrap();

        let err = find_one(&conn, &eid("E1")).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }
}
