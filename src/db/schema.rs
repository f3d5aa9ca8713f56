//! SQL DDL for the journal database.
//!
//! `schema_meta` is created unconditionally on every open; the `entries`
//! table and its indexes belong to schema version 1 and are installed by the
//! upgrade step in [`super::migrations`].

use rusqlite::Connection;

/// Bookkeeping table. Holds `schema_version` once an upgrade has run.
const META_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Version 1: the entry container plus the two non-unique lookup indexes.
///
/// AUTOINCREMENT keeps ids from being reused after the highest row is deleted.
pub(crate) const ENTRIES_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK(length(name) > 0),
    address TEXT NOT NULL DEFAULT '',
    "order" TEXT NOT NULL DEFAULT '',
    price REAL NOT NULL DEFAULT 0 CHECK(price >= 0),
    rating INTEGER CHECK(rating IS NULL OR (rating BETWEEN 1 AND 5)),
    review TEXT NOT NULL DEFAULT '',
    photo BLOB
);

CREATE INDEX IF NOT EXISTS idx_entries_name ON entries(name);
CREATE INDEX IF NOT EXISTS idx_entries_order ON entries("order");
"#;

/// Create the metadata table. Idempotent.
pub fn init_meta(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(META_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_names(conn: &Connection, kind: &str) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type = ?1 ORDER BY name")
            .unwrap()
            .query_map([kind], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn meta_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_meta(&conn).unwrap();
        init_meta(&conn).unwrap();
        assert_eq!(object_names(&conn, "table"), vec!["schema_meta".to_string()]);
    }

    #[test]
    fn v1_creates_entries_and_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(ENTRIES_V1_SQL).unwrap();

        assert!(object_names(&conn, "table").contains(&"entries".to_string()));
        let indexes = object_names(&conn, "index");
        assert!(indexes.contains(&"idx_entries_name".to_string()));
        assert!(indexes.contains(&"idx_entries_order".to_string()));
    }

    #[test]
    fn v1_rejects_out_of_range_rating() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(ENTRIES_V1_SQL).unwrap();

        let err = conn
            .execute("INSERT INTO entries (name, rating) VALUES ('Luna', 9)", [])
            .unwrap_err();
        assert!(err.to_string().contains("CHECK constraint failed"));
    }
}
