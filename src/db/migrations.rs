//! Forward-only schema upgrades.
//!
//! Tracks the schema version in `schema_meta`. A fresh database reports
//! version 0; [`run_migrations`] walks it up to [`CURRENT_SCHEMA_VERSION`],
//! one transaction per step.

use rusqlite::{Connection, OptionalExtension};

/// The schema version that the current binary expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Outcome of a migration run that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The database was already at the current version.
    UpToDate,
    /// One or more upgrade steps ran.
    Upgraded { from: u32, to: u32 },
    /// The database was written by a newer binary.
    TooNew { stored: u32 },
}

/// Get the current schema version from the database. `0` when never upgraded.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let val: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(val.and_then(|v| v.parse::<u32>().ok()).unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: u32) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        [version.to_string()],
    )?;
    Ok(())
}

/// Run any pending upgrades. Each step and its version bump commit together.
pub fn run_migrations(conn: &mut Connection) -> rusqlite::Result<MigrationOutcome> {
    let start = get_schema_version(conn)?;
    tracing::debug!(schema_version = start, target = CURRENT_SCHEMA_VERSION, "checking migrations");

    if start > CURRENT_SCHEMA_VERSION {
        return Ok(MigrationOutcome::TooNew { stored: start });
    }
    if start == CURRENT_SCHEMA_VERSION {
        return Ok(MigrationOutcome::UpToDate);
    }

    let mut version = start;
    while version < CURRENT_SCHEMA_VERSION {
        let next = version + 1;
        tracing::info!(from = version, to = next, "running migration");

        let tx = conn.transaction()?;
        match next {
            1 => migrate_v0_to_v1(&tx)?,
            _ => {
                tracing::error!(version = next, "unknown migration target");
                break;
            }
        }
        set_schema_version(&tx, next)?;
        tx.commit()?;

        version = next;
    }

    Ok(MigrationOutcome::Upgraded { from: start, to: version })
}

/// Migration v0 → v1: install the entry container and its lookup indexes.
fn migrate_v0_to_v1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(super::schema::ENTRIES_V1_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::init_meta(&conn).unwrap();
        conn
    }

    #[test]
    fn fresh_db_reports_version_0() {
        let conn = test_db();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn run_migrations_upgrades_to_current() {
        let mut conn = test_db();
        let outcome = run_migrations(&mut conn).unwrap();
        assert_eq!(outcome, MigrationOutcome::Upgraded { from: 0, to: 1 });
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn migrations_are_idempotent() {
        let mut conn = test_db();
        run_migrations(&mut conn).unwrap();
        conn.execute("INSERT INTO entries (name) VALUES ('Luna')", [])
            .unwrap();

        assert_eq!(run_migrations(&mut conn).unwrap(), MigrationOutcome::UpToDate);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn newer_stored_version_is_reported() {
        let mut conn = test_db();
        set_schema_version(&conn, 7).unwrap();
        assert_eq!(
            run_migrations(&mut conn).unwrap(),
            MigrationOutcome::TooNew { stored: 7 }
        );
    }
}
