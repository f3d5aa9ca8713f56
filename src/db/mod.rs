pub mod migrations;
pub mod schema;

use rusqlite::Connection;
use std::path::Path;

use crate::error::{JournalError, Result};
use migrations::MigrationOutcome;

/// Open (or create) the journal database at the given path with the schema
/// brought up to [`migrations::CURRENT_SCHEMA_VERSION`].
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| JournalError::StorageUnavailable {
            path: parent.to_path_buf(),
            reason: e.to_string(),
        })?;
    }

    let conn = Connection::open(path).map_err(|e| {
        JournalError::ConnectionError(format!("{}: {e}", path.display()))
    })?;

    // WAL lets readers proceed while a write transaction is open
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| JournalError::ConnectionError(format!("{}: {e}", path.display())))?;

    let conn = prepare(conn)?;
    tracing::info!(path = %path.display(), "journal database initialized");
    Ok(conn)
}

/// Open an in-memory database. Used by tests and throwaway sessions.
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|e| JournalError::ConnectionError(e.to_string()))?;
    prepare(conn)
}

fn prepare(mut conn: Connection) -> Result<Connection> {
    schema::init_meta(&conn)
        .map_err(|e| JournalError::ConnectionError(format!("failed to initialize schema: {e}")))?;

    match migrations::run_migrations(&mut conn)
        .map_err(|e| JournalError::ConnectionError(format!("failed to run migrations: {e}")))?
    {
        MigrationOutcome::TooNew { stored } => Err(JournalError::ConnectionError(format!(
            "database schema version {stored} is newer than supported version {}",
            migrations::CURRENT_SCHEMA_VERSION
        ))),
        MigrationOutcome::Upgraded { from, to } => {
            tracing::info!(from, to, "journal schema upgraded");
            Ok(conn)
        }
        MigrationOutcome::UpToDate => Ok(conn),
    }
}
