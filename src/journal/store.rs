//! Entry store — the journal's persistence boundary.
//!
//! The free functions ([`insert_entry`], [`fetch_all`], [`remove_entry`]) are
//! the synchronous SQL layer; each runs in its own transaction. [`EntryStore`]
//! wraps them in an async, cheaply clonable handle that owns the connection
//! and moves every call onto tokio's blocking pool.

use rusqlite::{params, Connection, Row};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::{JournalError, Result};
use crate::journal::types::{Entry, EntryId, EntryInput, Photo};

const SELECT_ENTRIES: &str =
    r#"SELECT id, name, address, "order", price, rating, review, photo FROM entries ORDER BY id"#;

/// Insert one entry and return its assigned id. Nothing is written on error.
///
/// A non-finite price is stored as `0.0`; a negative one violates the
/// table's CHECK constraint.
pub fn insert_entry(conn: &mut Connection, input: &EntryInput) -> rusqlite::Result<EntryId> {
    let price = if input.price.is_finite() { input.price } else { 0.0 };
    let tx = conn.transaction()?;
    tx.execute(
        r#"INSERT INTO entries (name, address, "order", price, rating, review, photo)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
        params![
            input.name,
            input.address,
            input.order,
            price,
            input.rating,
            input.review,
            input.photo.as_ref().map(Photo::as_bytes),
        ],
    )?;
    let id = EntryId(tx.last_insert_rowid());
    tx.commit()?;
    Ok(id)
}

/// Read every entry in ascending id order.
pub fn fetch_all(conn: &mut Connection) -> rusqlite::Result<Vec<Entry>> {
    // Deferred transaction: a consistent snapshot for the whole scan
    let tx = conn.transaction()?;
    let entries = {
        let mut stmt = tx.prepare(SELECT_ENTRIES)?;
        let rows = stmt.query_map([], entry_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
    };
    tx.commit()?;
    Ok(entries)
}

/// Remove the entry with `id`. Returns whether a row was removed; a missing
/// id is not an error.
pub fn remove_entry(conn: &mut Connection, id: EntryId) -> rusqlite::Result<bool> {
    let tx = conn.transaction()?;
    let removed = tx.execute("DELETE FROM entries WHERE id = ?1", params![id.0])?;
    tx.commit()?;
    Ok(removed > 0)
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: EntryId(row.get(0)?),
        name: row.get(1)?,
        address: row.get(2)?,
        order: row.get(3)?,
        price: row.get(4)?,
        rating: row.get(5)?,
        review: row.get(6)?,
        photo: row.get::<_, Option<Vec<u8>>>(7)?.map(Photo),
    })
}

/// Where an [`EntryStore`] keeps its database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Private in-memory database; lost when the store is dropped.
    Memory,
}

/// Async handle over the journal database.
///
/// Constructed unopened; [`open`](Self::open) must succeed before any other
/// operation, otherwise they fail with [`JournalError::NotInitialized`].
/// Clones share the same connection.
#[derive(Debug, Clone)]
pub struct EntryStore {
    location: StoreLocation,
    conn: Arc<OnceLock<Mutex<Connection>>>,
}

impl EntryStore {
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            conn: Arc::new(OnceLock::new()),
        }
    }

    /// Create and open a store in one step.
    pub async fn open_at(location: StoreLocation) -> Result<Self> {
        let store = Self::new(location);
        store.open().await?;
        Ok(store)
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Open (or create) the database and install the schema if needed.
    /// Calling it again on an open store is a no-op.
    pub async fn open(&self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }

        let location = self.location.clone();
        let conn = tokio::task::spawn_blocking(move || match location {
            StoreLocation::File(path) => crate::db::open_database(path),
            StoreLocation::Memory => crate::db::open_memory_database(),
        })
        .await
        .map_err(|e| JournalError::ConnectionError(format!("open task failed: {e}")))??;

        // A concurrent open may have won; its connection is kept and ours dropped.
        let _ = self.conn.set(Mutex::new(conn));
        tracing::debug!(location = ?self.location, "entry store open");
        Ok(())
    }

    /// Insert a new entry and resolve with its assigned id.
    pub async fn add_entry(&self, input: EntryInput) -> Result<EntryId> {
        let id = self
            .with_conn(JournalError::WriteError, move |conn| {
                insert_entry(conn, &input).map_err(|e| JournalError::WriteError(e.to_string()))
            })
            .await?;
        tracing::info!(id = %id, "entry added");
        Ok(id)
    }

    /// All entries in ascending id order.
    pub async fn list_all(&self) -> Result<Vec<Entry>> {
        self.with_conn(JournalError::ReadError, |conn| {
            fetch_all(conn).map_err(|e| JournalError::ReadError(e.to_string()))
        })
        .await
    }

    /// Delete the entry with `id` if it exists. Resolves to whether a row
    /// was removed; a missing id is still a success.
    pub async fn delete_entry(&self, id: EntryId) -> Result<bool> {
        let removed = self
            .with_conn(JournalError::WriteError, move |conn| {
                remove_entry(conn, id).map_err(|e| JournalError::WriteError(e.to_string()))
            })
            .await?;
        if removed {
            tracing::info!(id = %id, "entry deleted");
        } else {
            tracing::debug!(id = %id, "delete of missing entry ignored");
        }
        Ok(removed)
    }

    /// Run `f` against the connection on the blocking pool. Task and lock
    /// failures are reported through `fail`.
    async fn with_conn<T, F>(&self, fail: fn(String) -> JournalError, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        if !self.is_open() {
            return Err(JournalError::NotInitialized);
        }

        let cell = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mutex = cell.get().ok_or(JournalError::NotInitialized)?;
            let mut conn = mutex
                .lock()
                .map_err(|e| fail(format!("db lock poisoned: {e}")))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| fail(format!("db task failed: {e}")))?
    }
}
