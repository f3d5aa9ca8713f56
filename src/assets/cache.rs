//! Named, versioned response caches persisted in SQLite.
//!
//! Each cache is a set of rows sharing a `cache_name` (for example
//! `brewlog-v1`). Bumping the version produces a new name; older caches are
//! left in place.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::{AssetRequest, AssetResponse, CacheError};

const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cached_responses (
    cache_name TEXT NOT NULL,
    method TEXT NOT NULL,
    url TEXT NOT NULL,
    status INTEGER NOT NULL,
    content_type TEXT,
    body BLOB NOT NULL,
    cached_at TEXT NOT NULL,
    PRIMARY KEY (cache_name, method, url)
);
"#;

/// Handle to the response cache database. Clones share one connection.
#[derive(Debug, Clone)]
pub struct AssetCache {
    conn: Arc<Mutex<Connection>>,
}

impl AssetCache {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CacheError::Storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let conn = Connection::open(path)
            .map_err(|e| CacheError::Storage(format!("{}: {e}", path.display())))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, CacheError> {
        conn.execute_batch(CACHE_SCHEMA).map_err(storage)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|e| CacheError::Storage(format!("cache lock poisoned: {e}")))
    }

    /// Store every pair under `cache_name` in a single transaction.
    pub fn put_all(
        &self,
        cache_name: &str,
        responses: &[(AssetRequest, AssetResponse)],
    ) -> Result<(), CacheError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(storage)?;
        let now = chrono::Utc::now().to_rfc3339();
        for (request, response) in responses {
            tx.execute(
                "INSERT OR REPLACE INTO cached_responses \
                 (cache_name, method, url, status, content_type, body, cached_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    cache_name,
                    request.method,
                    request.url,
                    response.status,
                    response.content_type,
                    response.body,
                    now,
                ],
            )
            .map_err(storage)?;
        }
        tx.commit().map_err(storage)?;
        Ok(())
    }

    /// Exact match on method and URL within `cache_name`.
    pub fn match_request(
        &self,
        cache_name: &str,
        request: &AssetRequest,
    ) -> Result<Option<AssetResponse>, CacheError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT status, content_type, body FROM cached_responses \
             WHERE cache_name = ?1 AND method = ?2 AND url = ?3",
            params![cache_name, request.method, request.url],
            |row| {
                Ok(AssetResponse {
                    status: row.get(0)?,
                    content_type: row.get(1)?,
                    body: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(storage)
    }

    /// How many of `requests` already have a stored response in `cache_name`.
    pub fn count_present(
        &self,
        cache_name: &str,
        requests: &[AssetRequest],
    ) -> Result<usize, CacheError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare_cached(
                "SELECT COUNT(*) FROM cached_responses \
                 WHERE cache_name = ?1 AND method = ?2 AND url = ?3",
            )
            .map_err(storage)?;
        let mut present = 0;
        for request in requests {
            let n: i64 = stmt
                .query_row(params![cache_name, request.method, request.url], |row| row.get(0))
                .map_err(storage)?;
            if n > 0 {
                present += 1;
            }
        }
        Ok(present)
    }

    /// Names of every cache that holds at least one response.
    pub fn cache_names(&self) -> Result<Vec<String>, CacheError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT cache_name FROM cached_responses ORDER BY cache_name")
            .map_err(storage)?;
        let names = stmt
            .query_map([], |row| row.get(0))
            .map_err(storage)?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(storage)?;
        Ok(names)
    }
}

fn storage(e: rusqlite::Error) -> CacheError {
    CacheError::Storage(e.to_string())
}
