//! Error taxonomy for the journal.
//!
//! Every store, query and codec operation resolves to `Result<_, JournalError>`.
//! Callers at the presentation boundary map each variant to a user-facing
//! message.

use std::path::PathBuf;

/// Failure of a journal operation.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// The storage location cannot be provisioned (no data directory, or its
    /// parent cannot be created).
    #[error("persistent storage unavailable at {path}: {reason}")]
    StorageUnavailable { path: PathBuf, reason: String },

    /// Opening the database failed for any other reason.
    #[error("failed to open journal database: {0}")]
    ConnectionError(String),

    /// An operation was issued before [`EntryStore::open`](crate::journal::EntryStore::open)
    /// succeeded.
    #[error("journal store used before it was opened")]
    NotInitialized,

    #[error("write failed: {0}")]
    WriteError(String),

    #[error("read failed: {0}")]
    ReadError(String),

    /// A photo file could not be read.
    #[error("failed to read photo {path}: {source}")]
    DecodeError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = JournalError> = std::result::Result<T, E>;
