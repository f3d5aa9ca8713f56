//! Photo codec: image file → storable blob.

use std::path::Path;

use crate::error::{JournalError, Result};
use crate::journal::types::Photo;

/// Read the whole file into a [`Photo`].
pub async fn encode(path: impl AsRef<Path>) -> Result<Photo> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| JournalError::DecodeError {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "photo encoded");
    Ok(Photo(bytes))
}

/// Like [`encode`], but no file means no photo.
pub async fn encode_optional(path: Option<&Path>) -> Result<Option<Photo>> {
    match path {
        Some(path) => encode(path).await.map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = encode(dir.path().join("nope.jpg")).await.unwrap_err();
        assert!(matches!(err, JournalError::DecodeError { .. }));
    }

    #[tokio::test]
    async fn directory_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            encode(dir.path()).await,
            Err(JournalError::DecodeError { .. })
        ));
    }

    #[tokio::test]
    async fn absent_input_is_no_photo() {
        assert_eq!(encode_optional(None).await.unwrap(), None);
    }
}
