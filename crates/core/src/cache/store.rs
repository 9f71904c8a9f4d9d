//! Plain-file storage shared by the page and query caches.
//!
//! A readable file at the derived path is a valid entry; there is no index
//! and no expiry metadata. Writes land in a temporary sibling first and are
//! renamed into place, so readers never observe a partial file. Concurrent
//! writers of the same key race, and the last rename wins.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Error;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create `dir` and its parents if missing. Idempotent.
pub async fn ensure_dir(dir: &Path) -> Result<(), Error> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::Cache(format!("failed to create {}: {}", dir.display(), e)))
}

/// Read a cache entry as UTF-8 text.
///
/// Returns None when the file is absent or unreadable.
pub async fn read_text(path: &Path) -> Option<String> {
    match tokio::fs::read(path).await {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(_) => {
                tracing::debug!("cache entry {} is not valid UTF-8", path.display());
                None
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::debug!("cache entry {} unreadable: {}", path.display(), e);
            None
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}.{}.tmp", std::process::id(), seq));
    path.with_file_name(name)
}

/// Replace the file at `path` with `bytes` in a single rename.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let tmp = temp_path_for(path);
    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        return Err(Error::Cache(format!("failed to write {}: {}", tmp.display(), e)));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(Error::Cache(format!("failed to replace {}: {}", path.display(), e)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.cache");

        write_atomic(&path, b"hello").await.unwrap();
        assert_eq!(read_text(&path).await.as_deref(), Some("hello"));

        write_atomic(&path, b"replaced").await.unwrap();
        assert_eq!(read_text(&path).await.as_deref(), Some("replaced"));
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.cache");
        write_atomic(&path, b"data").await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["entry.cache".to_string()]);
    }

    #[tokio::test]
    async fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_text(&dir.path().join("absent.cache")).await.is_none());
    }

    #[tokio::test]
    async fn test_read_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.cache");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(read_text(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_ensure_dir_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).await.unwrap();
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("entry.cache");
        assert!(matches!(write_atomic(&path, b"x").await, Err(Error::Cache(_))));
    }
}
