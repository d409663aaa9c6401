//! Crash-safe document writes.
//!
//! The plan document is written to a sibling temp file, flushed and then
//! renamed over the target, so a reader never observes a half-written plan.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PersistenceError, Result};

/// Serializes `value` as pretty JSON and replaces `path` atomically.
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| PersistenceError::DirectoryError {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    // Same directory keeps the rename on one filesystem.
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(&bytes).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Reads a JSON document, or `None` when the file does not exist yet.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::ReadError {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(Some(serde_json::from_slice(&data)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Doc {
        version: u32,
        names: Vec<String>,
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/plan.json");

        write_document(&path, &Doc { version: 1, names: vec![] }).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let doc = Doc {
            version: 2,
            names: vec!["Financial".to_string()],
        };

        write_document(&path, &doc).unwrap();
        let loaded: Option<Doc> = read_document(&path).unwrap();

        assert_eq!(loaded, Some(doc));
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempdir().unwrap();
        let loaded: Option<Doc> = read_document(&dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_corrupt_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.json");
        fs::write(&path, b"{not json").unwrap();

        let result: Result<Option<Doc>> = read_document(&path);
        assert!(matches!(result, Err(PersistenceError::SerializeError(_))));
    }
}
