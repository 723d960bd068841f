//! Directory-backed key/value storage
//!
//! One file per key. Lets the handoff slots outlive the process that wrote
//! them, which is how the CLI crosses its "navigation" boundary.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::KeyValueStore;
use crate::error::{ImageMatchError, Result};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(ImageMatchError::Storage(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ImageMatchError::Storage(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ImageMatchError::Storage(format!("Failed to create {}: {e}", self.dir.display()))
        })?;

        // Write-then-rename so a reader never sees a half-written slot.
        let tmp = path.with_extension("tmp");
        let written = std::fs::write(&tmp, value).and_then(|_| std::fs::rename(&tmp, &path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(ImageMatchError::Storage(format!(
                "Failed to write {}: {e}",
                path.display()
            )));
        }

        debug!(path = %path.display(), bytes = value.len(), "Wrote storage entry");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ImageMatchError::Storage(format!(
                "Failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_new_instance() {
        let dir = TempDir::new().unwrap();
        FileStore::new(dir.path().join("session"))
            .set("uploadedImage", "data:image/png;base64,AA==")
            .unwrap();

        let reopened = FileStore::new(dir.path().join("session"));
        assert_eq!(
            reopened.get("uploadedImage").unwrap().as_deref(),
            Some("data:image/png;base64,AA==")
        );
    }

    #[test]
    fn test_missing_and_removed_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.get("responseData").unwrap(), None);
        store.set("responseData", "{}").unwrap();
        store.remove("responseData").unwrap();
        store.remove("responseData").unwrap();
        assert_eq!(store.get("responseData").unwrap(), None);
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        // A directory in the slot's place makes the final rename fail
        std::fs::create_dir_all(dir.path().join("responseData").join("occupied")).unwrap();

        let err = store.set("responseData", "{}").unwrap_err();
        assert!(err.to_string().contains("Failed to write"));
        assert!(!dir.path().join("responseData.tmp").exists());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }
}
