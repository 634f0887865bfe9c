use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use super::KeyValueStore;
use crate::{Error, Result};

/// Store persisted as a single JSON object file
///
/// Every call re-reads the file so that separate processes sharing the file
/// see each other's writes (last writer wins). A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(Error::StorageError(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| Error::StorageReadError {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::StorageError(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }
        let body = serde_json::to_string_pretty(values)
            .map_err(|e| Error::StorageError(format!("Failed to serialize store: {}", e)))?;
        fs::write(&self.path, body).map_err(|e| {
            Error::StorageError(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced.
        let mut values = match self.read_all() {
            Ok(v) => v,
            Err(Error::StorageReadError { reason, .. }) => {
                debug!("Discarding unreadable store {}: {}", self.path.display(), reason);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}
