use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;
use crate::{Error, Result};

/// In-process store backed by a `Mutex<HashMap>`
///
/// Used by tests and by sessions that should not leave anything on disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.values.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let g = self
            .values
            .lock()
            .map_err(|_| Error::StorageError("memory store lock poisoned".into()))?;
        Ok(g.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut g = self
            .values
            .lock()
            .map_err(|_| Error::StorageError("memory store lock poisoned".into()))?;
        g.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut g = self
            .values
            .lock()
            .map_err(|_| Error::StorageError("memory store lock poisoned".into()))?;
        g.remove(key);
        Ok(())
    }
}
