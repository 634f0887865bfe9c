//! Persistent key-value storage used for streak state, preferences and caches
//!
//! The core never talks to a concrete backend directly. Every component that
//! persists something takes a `KeyValueStore` so tests can inject an in-memory
//! store while the CLI uses a JSON file on disk.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::Result;

/// Key used for the JSON-encoded streak state
pub const STREAK_KEY: &str = "gitapath_streak";
/// Key holding `"en"` or `"hi"`
pub const LANGUAGE_KEY: &str = "gitapath_language";
/// Key holding `"dark"` or `"light"`
pub const THEME_KEY: &str = "gitapath_appearance";
/// Key holding the JSON-encoded profile badge
pub const PROFILE_KEY: &str = "gitapath_profile";
/// Key holding the last successfully loaded verse dataset
pub const DATASET_CACHE_KEY: &str = "gitapath_verses_cache";

/// String-to-string store. Reads and writes are not transactional; the last
/// writer wins.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key if present
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(store: &dyn KeyValueStore) {
        store.set(LANGUAGE_KEY, "hi").unwrap();
        assert_eq!(store.get(LANGUAGE_KEY).unwrap().as_deref(), Some("hi"));
        store.remove(LANGUAGE_KEY).unwrap();
        assert!(store.get(LANGUAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn boxed_store_delegates() {
        let boxed: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        roundtrip(&boxed);
    }
}
