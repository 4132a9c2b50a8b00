//! Key-value store abstraction
//!
//! This module defines the string-keyed, string-valued store the storefront
//! persists its state in, plus an in-memory implementation used in tests and
//! for ephemeral sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Synchronous key-value store with local-storage semantics
///
/// Every call is atomic from the caller's perspective: a `set_item` either
/// replaces the whole value or fails without touching it.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Set a key-value pair, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key; removing an absent key is not an error
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!("Setting key {} in memory store", key);
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        debug!("Removing key {} from memory store", key);
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() -> StorageResult<()> {
        let store = MemoryStore::new();

        store.set_item("test_key", "test_value")?;
        assert_eq!(store.get_item("test_key")?, Some("test_value".to_string()));

        store.remove_item("test_key")?;
        assert_eq!(store.get_item("test_key")?, None);
        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn test_set_replaces_value() -> StorageResult<()> {
        let store = MemoryStore::new();

        store.set_item("key", "first")?;
        store.set_item("key", "second")?;

        assert_eq!(store.get_item("key")?, Some("second".to_string()));
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let store = MemoryStore::new();
        assert!(store.remove_item("missing").is_ok());
    }

    #[test]
    fn test_shared_through_arc() -> StorageResult<()> {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let other = Arc::clone(&store);

        store.set_item("shared", "1")?;
        assert_eq!(other.get_item("shared")?, Some("1".to_string()));
        Ok(())
    }
}
