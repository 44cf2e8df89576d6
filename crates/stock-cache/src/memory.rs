//! In-memory store implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use stock_core::{FetchError, KeyValueStore, Result};
use tracing::debug;

/// Simple in-memory key-value store for testing and development.
///
/// Data lives in an `RwLock`-protected `BTreeMap` and is lost when the store
/// is dropped. An optional entry limit simulates a quota-exceeded backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<String, String>>,
    capacity: Option<usize>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects new keys once it holds `limit` entries.
    ///
    /// Overwriting an existing key is always allowed.
    #[must_use]
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            items: RwLock::default(),
            capacity: Some(limit),
        }
    }

    /// Number of stored entries, across all prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored key.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.items
            .read()
            .map(|items| items.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .read()
            .map_err(|e| FetchError::Storage(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| FetchError::Storage(e.to_string()))?;

        if let Some(limit) = self.capacity {
            if items.len() >= limit && !items.contains_key(key) {
                return Err(FetchError::Storage(format!(
                    "quota exceeded: store is limited to {limit} entries"
                )));
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| FetchError::Storage(e.to_string()))?;
        items.remove(key);
        Ok(())
    }

    fn remove_prefixed(&self, prefix: &str) -> Result<usize> {
        let mut items = self
            .items
            .write()
            .map_err(|e| FetchError::Storage(e.to_string()))?;
        let before = items.len();
        items.retain(|key, _| !key.starts_with(prefix));
        let removed = before - items.len();
        debug!(prefix, removed, "Removed prefixed entries");
        Ok(removed)
    }
}
