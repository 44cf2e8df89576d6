//! Persistent store adapter.
//!
//! [`PersistentStore`] wraps a [`KeyValueStore`] backend, namespaces every key
//! under an application prefix and reads/writes JSON [`Envelope`]s. Storage
//! failures never reach the caller: a failed write is logged and dropped, and
//! an unreadable entry is reported as absent.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use stock_core::{CacheCategory, KeyValueStore};
use tracing::{trace, warn};

use crate::envelope::Envelope;

/// Default application key prefix.
pub const DEFAULT_PREFIX: &str = "stockapp";

/// Namespaced, corruption-tolerant envelope store.
#[derive(Debug, Clone)]
pub struct PersistentStore {
    backend: Arc<dyn KeyValueStore>,
    prefix: Arc<str>,
}

impl PersistentStore {
    /// Create an adapter over `backend` using `prefix` for every key.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: Arc::from(prefix.into()),
        }
    }

    /// Create an adapter with the default `stockapp` prefix.
    #[must_use]
    pub fn with_default_prefix(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::new(backend, DEFAULT_PREFIX)
    }

    /// The application prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full storage key for an entry.
    #[must_use]
    pub fn key(&self, category: CacheCategory, identifier: &str) -> String {
        category.key(&self.prefix, identifier)
    }

    /// Serializes and stores `envelope`. Failures are logged and swallowed.
    pub fn write<T: Serialize>(
        &self,
        category: CacheCategory,
        identifier: &str,
        envelope: &Envelope<T>,
    ) {
        let key = self.key(category, identifier);
        let text = match serde_json::to_string(envelope) {
            Ok(text) => text,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize cache entry");
                return;
            }
        };

        if let Err(e) = self.backend.set_item(&key, &text) {
            warn!(key = %key, error = %e, "Failed to write cache entry");
        }
    }

    /// Reads and parses an envelope.
    ///
    /// Returns `None` when the entry is missing, the backend fails, or the
    /// stored text does not parse as an `Envelope<T>`.
    #[must_use]
    pub fn read<T: DeserializeOwned>(
        &self,
        category: CacheCategory,
        identifier: &str,
    ) -> Option<Envelope<T>> {
        let key = self.key(category, identifier);
        let text = match self.backend.get_item(&key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read cache entry");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Removes one entry.
    pub fn remove(&self, category: CacheCategory, identifier: &str) {
        let key = self.key(category, identifier);
        if let Err(e) = self.backend.remove_item(&key) {
            warn!(key = %key, error = %e, "Failed to remove cache entry");
        }
    }

    /// Removes every entry of `category`. Returns the number removed.
    pub fn remove_category(&self, category: CacheCategory) -> usize {
        self.remove_all_with_prefix(&category.key_prefix(&self.prefix))
    }

    /// Removes every entry under the application prefix. Returns the number removed.
    pub fn remove_all(&self) -> usize {
        self.remove_all_with_prefix(&format!("{}-", self.prefix))
    }

    fn remove_all_with_prefix(&self, prefix: &str) -> usize {
        match self.backend.remove_prefixed(prefix) {
            Ok(removed) => {
                trace!(prefix, removed, "Cleared cache entries");
                removed
            }
            Err(e) => {
                warn!(prefix, error = %e, "Failed to clear cache entries");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn adapter() -> (Arc<MemoryStore>, PersistentStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = PersistentStore::with_default_prefix(backend.clone());
        (backend, store)
    }

    #[test]
    fn test_write_then_read() {
        let (backend, store) = adapter();
        store.write(CacheCategory::StockDetails, "AAPL", &Envelope::new(150.0, 10));

        assert!(backend.get_item("stockapp-stockDetails-AAPL").unwrap().is_some());
        let envelope: Envelope<f64> = store.read(CacheCategory::StockDetails, "AAPL").unwrap();
        assert_eq!(envelope.data, 150.0);
        assert_eq!(envelope.timestamp, 10);
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let (backend, store) = adapter();
        backend
            .set_item("stockapp-stockDetails-AAPL", "{not json")
            .unwrap();
        assert!(
            store
                .read::<f64>(CacheCategory::StockDetails, "AAPL")
                .is_none()
        );

        // Valid JSON of the wrong shape is also absent
        backend
            .set_item("stockapp-stockDetails-AAPL", "{\"price\":150}")
            .unwrap();
        assert!(
            store
                .read::<f64>(CacheCategory::StockDetails, "AAPL")
                .is_none()
        );
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let backend = Arc::new(MemoryStore::with_capacity_limit(0));
        let store = PersistentStore::with_default_prefix(backend.clone());

        store.write(CacheCategory::StockSearch, "apple-10", &Envelope::new("x", 1));
        assert!(backend.is_empty());
    }

    #[test]
    fn test_remove_all_only_touches_prefix() {
        let (backend, store) = adapter();
        backend.set_item("other-app-data", "keep").unwrap();
        backend.set_item("stockapp2-stockDetails-AAPL", "keep").unwrap();
        store.write(CacheCategory::StockSearch, "apple-10", &Envelope::new(1, 1));
        store.write(CacheCategory::StockDetails, "AAPL", &Envelope::new(2, 1));

        assert_eq!(store.remove_all(), 2);
        assert_eq!(
            backend.keys(),
            vec![
                "other-app-data".to_string(),
                "stockapp2-stockDetails-AAPL".to_string()
            ]
        );
    }

    #[test]
    fn test_remove_category() {
        let (_backend, store) = adapter();
        store.write(CacheCategory::StockSearch, "apple-10", &Envelope::new(1, 1));
        store.write(CacheCategory::StockDetails, "AAPL", &Envelope::new(2, 1));

        assert_eq!(store.remove_category(CacheCategory::StockSearch), 1);
        assert!(
            store
                .read::<i32>(CacheCategory::StockDetails, "AAPL")
                .is_some()
        );
    }
}
