//! Category-aware cache service.
//!
//! [`CacheService`] owns the expiry rule: an entry of category `c` written at
//! time `T` is valid while `now - T <= c.duration()`. Expired entries are
//! evicted lazily, on the next `has_valid` or `get` that sees them.

use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned, de::IgnoredAny};
use stock_core::{CacheCategory, Clock, KeyValueStore, SystemClock};
use tracing::{debug, instrument};

use crate::{adapter::PersistentStore, envelope::Envelope};

/// Diagnostic view of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetadata {
    /// Time since the entry was written.
    pub age: Duration,
    /// Time until the entry expires; zero once expired.
    pub remaining: Duration,
    /// Write time in Unix milliseconds.
    pub timestamp: i64,
}

impl CacheMetadata {
    /// Returns true if the entry is past its category's duration.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Category-aware get/set/expiry over a [`PersistentStore`].
#[derive(Debug, Clone)]
pub struct CacheService {
    store: PersistentStore,
    clock: Arc<dyn Clock>,
}

impl CacheService {
    /// Create a cache service using the wall clock.
    #[must_use]
    pub fn new(store: PersistentStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Create a cache service using `clock` for timestamps and expiry checks.
    #[must_use]
    pub fn with_clock(store: PersistentStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Shorthand for a service over `backend` with the default prefix.
    #[must_use]
    pub fn from_backend(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_clock(PersistentStore::with_default_prefix(backend), clock)
    }

    /// The underlying store adapter.
    #[must_use]
    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    /// The clock used for timestamps.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Returns true if an unexpired entry exists. Evicts the entry if expired.
    #[instrument(skip(self), fields(category = %category))]
    pub fn has_valid(&self, category: CacheCategory, identifier: &str) -> bool {
        self.live_envelope::<IgnoredAny>(category, identifier)
            .is_some()
    }

    /// Returns the cached data if valid. Evicts the entry if expired.
    #[instrument(skip(self), fields(category = %category))]
    pub fn get<T: DeserializeOwned>(&self, category: CacheCategory, identifier: &str) -> Option<T> {
        let data = self
            .live_envelope::<T>(category, identifier)
            .map(|envelope| envelope.data);
        match data {
            Some(_) => debug!("Cache hit"),
            None => debug!("Cache miss"),
        }
        data
    }

    /// Writes a fresh envelope, replacing any previous entry.
    #[instrument(skip(self, data), fields(category = %category))]
    pub fn set<T: Serialize>(&self, category: CacheCategory, identifier: &str, data: &T) {
        let envelope = Envelope::new(data, self.clock.now_millis());
        self.store.write(category, identifier, &envelope);
        debug!("Cached entry");
    }

    /// Removes one entry.
    pub fn clear(&self, category: CacheCategory, identifier: &str) {
        self.store.remove(category, identifier);
    }

    /// Removes every entry of one category. Returns the number removed.
    pub fn clear_category(&self, category: CacheCategory) -> usize {
        self.store.remove_category(category)
    }

    /// Removes every entry under the application prefix. Returns the number removed.
    pub fn clear_all(&self) -> usize {
        let removed = self.store.remove_all();
        debug!(removed, "Cleared all cache entries");
        removed
    }

    /// Age and remaining lifetime of an entry, without evicting it.
    #[must_use]
    pub fn metadata(&self, category: CacheCategory, identifier: &str) -> Option<CacheMetadata> {
        let envelope = self.store.read::<IgnoredAny>(category, identifier)?;
        let age = envelope.age_millis(self.clock.now_millis());
        let remaining = (category.duration_millis() - age).max(0);

        Some(CacheMetadata {
            age: Duration::from_millis(age.unsigned_abs()),
            remaining: Duration::from_millis(remaining.unsigned_abs()),
            timestamp: envelope.timestamp,
        })
    }

    fn live_envelope<T: DeserializeOwned>(
        &self,
        category: CacheCategory,
        identifier: &str,
    ) -> Option<Envelope<T>> {
        let envelope = self.store.read::<T>(category, identifier)?;

        if !envelope.is_current() {
            debug!(version = envelope.version, "Evicting entry with stale format version");
            self.store.remove(category, identifier);
            return None;
        }

        if !envelope.is_fresh(self.clock.now_millis(), category.duration_millis()) {
            debug!("Evicting expired entry");
            self.store.remove(category, identifier);
            return None;
        }

        Some(envelope)
    }
}
