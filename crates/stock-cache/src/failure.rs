//! Failure memoization.
//!
//! A permanent failure (401/402/403/404) is remembered in two places:
//!
//! - a persisted [`FailureRecord`] stored under `failed-<identifier>` in the
//!   same category, which expires with the category's duration, and
//! - the in-process [`FailureRegistry`], which lasts until the process exits
//!   and is consulted before any storage access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use stock_core::{CacheCategory, FetchError};
use tracing::{debug, info};

use crate::service::CacheService;

/// Persisted marker of a permanent failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Message of the original error.
    pub error: String,
    /// Time of the failure in Unix milliseconds.
    pub timestamp: i64,
    /// HTTP status of the original error, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl FailureRecord {
    /// Builds a record from the error that caused it.
    #[must_use]
    pub fn from_error(error: &FetchError, timestamp: i64) -> Self {
        Self {
            error: error.to_string(),
            timestamp,
            status: error.status(),
        }
    }

    /// The error replayed to callers while this record is in effect.
    #[must_use]
    pub fn to_error(&self) -> FetchError {
        FetchError::CachedFailure {
            status: self.status,
            message: self.error.clone(),
        }
    }
}

/// In-process set of `(category, identifier)` pairs known to fail permanently.
///
/// Constructed once and shared by the fetchers; never cleared while the process runs.
#[derive(Debug, Default)]
pub struct FailureRegistry {
    entries: Mutex<HashMap<(CacheCategory, String), FailureRecord>>,
}

impl FailureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a pair as permanently failed.
    pub fn insert(&self, category: CacheCategory, identifier: &str, record: FailureRecord) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((category, identifier.to_string()), record);
    }

    /// Returns the record for a pair, if it is marked.
    #[must_use]
    pub fn get(&self, category: CacheCategory, identifier: &str) -> Option<FailureRecord> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(category, identifier.to_string()))
            .cloned()
    }

    /// Returns true if the pair is marked.
    #[must_use]
    pub fn contains(&self, category: CacheCategory, identifier: &str) -> bool {
        self.get(category, identifier).is_some()
    }

    /// Number of marked pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Records and looks up permanent failures.
#[derive(Debug, Clone)]
pub struct FailureMemo {
    cache: CacheService,
    registry: Arc<FailureRegistry>,
}

impl FailureMemo {
    /// Create a memo over `cache`, sharing `registry`.
    #[must_use]
    pub fn new(cache: CacheService, registry: Arc<FailureRegistry>) -> Self {
        Self { cache, registry }
    }

    /// The shared in-process registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<FailureRegistry> {
        &self.registry
    }

    /// Records `error` for the pair if it is a memoizable failure.
    ///
    /// Returns true if a record was written.
    pub fn record(&self, category: CacheCategory, identifier: &str, error: &FetchError) -> bool {
        if !error.is_memoizable() {
            return false;
        }

        let record = FailureRecord::from_error(error, self.cache.clock().now_millis());
        self.cache
            .set(category, &CacheCategory::failure_identifier(identifier), &record);
        self.registry.insert(category, identifier, record);
        info!(
            category = %category,
            identifier,
            error = error.name(),
            "Memoized permanent failure"
        );
        true
    }

    /// Returns the replay error if the pair is memoized as failed.
    ///
    /// The in-process registry is checked first; a valid persisted record is
    /// promoted into the registry.
    #[must_use]
    pub fn lookup(&self, category: CacheCategory, identifier: &str) -> Option<FetchError> {
        if let Some(record) = self.registry.get(category, identifier) {
            debug!(category = %category, identifier, "Replaying failure from registry");
            return Some(record.to_error());
        }

        let record: FailureRecord = self
            .cache
            .get(category, &CacheCategory::failure_identifier(identifier))?;
        debug!(category = %category, identifier, "Replaying persisted failure record");
        let error = record.to_error();
        self.registry.insert(category, identifier, record);
        Some(error)
    }

    /// Returns true if a valid persisted failure record exists for the pair.
    #[must_use]
    pub fn has_record(&self, category: CacheCategory, identifier: &str) -> bool {
        self.cache
            .has_valid(category, &CacheCategory::failure_identifier(identifier))
    }
}
