//! Service configuration.

use std::time::Duration;

use stock_cache::adapter::DEFAULT_PREFIX;

use crate::retry::RetryPolicy;

/// Tunables for [`StockService`](crate::StockService).
///
/// Category expiry durations are fixed by
/// [`CacheCategory`](stock_core::CacheCategory) and are not part of this config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Application key prefix for every cache entry.
    pub prefix: String,
    /// Maximum number of search results requested.
    pub search_limit: usize,
    /// Queries shorter than this (after trimming) return no results.
    pub min_query_len: usize,
    /// Length of the history window ending today.
    pub history_days: u32,
    /// How long an in-flight request may be joined by later callers.
    pub dedup_window: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            search_limit: 10,
            min_query_len: 2,
            history_days: 15,
            dedup_window: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Set the application key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the search result limit.
    #[must_use]
    pub const fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Set the minimum search query length.
    #[must_use]
    pub const fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len;
        self
    }

    /// Set the history window length in days.
    #[must_use]
    pub const fn with_history_days(mut self, days: u32) -> Self {
        self.history_days = days;
        self
    }

    /// Set the in-flight deduplication window.
    #[must_use]
    pub const fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
