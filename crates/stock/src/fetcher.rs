//! Category-parameterized fetch orchestration.
//!
//! One [`CategoryFetcher`] exists per cache category. A request for an
//! identifier walks these states:
//!
//! ```text
//! memoized failure? ──yes──► Err(replayed failure)
//!        │ no
//! valid cache entry? ──yes──► Ok(cached data)
//!        │ no
//! in-flight request for the key (inside the dedup window)?
//!        │ yes: join it             │ no: start one
//!        ▼                          ▼
//!   shared outcome ◄── load, retrying transient failures
//!                         ├─ Ok  → write cache entry
//!                         └─ Err → memoize if permanent
//! ```
//!
//! The in-flight marker is removed when the load settles. A marker whose
//! callers all went away stops being joined once the dedup window passes.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Serialize, de::DeserializeOwned};
use stock_cache::{CacheService, FailureMemo};
use stock_core::{CacheCategory, Result};
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::retry::RetryPolicy;

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T>>>;

/// A request some caller has started and others may join.
struct InflightFetch<T> {
    id: u64,
    future: SharedFetch<T>,
    started_at: Instant,
}

type InflightMap<T> = Arc<Mutex<HashMap<String, InflightFetch<T>>>>;

/// Cache-first, deduplicated, retrying fetcher for one category.
pub struct CategoryFetcher<T> {
    category: CacheCategory,
    cache: CacheService,
    failures: FailureMemo,
    retry: RetryPolicy,
    dedup_window: Duration,
    inflight: InflightMap<T>,
    next_id: Arc<AtomicU64>,
}

impl<T> Clone for CategoryFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            category: self.category,
            cache: self.cache.clone(),
            failures: self.failures.clone(),
            retry: self.retry,
            dedup_window: self.dedup_window,
            inflight: Arc::clone(&self.inflight),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T> fmt::Debug for CategoryFetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryFetcher")
            .field("category", &self.category)
            .field("retry", &self.retry)
            .field("dedup_window", &self.dedup_window)
            .field("inflight", &self.inflight_count())
            .finish_non_exhaustive()
    }
}

impl<T> CategoryFetcher<T> {
    /// Number of in-flight markers currently held.
    #[must_use]
    pub fn inflight_count(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T> CategoryFetcher<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create a fetcher for `category`.
    #[must_use]
    pub fn new(
        category: CacheCategory,
        cache: CacheService,
        failures: FailureMemo,
        retry: RetryPolicy,
        dedup_window: Duration,
    ) -> Self {
        Self {
            category,
            cache,
            failures,
            retry,
            dedup_window,
            inflight: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The category this fetcher serves.
    #[must_use]
    pub const fn category(&self) -> CacheCategory {
        self.category
    }

    /// Fetches the data for `identifier`, calling `load` only when neither a
    /// memoized failure, a valid cache entry nor a joinable in-flight request
    /// answers it.
    ///
    /// `load` performs one attempt; it is called again for each retry.
    ///
    /// # Errors
    /// Returns the replayed failure, or the error of the last attempt.
    #[instrument(skip(self, load), fields(category = %self.category))]
    pub async fn fetch<F, Fut>(&self, identifier: &str, load: F) -> Result<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if let Some(error) = self.failures.lookup(self.category, identifier) {
            return Err(error);
        }

        if let Some(data) = self.cache.get(self.category, identifier) {
            return Ok(data);
        }

        self.join_or_start(identifier, load).await
    }

    fn join_or_start<F, Fut>(&self, identifier: &str, load: F) -> SharedFetch<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut inflight = self
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = inflight.get(identifier) {
            if entry.started_at.elapsed() <= self.dedup_window {
                debug!(identifier, "Joining in-flight request");
                return entry.future.clone();
            }
        }

        // Markers left behind by abandoned requests
        let window = self.dedup_window;
        inflight.retain(|_, entry| entry.started_at.elapsed() <= window);

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let future = self.settle(identifier.to_string(), id, load).shared();
        inflight.insert(
            identifier.to_string(),
            InflightFetch {
                id,
                future: future.clone(),
                started_at: Instant::now(),
            },
        );
        future
    }

    fn settle<F, Fut>(
        &self,
        identifier: String,
        id: u64,
        load: F,
    ) -> BoxFuture<'static, Result<T>>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let category = self.category;
        let cache = self.cache.clone();
        let failures = self.failures.clone();
        let retry = self.retry;
        let inflight = Arc::clone(&self.inflight);

        async move {
            let label = format!("{category} {identifier}");
            let result = retry.run(&label, load).await;

            match &result {
                Ok(data) => cache.set(category, &identifier, data),
                Err(error) => {
                    if !failures.record(category, &identifier, error) {
                        debug!(
                            category = %category,
                            identifier = %identifier,
                            error = error.name(),
                            "Request failed without memoization"
                        );
                    }
                }
            }

            let mut inflight = inflight.lock().unwrap_or_else(PoisonError::into_inner);
            if inflight.get(&identifier).is_some_and(|entry| entry.id == id) {
                inflight.remove(&identifier);
            }

            result
        }
        .boxed()
    }
}
