//! Stock data service.
//!
//! [`StockService`] owns one [`CategoryFetcher`] per cache category, all
//! sharing one cache, one failure registry and one provider.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use stock_cache::{CacheMetadata, CacheService, FailureMemo, FailureRegistry, PersistentStore};
use stock_core::{
    CacheCategory, Clock, HistoricalPoint, KeyValueStore, Quote, Result, StockDataProvider,
    StockRef, Symbol, SystemClock, clock::days_before,
};
use tracing::{debug, info};

use crate::{
    config::ServiceConfig,
    fallback::{PriceHistory, should_fall_back, surfaced_error},
    fetcher::CategoryFetcher,
    state::{FetchState, QueryHandle},
};

/// Cached, deduplicated, retrying access to search, quotes and price history.
///
/// Cheap to clone; clones share caches, in-flight requests and the failure registry.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use stock::{FmpProvider, MemoryStore, ServiceConfig, StockService};
///
/// let service = StockService::new(
///     Arc::new(FmpProvider::from_env()?),
///     Arc::new(MemoryStore::new()),
///     ServiceConfig::default(),
/// );
/// let quote = service.quote("AAPL").await?;
/// ```
#[derive(Clone)]
pub struct StockService {
    provider: Arc<dyn StockDataProvider>,
    cache: CacheService,
    registry: Arc<FailureRegistry>,
    config: ServiceConfig,
    search: CategoryFetcher<Vec<StockRef>>,
    quotes: CategoryFetcher<Quote>,
    history: CategoryFetcher<Vec<HistoricalPoint>>,
}

impl fmt::Debug for StockService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StockService")
            .field("provider", &self.provider.name())
            .field("prefix", &self.cache.store().prefix())
            .field("config", &self.config)
            .field("memoized_failures", &self.registry.len())
            .finish_non_exhaustive()
    }
}

fn fetcher<T>(
    category: CacheCategory,
    cache: &CacheService,
    failures: &FailureMemo,
    config: &ServiceConfig,
) -> CategoryFetcher<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    CategoryFetcher::new(
        category,
        cache.clone(),
        failures.clone(),
        config.retry,
        config.dedup_window,
    )
}

impl StockService {
    /// Create a service over `provider`, persisting into `backend`.
    #[must_use]
    pub fn new(
        provider: Arc<dyn StockDataProvider>,
        backend: Arc<dyn KeyValueStore>,
        config: ServiceConfig,
    ) -> Self {
        Self::with_clock(provider, backend, config, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new), with an explicit time source.
    #[must_use]
    pub fn with_clock(
        provider: Arc<dyn StockDataProvider>,
        backend: Arc<dyn KeyValueStore>,
        config: ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = PersistentStore::new(backend, config.prefix.clone());
        let cache = CacheService::with_clock(store, clock);
        Self::from_parts(provider, cache, Arc::new(FailureRegistry::new()), config)
    }

    /// Assemble a service from an existing cache and failure registry.
    ///
    /// The cache's own prefix is used; `config.prefix` is ignored here.
    #[must_use]
    pub fn from_parts(
        provider: Arc<dyn StockDataProvider>,
        cache: CacheService,
        registry: Arc<FailureRegistry>,
        config: ServiceConfig,
    ) -> Self {
        let failures = FailureMemo::new(cache.clone(), Arc::clone(&registry));

        Self {
            search: fetcher(CacheCategory::StockSearch, &cache, &failures, &config),
            quotes: fetcher(CacheCategory::StockDetails, &cache, &failures, &config),
            history: fetcher(CacheCategory::StockHistory, &cache, &failures, &config),
            provider,
            registry,
            cache,
            config,
        }
    }

    /// The service configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The shared cache service.
    #[must_use]
    pub const fn cache(&self) -> &CacheService {
        &self.cache
    }

    /// The in-process set of permanently failed requests.
    #[must_use]
    pub const fn registry(&self) -> &Arc<FailureRegistry> {
        &self.registry
    }

    fn accepts_query(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.config.min_query_len
    }

    /// Searches for instruments matching `query`.
    ///
    /// A query shorter than the minimum length yields no results and no request.
    ///
    /// # Errors
    /// Returns the replayed or final [`FetchError`](stock_core::FetchError).
    pub async fn search(&self, query: &str) -> Result<Vec<StockRef>> {
        if !self.accepts_query(query) {
            debug!(query, "Query below minimum length");
            return Ok(Vec::new());
        }

        let query = query.trim().to_string();
        let limit = self.config.search_limit;
        let identifier = CacheCategory::search_identifier(&query, limit);
        let provider = Arc::clone(&self.provider);

        self.search
            .fetch(&identifier, move || {
                let provider = Arc::clone(&provider);
                let query = query.clone();
                async move { provider.search(&query, limit).await }
            })
            .await
    }

    /// Current quote for `symbol`.
    ///
    /// The normalized symbol is the cache identifier. An empty symbol yields
    /// `None` and no request.
    ///
    /// # Errors
    /// Returns the replayed or final [`FetchError`](stock_core::FetchError).
    pub async fn quote(&self, symbol: impl Into<Symbol>) -> Result<Option<Quote>> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Ok(None);
        }
        self.fetch_quote(symbol.as_str()).await.map(Some)
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let provider = Arc::clone(&self.provider);
        let owned = symbol.to_string();

        self.quotes
            .fetch(symbol, move || {
                let provider = Arc::clone(&provider);
                let symbol = owned.clone();
                async move { provider.quote(&symbol).await }
            })
            .await
    }

    /// Price history for `symbol` over the configured window ending today.
    ///
    /// If the plan does not cover history, the current quote is returned as
    /// [`PriceHistory::QuoteFallback`]. An empty symbol yields `None`.
    ///
    /// # Errors
    /// Returns the history error, or the fallback's error when it is more specific.
    pub async fn history(&self, symbol: impl Into<Symbol>) -> Result<Option<PriceHistory>> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Ok(None);
        }
        self.fetch_history(symbol.as_str()).await.map(Some)
    }

    async fn fetch_history(&self, symbol: &str) -> Result<PriceHistory> {
        let to = self.cache.clock().today();
        let from = days_before(to, self.config.history_days);
        let provider = Arc::clone(&self.provider);
        let owned = symbol.to_string();

        let result = self
            .history
            .fetch(symbol, move || {
                let provider = Arc::clone(&provider);
                let symbol = owned.clone();
                async move { provider.history(&symbol, from, to).await }
            })
            .await;

        match result {
            Ok(points) => Ok(PriceHistory::Series(points)),
            Err(error) if should_fall_back(&error) => {
                info!(symbol, "History not covered by plan, falling back to quote");
                match self.fetch_quote(symbol).await {
                    Ok(quote) => Ok(PriceHistory::QuoteFallback(quote)),
                    Err(fallback) => Err(surfaced_error(error, fallback)),
                }
            }
            Err(error) => Err(error),
        }
    }

    /// Runs [`search`](Self::search) in the background and returns its observable state.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn watch_search(&self, query: &str) -> QueryHandle<Vec<StockRef>> {
        if !self.accepts_query(query) {
            return QueryHandle::ready(FetchState::success(Vec::new()));
        }
        let service = self.clone();
        let query = query.to_string();
        QueryHandle::spawn(format!("search {query}"), async move {
            service.search(&query).await
        })
    }

    /// Runs [`quote`](Self::quote) in the background and returns its observable state.
    ///
    /// An empty symbol gives a handle that stays idle.
    #[must_use]
    pub fn watch_quote(&self, symbol: impl Into<Symbol>) -> QueryHandle<Quote> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return QueryHandle::ready(FetchState::idle());
        }
        let service = self.clone();
        QueryHandle::spawn(format!("quote {symbol}"), async move {
            service.fetch_quote(symbol.as_str()).await
        })
    }

    /// Runs [`history`](Self::history) in the background and returns its observable state.
    ///
    /// An empty symbol gives a handle that stays idle.
    #[must_use]
    pub fn watch_history(&self, symbol: impl Into<Symbol>) -> QueryHandle<PriceHistory> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return QueryHandle::ready(FetchState::idle());
        }
        let service = self.clone();
        QueryHandle::spawn(format!("history {symbol}"), async move {
            service.fetch_history(symbol.as_str()).await
        })
    }

    /// Age and remaining lifetime of a cache entry.
    #[must_use]
    pub fn cache_metadata(&self, category: CacheCategory, identifier: &str) -> Option<CacheMetadata> {
        self.cache.metadata(category, identifier)
    }

    /// Removes one cache entry.
    pub fn clear(&self, category: CacheCategory, identifier: &str) {
        self.cache.clear(category, identifier);
    }

    /// Removes every cache entry of this application. Returns the number removed.
    ///
    /// Memoized failures in the in-process registry are kept.
    pub fn clear_cache(&self) -> usize {
        let removed = self.cache.clear_all();
        info!(removed, "Cleared stock cache");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use stock_cache::MemoryStore;
    use stock_core::{
        DataProvider, FetchError, ManualClock, PriceHistoryProvider, QuoteProvider,
        SymbolSearchProvider, classify_status,
    };

    use crate::retry::RetryPolicy;

    /// 2023-11-14T22:13:20Z
    const NOW_MILLIS: i64 = 1_700_000_000_000;

    #[derive(Debug, Default)]
    struct ScriptedProvider {
        search: Mutex<VecDeque<Result<Vec<StockRef>>>>,
        quotes: Mutex<VecDeque<Result<Quote>>>,
        history: Mutex<VecDeque<Result<Vec<HistoricalPoint>>>>,
        search_calls: AtomicUsize,
        quote_calls: AtomicUsize,
        history_calls: AtomicUsize,
        last_range: Mutex<Option<(NaiveDate, NaiveDate)>>,
        latency: Option<Duration>,
    }

    fn next<T>(script: &Mutex<VecDeque<Result<T>>>) -> Result<T> {
        script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Validation("script exhausted".into())))
    }

    impl ScriptedProvider {
        fn with_latency(latency: Duration) -> Self {
            Self {
                latency: Some(latency),
                ..Self::default()
            }
        }

        fn push_search(&self, result: Result<Vec<StockRef>>) {
            self.search.lock().unwrap().push_back(result);
        }

        fn push_quote(&self, result: Result<Quote>) {
            self.quotes.lock().unwrap().push_back(result);
        }

        fn push_history(&self, result: Result<Vec<HistoricalPoint>>) {
            self.history.lock().unwrap().push_back(result);
        }

        async fn pause(&self) {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
        }
    }

    impl DataProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "Scripted"
        }

        fn description(&self) -> &str {
            "Replays scripted responses"
        }
    }

    #[async_trait]
    impl SymbolSearchProvider for ScriptedProvider {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<StockRef>> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.pause().await;
            next(&self.search)
        }
    }

    #[async_trait]
    impl QuoteProvider for ScriptedProvider {
        async fn quote(&self, _symbol: &str) -> Result<Quote> {
            self.quote_calls.fetch_add(1, Ordering::SeqCst);
            self.pause().await;
            next(&self.quotes)
        }
    }

    #[async_trait]
    impl PriceHistoryProvider for ScriptedProvider {
        async fn history(
            &self,
            _symbol: &str,
            from: NaiveDate,
            to: NaiveDate,
        ) -> Result<Vec<HistoricalPoint>> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_range.lock().unwrap() = Some((from, to));
            self.pause().await;
            next(&self.history)
        }
    }

    fn quote(symbol: &str, price: f64) -> Quote {
        Quote {
            symbol: symbol.into(),
            name: symbol.into(),
            price,
            timestamp: NOW_MILLIS / 1000,
            ..Quote::default()
        }
    }

    fn stock(symbol: &str) -> StockRef {
        StockRef {
            symbol: symbol.into(),
            name: format!("{symbol} Inc."),
            currency: "USD".into(),
            exchange: "NASDAQ".into(),
            exchange_full_name: "NASDAQ Global Select".into(),
        }
    }

    struct Fixture {
        provider: Arc<ScriptedProvider>,
        backend: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        service: StockService,
    }

    fn fixture_with(provider: ScriptedProvider) -> Fixture {
        let provider = Arc::new(provider);
        let backend = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::from_millis(NOW_MILLIS));
        let config =
            ServiceConfig::default().with_retry(RetryPolicy::new(2, Duration::from_millis(1)));
        let service = StockService::with_clock(
            provider.clone(),
            backend.clone(),
            config,
            clock.clone(),
        );
        Fixture {
            provider,
            backend,
            clock,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(ScriptedProvider::default())
    }

    #[tokio::test]
    async fn test_short_query_skips_network() {
        let fx = fixture();
        assert!(fx.service.search("a").await.unwrap().is_empty());
        assert!(fx.service.search("   ").await.unwrap().is_empty());
        assert_eq!(fx.provider.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_is_cached_by_normalized_query() {
        let fx = fixture();
        fx.provider.push_search(Ok(vec![stock("AAPL")]));

        let first = fx.service.search("Apple").await.unwrap();
        let second = fx.service.search("  apple ").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(fx.provider.search_calls.load(Ordering::SeqCst), 1);
        assert!(
            fx.service
                .cache_metadata(CacheCategory::StockSearch, "apple-10")
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_empty_symbol_is_a_no_op() {
        let fx = fixture();
        assert_eq!(fx.service.quote("").await.unwrap(), None);
        assert_eq!(fx.service.history("  ").await.unwrap(), None);
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.provider.history_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_symbol_is_normalized_at_input() {
        let fx = fixture();
        fx.provider.push_quote(Ok(quote("AAPL", 150.0)));

        fx.service.quote(" aapl ").await.unwrap();
        assert!(
            fx.service
                .cache_metadata(CacheCategory::StockDetails, "AAPL")
                .is_some()
        );

        let cached = fx.service.quote(Symbol::new("AAPL")).await.unwrap();
        assert_eq!(cached.map(|q| q.price), Some(150.0));
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_quote_recovers_from_transient_failures() {
        let fx = fixture();
        fx.provider.push_quote(Err(classify_status(503, "")));
        fx.provider.push_quote(Err(classify_status(503, "")));
        fx.provider.push_quote(Ok(quote("AAPL", 150.0)));

        let result = fx.service.quote("AAPL").await.unwrap();
        assert_eq!(result.map(|q| q.price), Some(150.0));
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 3);
        assert!(fx.service.registry().is_empty());
        assert!(
            fx.backend
                .keys()
                .iter()
                .all(|key| !key.contains("failed-"))
        );
    }

    #[tokio::test]
    async fn test_history_in_window_keyed_by_symbol() {
        let fx = fixture();
        fx.provider.push_history(Ok(vec![
            HistoricalPoint::new("AAPL", "2023-11-14", 150.0, 1.0),
            HistoricalPoint::new("AAPL", "2023-11-13", 149.0, 1.0),
        ]));

        let history = fx.service.history("AAPL").await.unwrap().unwrap();
        assert!(!history.fallback_mode());
        assert_eq!(history.points().len(), 2);
        assert_eq!(history.points()[0].date, "2023-11-14");

        let range = fx.provider.last_range.lock().unwrap().unwrap();
        assert_eq!(range.0, NaiveDate::from_ymd_opt(2023, 10, 30).unwrap());
        assert_eq!(range.1, NaiveDate::from_ymd_opt(2023, 11, 14).unwrap());
        assert!(
            fx.backend
                .keys()
                .contains(&"stockapp-stockHistory-AAPL".to_string())
        );
    }

    #[tokio::test]
    async fn test_payment_required_falls_back_to_quote() {
        let fx = fixture();
        fx.provider.push_history(Err(classify_status(402, "Payment Required")));
        fx.provider.push_quote(Ok(quote("AAPL", 150.0)));

        let history = fx.service.history("AAPL").await.unwrap().unwrap();
        assert!(history.fallback_mode());
        assert_eq!(history.quote().map(|q| q.price), Some(150.0));

        // Replayed failure and cached quote: no further network access
        let again = fx.service.history("AAPL").await.unwrap().unwrap();
        assert!(again.fallback_mode());
        assert_eq!(fx.provider.history_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_persisted_payment_required_still_falls_back() {
        let fx = fixture();
        fx.provider.push_history(Err(classify_status(402, "")));
        fx.provider.push_quote(Ok(quote("AAPL", 150.0)));
        fx.service.history("AAPL").await.unwrap();

        // New process over the same storage: empty registry, persisted record
        let reloaded = StockService::with_clock(
            fx.provider.clone(),
            fx.backend.clone(),
            ServiceConfig::default(),
            fx.clock.clone(),
        );
        let history = reloaded.history("AAPL").await.unwrap().unwrap();
        assert!(history.fallback_mode());
        assert_eq!(fx.provider.history_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fallback_surfaces_specific_error() {
        let fx = fixture();
        fx.provider.push_history(Err(classify_status(402, "")));
        fx.provider.push_quote(Err(classify_status(404, "Not Found")));

        let error = fx.service.history("ZZZZ").await.unwrap_err();
        assert_eq!(error.status(), Some(404));
    }

    #[tokio::test]
    async fn test_failed_fallback_keeps_history_error() {
        let fx = fixture();
        fx.provider.push_history(Err(classify_status(402, "")));
        for _ in 0..3 {
            fx.provider.push_quote(Err(classify_status(500, "")));
        }

        let error = fx.service.history("AAPL").await.unwrap_err();
        assert!(error.is_payment_required());
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_other_history_errors_do_not_fall_back() {
        let fx = fixture();
        fx.provider.push_history(Err(classify_status(403, "")));

        let error = fx.service.history("AAPL").await.unwrap_err();
        assert_eq!(error.name(), "ForbiddenError");
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_quotes_share_one_request() {
        let fx = fixture_with(ScriptedProvider::with_latency(Duration::from_millis(20)));
        fx.provider.push_quote(Ok(quote("AAPL", 150.0)));

        let clone = fx.service.clone();
        let (a, b, c) = tokio::join!(
            fx.service.quote("AAPL"),
            fx.service.quote("AAPL"),
            clone.quote("AAPL"),
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert!(c.unwrap().is_some());
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_watch_quote_transitions() {
        let fx = fixture();
        fx.provider.push_quote(Ok(quote("AAPL", 150.0)));

        let mut handle = fx.service.watch_quote("AAPL");
        assert!(handle.state().is_loading);

        let state = handle.wait().await;
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.data.map(|q| q.price), Some(150.0));
    }

    #[tokio::test]
    async fn test_watch_history_reports_failure() {
        let fx = fixture();
        fx.provider.push_history(Err(classify_status(401, "Unauthorized")));

        let mut handle = fx.service.watch_history("AAPL");
        let state = handle.wait().await;
        assert!(state.data.is_none());
        assert_eq!(state.error.map(|e| e.name()), Some("UnauthorizedError"));
    }

    #[tokio::test]
    async fn test_watch_short_query_is_immediately_settled() {
        let fx = fixture();
        let handle = fx.service.watch_search("a");
        assert_eq!(handle.state(), FetchState::success(Vec::new()));

        let idle = fx.service.watch_quote("");
        assert_eq!(idle.state(), FetchState::idle());
    }

    #[tokio::test]
    async fn test_dropped_watcher_keeps_dedup_intact() {
        let fx = fixture_with(ScriptedProvider::with_latency(Duration::from_millis(20)));
        fx.provider.push_quote(Ok(quote("AAPL", 150.0)));

        drop(fx.service.watch_quote("AAPL"));
        tokio::task::yield_now().await;

        let result = fx.service.quote("AAPL").await.unwrap();
        assert_eq!(result.map(|q| q.price), Some(150.0));
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_keeps_registry() {
        let fx = fixture();
        fx.backend.set_item("other-app-data", "keep").unwrap();
        fx.provider.push_quote(Ok(quote("AAPL", 150.0)));
        fx.provider.push_quote(Err(classify_status(404, "")));
        fx.service.quote("AAPL").await.unwrap();
        fx.service.quote("ZZZZ").await.unwrap_err();

        assert_eq!(fx.service.clear_cache(), 2);
        assert_eq!(fx.backend.keys(), vec!["other-app-data".to_string()]);

        // The quote is fetched again; the memoized failure still short-circuits
        fx.provider.push_quote(Ok(quote("AAPL", 151.0)));
        assert_eq!(
            fx.service.quote("AAPL").await.unwrap().map(|q| q.price),
            Some(151.0)
        );
        assert!(fx.service.quote("ZZZZ").await.is_err());
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_quote_expires_after_four_hours() {
        let fx = fixture();
        fx.provider.push_quote(Ok(quote("AAPL", 150.0)));
        fx.provider.push_quote(Ok(quote("AAPL", 155.0)));

        fx.service.quote("AAPL").await.unwrap();
        fx.clock.advance(Duration::from_secs(4 * 60 * 60 + 1));

        let meta = fx
            .service
            .cache_metadata(CacheCategory::StockDetails, "AAPL")
            .unwrap();
        assert!(meta.is_expired());

        let fresh = fx.service.quote("AAPL").await.unwrap().unwrap();
        assert_eq!(fresh.price, 155.0);
        assert_eq!(fx.provider.quote_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_storage_failures_do_not_fail_requests() {
        let provider = Arc::new(ScriptedProvider::default());
        provider.push_quote(Ok(quote("AAPL", 150.0)));
        provider.push_quote(Ok(quote("AAPL", 151.0)));
        let service = StockService::new(
            provider.clone(),
            Arc::new(MemoryStore::with_capacity_limit(0)),
            ServiceConfig::default(),
        );

        assert!(service.quote("AAPL").await.unwrap().is_some());
        assert!(service.quote("AAPL").await.unwrap().is_some());
        assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 2);
    }
}
