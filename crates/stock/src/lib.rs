#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Cached stock search, quotes and price history.
//!
//! This crate ties the storage backends of `stock-cache` and the FMP provider
//! of `stock-fmp` together behind [`StockService`]:
//!
//! - [`CategoryFetcher`] - Memoized-failure check, cache lookup, in-flight
//!   deduplication and bounded retry for one cache category
//! - [`PriceHistory`] - History result, or the quote served in its place
//! - [`QueryHandle`] - Observable `data`/`error`/`is_loading` state
//! - [`ServiceConfig`] - Prefix, search limit, history window, retry policy

/// Service configuration.
pub mod config;
/// Fetch orchestration.
pub mod fetcher;
/// Quote fallback for unavailable history.
pub mod fallback;
/// Bounded retry.
pub mod retry;
/// Observable request state.
pub mod state;

mod service;

// Core types and traits
pub use stock_core::*;

// Storage
pub use stock_cache::{
    CacheMetadata, CacheService, Envelope, FailureMemo, FailureRecord, FailureRegistry,
    MemoryStore, NoopStore, PersistentStore, SqliteStore,
};

// Providers
pub use stock_fmp::{FmpConfig, FmpProvider};

pub use config::ServiceConfig;
pub use fallback::PriceHistory;
pub use fetcher::CategoryFetcher;
pub use retry::RetryPolicy;
pub use service::StockService;
pub use state::{FetchState, QueryHandle};
