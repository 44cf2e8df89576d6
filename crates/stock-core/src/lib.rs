#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the stock lookup cache engine.
//!
//! This crate provides the foundational abstractions shared by the storage
//! backends, the remote provider and the fetch orchestration:
//!
//! - [`CacheCategory`](category::CacheCategory) - Static cache policy table
//! - [`FetchError`](error::FetchError) - Error taxonomy with retry/memoization flags
//! - [`classify_status`](classify::classify_status) - HTTP status classifier
//! - [`KeyValueStore`](store::KeyValueStore) - Persistent key-value backend
//! - [`StockDataProvider`](provider::StockDataProvider) - Remote data source
//! - [`Clock`](clock::Clock) - Time source used for envelope timestamps

/// Cache categories and their expiry policies.
pub mod category;
/// HTTP status classification.
pub mod classify;
/// Time sources.
pub mod clock;
/// Error types for fetch and cache operations.
pub mod error;
/// Tabular views of historical series.
pub mod frame;
/// Provider traits for fetching stock data.
pub mod provider;
/// Persistent key-value store trait.
pub mod store;
/// Core data types (Symbol, StockRef, Quote, HistoricalPoint).
pub mod types;

// Re-export commonly used items at crate root
pub use category::CacheCategory;
pub use classify::classify_status;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ErrorKind, FetchError, Result};
pub use frame::history_frame;
pub use provider::{
    DataProvider, PriceHistoryProvider, QuoteProvider, StockDataProvider, SymbolSearchProvider,
};
pub use store::KeyValueStore;
pub use types::{HistoricalPoint, Quote, StockRef, Symbol};
