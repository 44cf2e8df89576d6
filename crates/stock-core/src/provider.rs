//! Provider traits for fetching stock data.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`SymbolSearchProvider`] - Ticker search
//! - [`QuoteProvider`] - Current quote snapshot
//! - [`PriceHistoryProvider`] - End-of-day price history
//! - [`StockDataProvider`] - Everything above, for the fetch orchestration

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{HistoricalPoint, Quote, StockRef},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "FMP").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for symbol search.
#[async_trait]
pub trait SymbolSearchProvider: DataProvider {
    /// Searches for instruments matching `query`, returning at most `limit` results.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<StockRef>>;
}

/// Provider for current quotes.
#[async_trait]
pub trait QuoteProvider: DataProvider {
    /// Fetches the current quote for `symbol`.
    ///
    /// The symbol is passed through verbatim.
    async fn quote(&self, symbol: &str) -> Result<Quote>;
}

/// Provider for end-of-day price history.
#[async_trait]
pub trait PriceHistoryProvider: DataProvider {
    /// Fetches the series for `symbol` between `from` and `to` inclusive.
    ///
    /// Points are returned in the order the source delivers them. An empty
    /// series is a valid answer meaning "no data available".
    async fn history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalPoint>>;
}

/// A provider serving every data category.
///
/// Implemented automatically for any type implementing the three category traits.
pub trait StockDataProvider: SymbolSearchProvider + QuoteProvider + PriceHistoryProvider {}

impl<T> StockDataProvider for T where
    T: SymbolSearchProvider + QuoteProvider + PriceHistoryProvider + ?Sized
{
}
