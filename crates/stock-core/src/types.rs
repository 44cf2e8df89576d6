//! Core data types for stock lookup.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker, uppercased at input validation
//! - [`StockRef`] - Search result identifying a tradable instrument
//! - [`Quote`] - Current-price snapshot
//! - [`HistoricalPoint`] - One end-of-day point of a historical series

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trading symbol/ticker.
///
/// Symbols are trimmed and uppercased on creation. This is the single point
/// where user input is normalized; the cache layer treats identifiers as
/// opaque strings and never re-normalizes them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, trimming and converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical identity of a tradable instrument, produced by symbol search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRef {
    /// Ticker symbol (primary key).
    pub symbol: String,
    /// Company or instrument name.
    pub name: String,
    /// Trading currency (e.g., "USD").
    pub currency: String,
    /// Short exchange code (e.g., "NASDAQ").
    pub exchange: String,
    /// Full exchange name.
    pub exchange_full_name: String,
}

/// Current-price snapshot for a symbol.
///
/// Produced by the quote endpoint, either for a direct quote request or as
/// the fallback substitute for an unavailable historical series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Instrument name; defaults to the requested symbol when absent.
    pub name: String,
    /// Last traded price.
    pub price: f64,
    /// Absolute change since previous close.
    pub change: f64,
    /// Percent change since previous close.
    pub changes_percentage: f64,
    /// Intraday low.
    pub day_low: f64,
    /// Intraday high.
    pub day_high: f64,
    /// 52-week low.
    pub year_low: f64,
    /// 52-week high.
    pub year_high: f64,
    /// Session volume.
    pub volume: f64,
    /// Average daily volume.
    pub avg_volume: Option<f64>,
    /// 50-day moving average.
    pub price_avg50: f64,
    /// 200-day moving average.
    pub price_avg200: f64,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Session open.
    pub open: Option<f64>,
    /// Previous session close.
    pub previous_close: Option<f64>,
    /// Exchange code.
    pub exchange: Option<String>,
    /// Quote time in Unix seconds; defaults to fetch time when absent.
    pub timestamp: i64,
}

/// One point of an end-of-day historical price series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// Ticker symbol.
    pub symbol: String,
    /// Trading date as reported by the API (`YYYY-MM-DD`).
    pub date: String,
    /// Closing price.
    pub price: f64,
    /// Traded volume; zero when the API omits it.
    pub volume: f64,
}

impl HistoricalPoint {
    /// Creates a new historical point.
    #[must_use]
    pub fn new(symbol: impl Into<String>, date: impl Into<String>, price: f64, volume: f64) -> Self {
        Self {
            symbol: symbol.into(),
            date: date.into(),
            price,
            volume,
        }
    }
}
