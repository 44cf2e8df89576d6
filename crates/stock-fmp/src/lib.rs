#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial Modeling Prep (FMP) data provider.
//!
//! This crate implements the stock-core provider traits for the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use stock_fmp::FmpProvider;
//! use stock_core::{PriceHistoryProvider, QuoteProvider};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FmpProvider::from_env()?;
//!
//!     let quote = provider.quote("AAPL").await?;
//!
//!     let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let to = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//!     let points = provider.history("AAPL", from, to).await?;
//!
//!     Ok(())
//! }
//! ```

/// Base URL and credential handling.
pub mod config;
/// Response decoding and normalization.
pub mod transform;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use stock_core::{
    Clock, DataProvider, FetchError, HistoricalPoint, PriceHistoryProvider, Quote, QuoteProvider,
    Result, StockRef, SymbolSearchProvider, SystemClock, classify_status,
};
use tracing::debug;

pub use config::FmpConfig;

/// Financial Modeling Prep data provider.
///
/// Provides access to:
/// - Ticker search
/// - Current quotes
/// - End-of-day price history (light)
#[derive(Clone)]
pub struct FmpProvider {
    client: Client,
    config: FmpConfig,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for FmpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpProvider")
            .field("base_url", &self.config.base_url())
            .field("api_key", &"[REDACTED]")
            .field("clock", &self.clock)
            .finish()
    }
}

impl FmpProvider {
    /// Create a new FMP provider for the stable API with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(FmpConfig::with_api_key(api_key))
    }

    /// Create a new FMP provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, config: FmpConfig) -> Self {
        Self {
            client,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `clock` for the timestamp of quotes that carry none.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create a new FMP provider from an explicit configuration.
    #[must_use]
    pub fn from_config(config: FmpConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a new FMP provider from `FMP_BASE_URL` and `FMP_API_KEY`.
    ///
    /// # Errors
    /// Returns [`FetchError::Configuration`] if either variable is missing.
    pub fn from_env() -> Result<Self> {
        FmpConfig::from_env().map(Self::from_config)
    }

    /// The provider configuration.
    #[must_use]
    pub fn config(&self) -> &FmpConfig {
        &self.config
    }

    /// Build a URL with the API key appended.
    fn url(&self, endpoint: &str) -> Result<String> {
        self.config.validate()?;
        let base = self.config.base_url();
        let key = self.config.api_key();
        if endpoint.contains('?') {
            Ok(format!("{base}/{endpoint}&apikey={key}"))
        } else {
            Ok(format!("{base}/{endpoint}?apikey={key}"))
        }
    }

    /// Make a GET request and return the body of a successful response.
    ///
    /// A non-success status is classified; the error envelope message, when
    /// present, becomes the error text.
    async fn get_text(&self, endpoint: &str, query: &[(&str, String)]) -> Result<String> {
        let url = self.url(endpoint)?;
        debug!(endpoint, "FMP request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        Ok(text)
    }

    /// Parse a quote body; a row without a timestamp is stamped with the clock.
    fn parse_quote(&self, body: &str, symbol: &str) -> Result<Quote> {
        transform::parse_quote(body, symbol, self.clock.now().timestamp())
    }
}

fn status_error(status: StatusCode, body: &str) -> FetchError {
    let text = transform::error_message(body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();
    classify_status(status.as_u16(), &text)
}

impl DataProvider for FmpProvider {
    fn name(&self) -> &str {
        "FMP"
    }

    fn description(&self) -> &str {
        "Financial Modeling Prep - ticker search, quotes and end-of-day prices"
    }
}

#[async_trait]
impl SymbolSearchProvider for FmpProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<StockRef>> {
        let body = self
            .get_text(
                "search-symbol",
                &[("query", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        let mut results = transform::parse_search(&body)?;
        results.truncate(limit);
        Ok(results)
    }
}

#[async_trait]
impl QuoteProvider for FmpProvider {
    async fn quote(&self, symbol: &str) -> Result<Quote> {
        let body = self
            .get_text("quote", &[("symbol", symbol.to_string())])
            .await?;
        self.parse_quote(&body, symbol)
    }
}

#[async_trait]
impl PriceHistoryProvider for FmpProvider {
    async fn history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<HistoricalPoint>> {
        let body = self
            .get_text(
                "historical-price-eod/light",
                &[
                    ("symbol", symbol.to_string()),
                    ("from", from.format("%Y-%m-%d").to_string()),
                    ("to", to.format("%Y-%m-%d").to_string()),
                ],
            )
            .await?;
        transform::parse_history(&body)
    }
}
