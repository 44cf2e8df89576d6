//! Price history with quote fallback.
//!
//! When a history request fails because the API plan does not cover it
//! (HTTP 402, fresh or replayed), the current quote for the same symbol is
//! served instead and flagged as fallback data.

use chrono::DateTime;
use polars::prelude::DataFrame;
use stock_core::{FetchError, HistoricalPoint, Quote, Result, history_frame};

/// What a history request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceHistory {
    /// The requested series, possibly empty.
    Series(Vec<HistoricalPoint>),
    /// The current quote, substituted for an unavailable series.
    QuoteFallback(Quote),
}

impl PriceHistory {
    /// True when the data is a substitute rather than the requested series.
    #[must_use]
    pub const fn fallback_mode(&self) -> bool {
        matches!(self, Self::QuoteFallback(_))
    }

    /// The series points; empty in fallback mode.
    #[must_use]
    pub fn points(&self) -> &[HistoricalPoint] {
        match self {
            Self::Series(points) => points,
            Self::QuoteFallback(_) => &[],
        }
    }

    /// The substituted quote, in fallback mode.
    #[must_use]
    pub const fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Series(_) => None,
            Self::QuoteFallback(quote) => Some(quote),
        }
    }

    /// Tabular view for charting.
    ///
    /// In fallback mode the frame holds a single row built from the quote.
    ///
    /// # Errors
    /// Returns [`FetchError::Validation`] if the frame cannot be built.
    pub fn to_frame(&self) -> Result<DataFrame> {
        match self {
            Self::Series(points) => history_frame(points),
            Self::QuoteFallback(quote) => history_frame(&[quote_point(quote)]),
        }
    }
}

fn quote_point(quote: &Quote) -> HistoricalPoint {
    let date = DateTime::from_timestamp(quote.timestamp, 0)
        .map(|t| t.date_naive().format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    HistoricalPoint::new(quote.symbol.clone(), date, quote.price, quote.volume)
}

/// Returns true if a history failure should be answered with the quote.
#[must_use]
pub const fn should_fall_back(error: &FetchError) -> bool {
    error.is_payment_required()
}

/// Picks the error surfaced when the fallback quote fails too.
///
/// A fallback failure that pins down the symbol or credential (401, 403,
/// 404) is more specific than the plan restriction; anything else leaves
/// the original history error in place.
#[must_use]
pub fn surfaced_error(history: FetchError, fallback: FetchError) -> FetchError {
    match fallback.status() {
        Some(401 | 403 | 404) => fallback,
        _ => history,
    }
}
