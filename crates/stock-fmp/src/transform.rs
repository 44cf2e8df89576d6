//! Response decoding, validation and normalization.
//!
//! Every FMP body is decoded once into an [`ApiResponse`]: either an array of
//! result rows or an error envelope (`{"Error": {"Message": ...}}` or
//! `{"Error Message": ...}`). The envelope check runs before any structural
//! validation, whatever the transport status was. Anything else is a
//! [`FetchError::Validation`].

use serde::Deserialize;
use serde_json::Value;
use stock_core::{FetchError, HistoricalPoint, Quote, Result, StockRef};

/// A decoded FMP response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// The success shape: an array of result objects.
    Rows(Vec<Value>),
    /// An API error envelope, carrying its message.
    Failure(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Nested {
        #[serde(rename = "Error")]
        error: ErrorBody,
    },
    Flat {
        #[serde(rename = "Error Message")]
        message: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed {
        #[serde(rename = "Message")]
        message: String,
    },
    Text(String),
}

impl ErrorEnvelope {
    fn into_message(self) -> String {
        match self {
            Self::Nested {
                error: ErrorBody::Detailed { message },
            }
            | Self::Nested {
                error: ErrorBody::Text(message),
            }
            | Self::Flat { message } => message,
        }
    }
}

/// Decodes a response body into rows or an error envelope.
///
/// # Errors
/// Returns [`FetchError::Validation`] if the body is not JSON, or is neither
/// an array nor a recognized error envelope.
pub fn decode(body: &str) -> Result<ApiResponse> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Validation(format!("response is not valid JSON: {e}")))?;

    if let Some(message) = envelope_message(&value) {
        return Ok(ApiResponse::Failure(message));
    }

    match value {
        Value::Array(rows) => Ok(ApiResponse::Rows(rows)),
        other => Err(FetchError::Validation(format!(
            "expected an array of results, got {}",
            json_type(&other)
        ))),
    }
}

/// Extracts the message of an error envelope, if `body` is one.
#[must_use]
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| envelope_message(&value))
}

fn envelope_message(value: &Value) -> Option<String> {
    if !value.is_object() {
        return None;
    }
    ErrorEnvelope::deserialize(value)
        .ok()
        .map(ErrorEnvelope::into_message)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn rows(body: &str) -> Result<Vec<Value>> {
    match decode(body)? {
        ApiResponse::Rows(rows) => Ok(rows),
        ApiResponse::Failure(message) => Err(FetchError::Validation(message)),
    }
}

fn typed_rows<T: for<'de> Deserialize<'de>>(rows: Vec<Value>, what: &str) -> Result<Vec<T>> {
    serde_json::from_value(Value::Array(rows))
        .map_err(|e| FetchError::Validation(format!("malformed {what}: {e}")))
}

/// Validates a quote response and maps its first row into a [`Quote`].
///
/// `name` defaults to `symbol` and `timestamp` to `now_secs` when absent.
///
/// # Errors
/// Returns [`FetchError::Validation`] for an error envelope, an empty array,
/// or any row missing a required numeric field.
pub fn parse_quote(body: &str, symbol: &str, now_secs: i64) -> Result<Quote> {
    let rows = rows(body)?;
    if rows.is_empty() {
        return Err(FetchError::Validation(format!(
            "no quote data returned for {symbol}"
        )));
    }

    let quotes: Vec<FmpQuote> = typed_rows(rows, "quote")?;
    let Some(raw) = quotes.into_iter().next() else {
        return Err(FetchError::Validation(format!(
            "no quote data returned for {symbol}"
        )));
    };

    Ok(Quote {
        symbol: raw.symbol.unwrap_or_else(|| symbol.to_string()),
        name: raw
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| symbol.to_string()),
        price: raw.price,
        change: raw.change,
        changes_percentage: raw.changes_percentage,
        day_low: raw.day_low,
        day_high: raw.day_high,
        year_low: raw.year_low,
        year_high: raw.year_high,
        volume: raw.volume,
        avg_volume: Some(raw.avg_volume),
        price_avg50: raw.price_avg50,
        price_avg200: raw.price_avg200,
        market_cap: raw.market_cap,
        open: raw.open,
        previous_close: raw.previous_close,
        exchange: raw.exchange,
        timestamp: raw.timestamp.unwrap_or(now_secs),
    })
}

/// Validates a historical response and maps it 1:1 into points, keeping order.
///
/// An empty array is valid and yields an empty series.
///
/// # Errors
/// Returns [`FetchError::Validation`] for an error envelope or a row missing
/// `symbol`, `date` or `price`.
pub fn parse_history(body: &str) -> Result<Vec<HistoricalPoint>> {
    let rows = rows(body)?;
    let points: Vec<FmpHistoricalPoint> = typed_rows(rows, "historical price")?;

    Ok(points
        .into_iter()
        .map(|p| HistoricalPoint {
            symbol: p.symbol,
            date: p.date,
            price: p.price,
            volume: p.volume.unwrap_or(0.0),
        })
        .collect())
}

/// Validates a search response and maps it into stock references.
///
/// # Errors
/// Returns [`FetchError::Validation`] for an error envelope or a row without
/// a symbol.
pub fn parse_search(body: &str) -> Result<Vec<StockRef>> {
    let rows = rows(body)?;
    let results: Vec<FmpSearchResult> = typed_rows(rows, "search result")?;

    Ok(results
        .into_iter()
        .map(|r| StockRef {
            name: r.name.unwrap_or_else(|| r.symbol.clone()),
            symbol: r.symbol,
            currency: r.currency.unwrap_or_default(),
            exchange: r.exchange.unwrap_or_default(),
            exchange_full_name: r.exchange_full_name.unwrap_or_default(),
        })
        .collect())
}

// ============================================================================
// FMP API Response Types
// ============================================================================

/// FMP quote response row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    symbol: Option<String>,
    name: Option<String>,
    price: f64,
    change: f64,
    #[serde(alias = "changePercentage")]
    changes_percentage: f64,
    day_low: f64,
    day_high: f64,
    year_high: f64,
    year_low: f64,
    volume: f64,
    avg_volume: f64,
    price_avg50: f64,
    price_avg200: f64,
    market_cap: Option<f64>,
    open: Option<f64>,
    previous_close: Option<f64>,
    exchange: Option<String>,
    timestamp: Option<i64>,
}

/// FMP end-of-day (light) price row.
#[derive(Debug, Clone, Deserialize)]
struct FmpHistoricalPoint {
    symbol: String,
    date: String,
    price: f64,
    #[serde(default)]
    volume: Option<f64>,
}

/// FMP symbol search row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpSearchResult {
    symbol: String,
    name: Option<String>,
    currency: Option<String>,
    exchange: Option<String>,
    exchange_full_name: Option<String>,
}
