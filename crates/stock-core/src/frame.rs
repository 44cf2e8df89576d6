//! Tabular views of historical series.

use polars::prelude::*;

use crate::{
    error::{FetchError, Result},
    types::HistoricalPoint,
};

/// Builds a DataFrame with columns: symbol, date, price, volume.
///
/// Rows keep the order of `points`; reversing for display is left to the caller.
pub fn history_frame(points: &[HistoricalPoint]) -> Result<DataFrame> {
    let symbols: Vec<&str> = points.iter().map(|p| p.symbol.as_str()).collect();
    let dates: Vec<&str> = points.iter().map(|p| p.date.as_str()).collect();
    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let volumes: Vec<f64> = points.iter().map(|p| p.volume).collect();

    DataFrame::new(vec![
        Column::new("symbol".into(), symbols),
        Column::new("date".into(), dates),
        Column::new("price".into(), prices),
        Column::new("volume".into(), volumes),
    ])
    .map_err(|e| FetchError::Validation(e.to_string()))
}
