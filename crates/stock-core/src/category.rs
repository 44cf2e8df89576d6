//! Cache categories and their expiry policies.
//!
//! This module defines [`CacheCategory`], the static policy table mapping each
//! kind of cached data to a fixed expiry duration and key segment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const HOUR: u64 = 60 * 60;

/// Prefix of the derived identifier under which failure records are stored.
pub const FAILURE_PREFIX: &str = "failed-";

/// A named class of cached data with its own expiry duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheCategory {
    /// Symbol search results (24 hours).
    #[serde(rename = "stockSearch")]
    StockSearch,
    /// Current quote / stock details (4 hours).
    #[serde(rename = "stockDetails")]
    StockDetails,
    /// Historical price series (6 hours).
    #[serde(rename = "stockHistory")]
    StockHistory,
}

impl CacheCategory {
    /// Every category, in policy-table order.
    pub const ALL: [Self; 3] = [Self::StockSearch, Self::StockDetails, Self::StockHistory];

    /// Key segment used when composing storage keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StockSearch => "stockSearch",
            Self::StockDetails => "stockDetails",
            Self::StockHistory => "stockHistory",
        }
    }

    /// How long an entry of this category stays valid.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::StockSearch => Duration::from_secs(24 * HOUR),
            Self::StockDetails => Duration::from_secs(4 * HOUR),
            Self::StockHistory => Duration::from_secs(6 * HOUR),
        }
    }

    /// Expiry duration in milliseconds, for comparison with envelope timestamps.
    #[must_use]
    pub const fn duration_millis(self) -> i64 {
        self.duration().as_millis() as i64
    }

    /// Composes the storage key `<prefix>-<category>-<identifier>`.
    ///
    /// The identifier is used verbatim; callers decide on normalization.
    #[must_use]
    pub fn key(self, prefix: &str, identifier: &str) -> String {
        format!("{prefix}-{}-{identifier}", self.as_str())
    }

    /// Key prefix shared by every entry of this category.
    #[must_use]
    pub fn key_prefix(self, prefix: &str) -> String {
        format!("{prefix}-{}-", self.as_str())
    }

    /// Derived identifier for the failure record of `identifier`.
    #[must_use]
    pub fn failure_identifier(identifier: &str) -> String {
        format!("{FAILURE_PREFIX}{identifier}")
    }

    /// Identifier for a search query combined with its result limit.
    ///
    /// The query is trimmed and lowercased so equivalent searches share an entry.
    #[must_use]
    pub fn search_identifier(query: &str, limit: usize) -> String {
        format!("{}-{limit}", query.trim().to_lowercase())
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_durations() {
        assert_eq!(CacheCategory::StockSearch.duration(), Duration::from_secs(86_400));
        assert_eq!(CacheCategory::StockDetails.duration(), Duration::from_secs(14_400));
        assert_eq!(CacheCategory::StockHistory.duration(), Duration::from_secs(21_600));
        assert_eq!(CacheCategory::StockDetails.duration_millis(), 14_400_000);
    }

    #[test]
    fn test_key_composition() {
        assert_eq!(
            CacheCategory::StockDetails.key("stockapp", "AAPL"),
            "stockapp-stockDetails-AAPL"
        );
        assert_eq!(
            CacheCategory::StockHistory.key_prefix("stockapp"),
            "stockapp-stockHistory-"
        );
        assert_eq!(CacheCategory::failure_identifier("AAPL"), "failed-AAPL");
    }

    #[test]
    fn test_identifier_case_is_preserved() {
        assert_ne!(
            CacheCategory::StockDetails.key("p", "aapl"),
            CacheCategory::StockDetails.key("p", "AAPL")
        );
    }

    #[test]
    fn test_search_identifier() {
        assert_eq!(CacheCategory::search_identifier("  Apple ", 10), "apple-10");
    }

    #[test]
    fn test_serde_names_match_key_segments() {
        for category in CacheCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
