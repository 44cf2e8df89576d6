//! Cache envelope format.
//!
//! Every persisted entry is a JSON object `{ "data": ..., "timestamp": ..., "version": ... }`.
//! The timestamp is always taken from the clock at write time.

use serde::{Deserialize, Serialize};

/// Envelope format version written by this crate.
pub const ENVELOPE_VERSION: u32 = 1;

/// Wrapper persisted for every cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The cached payload.
    pub data: T,
    /// Write time in Unix milliseconds.
    pub timestamp: i64,
    /// Format version; entries without one predate versioning.
    #[serde(default)]
    pub version: u32,
}

impl<T> Envelope<T> {
    /// Wraps `data` with the given write time and the current format version.
    #[must_use]
    pub const fn new(data: T, timestamp: i64) -> Self {
        Self {
            data,
            timestamp,
            version: ENVELOPE_VERSION,
        }
    }

    /// Milliseconds elapsed since the entry was written, never negative.
    #[must_use]
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.timestamp).max(0)
    }

    /// Returns true if the entry is within `duration_millis` of its write time.
    #[must_use]
    pub fn is_fresh(&self, now_millis: i64, duration_millis: i64) -> bool {
        now_millis.saturating_sub(self.timestamp) <= duration_millis
    }

    /// Returns true if the entry was written by the current format version.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        self.version == ENVELOPE_VERSION
    }
}
