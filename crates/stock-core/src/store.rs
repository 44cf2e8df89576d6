//! Persistent key-value store trait.
//!
//! This module defines the [`KeyValueStore`] trait implemented by the storage
//! backends in `stock-cache`. Access is synchronous: every backend answers
//! immediately from the caller's point of view.

use std::fmt::Debug;

use crate::error::Result;

/// A persistent string-to-string store.
///
/// Implementations report failures (quota exceeded, disabled storage,
/// database errors) as [`FetchError::Storage`](crate::FetchError::Storage);
/// callers decide whether to swallow them.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Returns the stored value for `key`, or `None` when absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key` if present.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Removes every key starting with `prefix`.
    ///
    /// Keys outside the prefix are neither returned nor modified. Returns the
    /// number of removed entries.
    fn remove_prefixed(&self, prefix: &str) -> Result<usize>;
}
