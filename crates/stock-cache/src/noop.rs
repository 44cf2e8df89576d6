//! No-op store implementation.

use stock_core::{KeyValueStore, Result};
use tracing::trace;

/// A store that doesn't keep anything, modelling disabled storage.
///
/// Reads always miss and writes are accepted and dropped, so every request
/// goes to the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl NoopStore {
    /// Create a new no-op store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl KeyValueStore for NoopStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>> {
        trace!("NoopStore: get_item called, returning None");
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        trace!("NoopStore: set_item called, doing nothing");
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn remove_prefixed(&self, _prefix: &str) -> Result<usize> {
        Ok(0)
    }
}
