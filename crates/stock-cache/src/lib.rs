#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/stock/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching implementations for stock lookup.
//!
//! Backends implementing the [`KeyValueStore`] trait from `stock-core`:
//!
//! - [`SqliteStore`] - Persistent SQLite-based store (default, requires `sqlite` feature)
//! - [`MemoryStore`] - In-memory store for testing, with optional quota simulation
//! - [`NoopStore`] - Disabled storage that keeps nothing
//!
//! Built on top of a backend:
//!
//! - [`PersistentStore`] - Namespaced, corruption-tolerant envelope adapter
//! - [`CacheService`] - Category-aware expiry and lazy eviction
//! - [`FailureMemo`] - Permanent-failure memoization

/// Persistent store adapter.
pub mod adapter;
/// Cache envelope format.
pub mod envelope;
/// Failure memoization.
pub mod failure;
/// In-memory store implementation.
pub mod memory;
/// No-op store implementation.
pub mod noop;
/// Category-aware cache service.
pub mod service;

/// SQLite-based store implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use stock_core::KeyValueStore;

pub use adapter::PersistentStore;
pub use envelope::Envelope;
pub use failure::{FailureMemo, FailureRecord, FailureRegistry};
pub use memory::MemoryStore;
pub use noop::NoopStore;
pub use service::{CacheMetadata, CacheService};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
