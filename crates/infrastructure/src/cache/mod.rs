//! Cache implementations
//!
//! Provides the in-memory snapshot cache used by the collector. One cache
//! instance exists per data source, so each is typed by its snapshot.

mod moka_cache;

pub use moka_cache::{MokaCacheConfig, MokaSnapshotCache};
