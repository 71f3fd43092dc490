//! Cache port definition
//!
//! Defines the TTL cache the collector uses to bound upstream calls. The port
//! is parametric in the snapshot type: a cache built for `WeatherSnapshot`
//! can only ever hand back a `WeatherSnapshot`.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use domain::CacheKey;

use crate::error::ApplicationError;

/// TTL cache for parsed snapshots of one source
///
/// Implementations must be safe for concurrent use from overlapping scrapes
/// and make each `get`/`set` atomic per key. An entry is present iff
/// `now < inserted_at + ttl`; reads never extend the expiry, and a `set` on an
/// existing key replaces both value and TTL.
#[async_trait]
pub trait SnapshotCache<S>: Send + Sync + std::fmt::Debug {
    /// Look up a live snapshot
    ///
    /// Returns `None` if the key was never set or its entry has expired.
    async fn get(&self, key: &CacheKey) -> Option<Arc<S>>;

    /// Store a snapshot for `ttl`
    ///
    /// Errors are reported as `ApplicationError::CacheWrite`.
    async fn set(&self, key: &CacheKey, value: Arc<S>, ttl: Duration)
    -> Result<(), ApplicationError>;

    /// Get cache statistics (hits, misses, size)
    fn stats(&self) -> CacheStats;
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Current number of entries
    pub entries: u64,
}

impl CacheStats {
    /// Calculate the hit rate as a fraction (0.0 - 1.0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
