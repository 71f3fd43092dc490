//! Moka in-memory cache implementation
//!
//! Thread-safe in-memory snapshot cache with per-entry TTL. Expiry is fixed
//! at insertion: reads never extend it and an overwrite starts a fresh TTL.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use application::{
    error::ApplicationError,
    ports::{CacheStats, SnapshotCache},
};
use async_trait::async_trait;
use domain::CacheKey;
use moka::{Expiry, future::Cache};
use tracing::{debug, instrument};

/// Default maximum number of cached snapshots
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Configuration for Moka cache
#[derive(Debug, Clone, Copy)]
pub struct MokaCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for MokaCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// Cached value together with the TTL it was stored with
struct CachedSnapshot<S> {
    snapshot: Arc<S>,
    ttl: Duration,
}

impl<S> Clone for CachedSnapshot<S> {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            ttl: self.ttl,
        }
    }
}

/// Expiry policy driven by the TTL stored in each entry
struct SnapshotExpiry;

impl<S> Expiry<CacheKey, CachedSnapshot<S>> for SnapshotExpiry {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CachedSnapshot<S>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &CachedSnapshot<S>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based snapshot cache
///
/// Expired entries are never returned; moka evicts them lazily.
pub struct MokaSnapshotCache<S> {
    cache: Cache<CacheKey, CachedSnapshot<S>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S> fmt::Debug for MokaSnapshotCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MokaSnapshotCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl<S> MokaSnapshotCache<S>
where
    S: Send + Sync + 'static,
{
    /// Create a new cache with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MokaCacheConfig::default())
    }

    /// Create a new cache with custom configuration
    #[must_use]
    pub fn with_config(config: MokaCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(SnapshotExpiry)
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<S> Default for MokaSnapshotCache<S>
where
    S: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> SnapshotCache<S> for MokaSnapshotCache<S>
where
    S: Send + Sync + 'static,
{
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &CacheKey) -> Option<Arc<S>> {
        if let Some(entry) = self.cache.get(key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache hit");
            Some(entry.snapshot)
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache miss");
            None
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set(
        &self,
        key: &CacheKey,
        value: Arc<S>,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        if ttl.is_zero() {
            return Err(ApplicationError::CacheWrite(format!(
                "TTL must be positive for key {key}"
            )));
        }

        self.cache
            .insert(
                key.clone(),
                CachedSnapshot {
                    snapshot: value,
                    ttl,
                },
            )
            .await;
        debug!(key = %key, ttl_secs = ttl.as_secs_f64(), "Cache set");
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}
