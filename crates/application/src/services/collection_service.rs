//! Collection service
//!
//! Runs one scrape: for every (location, source) combination it resolves a
//! snapshot from the cache or the upstream, then evaluates the source's
//! metric table against it. Combinations run as independent tokio tasks, so
//! a slow or failing upstream only affects its own samples, and a scrape
//! abandoned by the HTTP client still warms the cache for the next one.
//!
//! Misses on the same key are serialized: when scrapes overlap, the first
//! one fetches and the others wait for the cache entry it stores.

use std::{collections::HashMap, sync::Arc, time::Duration};

use domain::{
    CacheKey, DataSource, Location, PollutionSnapshot, UltravioletSnapshot, WeatherSnapshot,
};
use futures::future::join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{SnapshotCache, SnapshotFetcher},
    services::{
        api_call_counter::ApiCallCounter,
        location_table::LocationTable,
        metric_registry::{
            API_CALLS_DESCRIPTOR, Descriptor, MetricDescriptor, POLLUTION_METRICS, Sample,
            ULTRAVIOLET_METRICS, WEATHER_METRICS,
        },
    },
};

/// Per-key locks held while a missing entry is being fetched
type FetchGates = Mutex<HashMap<CacheKey, Arc<tokio::sync::Mutex<()>>>>;

/// Everything needed to collect one source: fetcher, cache and metric table
pub struct SourceBinding<S: 'static> {
    source: DataSource,
    fetcher: Arc<dyn SnapshotFetcher<S>>,
    cache: Arc<dyn SnapshotCache<S>>,
    metrics: &'static [MetricDescriptor<S>],
    gates: Arc<FetchGates>,
}

impl<S: 'static> Clone for SourceBinding<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            fetcher: Arc::clone(&self.fetcher),
            cache: Arc::clone(&self.cache),
            metrics: self.metrics,
            gates: Arc::clone(&self.gates),
        }
    }
}

impl<S: 'static> std::fmt::Debug for SourceBinding<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceBinding")
            .field("source", &self.source)
            .field("endpoint", &self.fetcher.endpoint())
            .field("metrics", &self.metrics.len())
            .finish_non_exhaustive()
    }
}

impl SourceBinding<WeatherSnapshot> {
    /// Bind the current weather source
    pub fn weather(
        fetcher: Arc<dyn SnapshotFetcher<WeatherSnapshot>>,
        cache: Arc<dyn SnapshotCache<WeatherSnapshot>>,
    ) -> Self {
        Self::new(DataSource::Weather, fetcher, cache, &WEATHER_METRICS)
    }
}

impl SourceBinding<PollutionSnapshot> {
    /// Bind the air pollution source
    pub fn pollution(
        fetcher: Arc<dyn SnapshotFetcher<PollutionSnapshot>>,
        cache: Arc<dyn SnapshotCache<PollutionSnapshot>>,
    ) -> Self {
        Self::new(DataSource::Pollution, fetcher, cache, &POLLUTION_METRICS)
    }
}

impl SourceBinding<UltravioletSnapshot> {
    /// Bind the ultraviolet index source
    pub fn ultraviolet(
        fetcher: Arc<dyn SnapshotFetcher<UltravioletSnapshot>>,
        cache: Arc<dyn SnapshotCache<UltravioletSnapshot>>,
    ) -> Self {
        Self::new(DataSource::Ultraviolet, fetcher, cache, &ULTRAVIOLET_METRICS)
    }
}

impl<S> SourceBinding<S>
where
    S: Send + Sync + 'static,
{
    /// Bind an arbitrary source to a metric table
    pub fn new(
        source: DataSource,
        fetcher: Arc<dyn SnapshotFetcher<S>>,
        cache: Arc<dyn SnapshotCache<S>>,
        metrics: &'static [MetricDescriptor<S>],
    ) -> Self {
        Self {
            source,
            fetcher,
            cache,
            metrics,
            gates: Arc::default(),
        }
    }

    fn descriptors(&self) -> impl Iterator<Item = Descriptor> + '_ {
        self.metrics.iter().map(MetricDescriptor::descriptor)
    }

    fn gate(&self, key: &CacheKey) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(self.gates.lock().entry(key.clone()).or_default())
    }

    fn log_cache_stats(&self) {
        let stats = self.cache.stats();
        debug!(
            source = %self.source,
            hits = stats.hits,
            misses = stats.misses,
            entries = stats.entries,
            hit_rate = stats.hit_rate(),
            "Cache stats"
        );
    }

    /// Resolve a snapshot for one location and evaluate the metric table
    ///
    /// Returns no samples when the snapshot could not be obtained.
    #[instrument(skip_all, fields(location = %location.name(), source = %self.source))]
    async fn collect_for(
        &self,
        location: &Location,
        ttl: Duration,
        api_calls: &ApiCallCounter,
    ) -> Vec<Sample> {
        match self.snapshot(location, ttl, api_calls).await {
            Ok(snapshot) => self
                .metrics
                .iter()
                .map(|metric| metric.evaluate(&snapshot, location.name()))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Fetch failed, skipping source for this scrape");
                Vec::new()
            },
        }
    }

    /// Cached snapshot, or a fresh one stored for `ttl`
    ///
    /// Every upstream response is recorded in `api_calls`, including error
    /// statuses. A failed cache write is logged and the fresh snapshot is
    /// still returned.
    async fn snapshot(
        &self,
        location: &Location,
        ttl: Duration,
        api_calls: &ApiCallCounter,
    ) -> Result<Arc<S>, ApplicationError> {
        let key = location.cache_key(self.source);
        if let Some(snapshot) = self.cache.get(key).await {
            debug!("Cache hit");
            return Ok(snapshot);
        }

        let gate = self.gate(key);
        let _fetching = gate.lock().await;
        if let Some(snapshot) = self.cache.get(key).await {
            debug!("Cache filled by an overlapping scrape");
            return Ok(snapshot);
        }

        debug!("Cache miss, fetching");
        let endpoint = self.fetcher.endpoint();
        let fetched = self.fetcher.fetch(location).await.inspect_err(|e| {
            if let Some(status) = e.status() {
                api_calls.record(location.name(), endpoint, status);
            }
        })?;
        api_calls.record(location.name(), endpoint, &fetched.status);

        let snapshot = Arc::new(fetched.snapshot);
        if let Err(e) = self.cache.set(key, Arc::clone(&snapshot), ttl).await {
            warn!(error = %e, "Failed to cache snapshot, emitting uncached values");
        }
        Ok(snapshot)
    }
}

/// Scrape orchestrator
#[derive(Debug, Clone)]
pub struct CollectionService {
    locations: LocationTable,
    cache_ttl: Duration,
    weather: SourceBinding<WeatherSnapshot>,
    pollution: Option<SourceBinding<PollutionSnapshot>>,
    ultraviolet: Option<SourceBinding<UltravioletSnapshot>>,
    api_calls: Arc<ApiCallCounter>,
}

impl CollectionService {
    /// Create a collector for current weather only
    pub fn new(
        locations: LocationTable,
        cache_ttl: Duration,
        weather: SourceBinding<WeatherSnapshot>,
        api_calls: Arc<ApiCallCounter>,
    ) -> Self {
        Self {
            locations,
            cache_ttl,
            weather,
            pollution: None,
            ultraviolet: None,
            api_calls,
        }
    }

    /// Enable air pollution metrics
    #[must_use]
    pub fn with_pollution(mut self, binding: SourceBinding<PollutionSnapshot>) -> Self {
        self.pollution = Some(binding);
        self
    }

    /// Enable ultraviolet index metrics
    #[must_use]
    pub fn with_ultraviolet(mut self, binding: SourceBinding<UltravioletSnapshot>) -> Self {
        self.ultraviolet = Some(binding);
        self
    }

    /// Resolved locations
    pub const fn locations(&self) -> &LocationTable {
        &self.locations
    }

    /// Enabled data sources
    pub fn sources(&self) -> Vec<DataSource> {
        let mut sources = vec![DataSource::Weather];
        if self.pollution.is_some() {
            sources.push(DataSource::Pollution);
        }
        if self.ultraviolet.is_some() {
            sources.push(DataSource::Ultraviolet);
        }
        sources
    }

    /// Descriptors of every metric this collector can emit
    ///
    /// Weather, then pollution and UV when enabled, then the call counter.
    pub fn describe(&self) -> Vec<Descriptor> {
        let mut descriptors: Vec<Descriptor> = self.weather.descriptors().collect();
        if let Some(pollution) = &self.pollution {
            descriptors.extend(pollution.descriptors());
        }
        if let Some(ultraviolet) = &self.ultraviolet {
            descriptors.extend(ultraviolet.descriptors());
        }
        descriptors.push(API_CALLS_DESCRIPTOR);
        descriptors
    }

    /// Run one scrape
    ///
    /// Source samples come first, followed by the current value of every
    /// call counter series.
    #[instrument(skip(self), fields(locations = self.locations.len()))]
    pub async fn collect(&self) -> Vec<Sample> {
        let mut tasks = Vec::new();
        for location in self.locations.iter() {
            tasks.push(self.spawn(&self.weather, location));
            if let Some(pollution) = &self.pollution {
                tasks.push(self.spawn(pollution, location));
            }
            if let Some(ultraviolet) = &self.ultraviolet {
                tasks.push(self.spawn(ultraviolet, location));
            }
        }

        let mut samples = Vec::new();
        for result in join_all(tasks).await {
            match result {
                Ok(batch) => samples.extend(batch),
                Err(e) => error!(error = %e, "Collection task failed"),
            }
        }
        samples.extend(self.api_calls.samples());

        self.weather.log_cache_stats();
        if let Some(pollution) = &self.pollution {
            pollution.log_cache_stats();
        }
        if let Some(ultraviolet) = &self.ultraviolet {
            ultraviolet.log_cache_stats();
        }
        samples
    }

    fn spawn<S>(&self, binding: &SourceBinding<S>, location: &Location) -> JoinHandle<Vec<Sample>>
    where
        S: Send + Sync + 'static,
    {
        let binding = binding.clone();
        let location = location.clone();
        let ttl = self.cache_ttl;
        let api_calls = Arc::clone(&self.api_calls);

        tokio::spawn(async move { binding.collect_for(&location, ttl, &api_calls).await })
    }
}
