//! Startup wiring
//!
//! Resolves every configured location, then builds the fetchers, caches and
//! call counter the collector needs. Any error here is fatal.

use std::sync::Arc;

use application::{
    ApiCallCounter, ApplicationError, CollectionService, LocationTable, SourceBinding,
};
use domain::{PollutionSnapshot, UltravioletSnapshot, WeatherSnapshot};
use infrastructure::{
    ExporterSettings, GeocodingAdapter, MokaSnapshotCache, PollutionFetcher, UltravioletFetcher,
    WeatherFetcher,
};
use integration_openweather::OpenWeatherClient;
use tracing::info;

use crate::state::AppState;

/// Build the collector described by the settings
///
/// # Errors
///
/// Returns an error if a location cannot be resolved or an HTTP client
/// cannot be created.
pub async fn build_collector(
    settings: &ExporterSettings,
) -> Result<CollectionService, ApplicationError> {
    let geocoder = GeocodingAdapter::new(&settings.geocoding)?;
    let locations = LocationTable::resolve(&settings.locations, &geocoder).await?;

    let client = Arc::new(
        OpenWeatherClient::new(&settings.openweather, settings.api_key.clone())
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?,
    );
    let api_calls = Arc::new(ApiCallCounter::new());

    let weather = SourceBinding::weather(
        Arc::new(WeatherFetcher::new(
            Arc::clone(&client),
            settings.degrees_unit,
            settings.language.clone(),
        )),
        Arc::new(MokaSnapshotCache::<WeatherSnapshot>::with_config(
            settings.cache,
        )),
    );
    let mut collector =
        CollectionService::new(locations, settings.cache_ttl, weather, api_calls);

    if settings.enable_pollution {
        collector = collector.with_pollution(SourceBinding::pollution(
            Arc::new(PollutionFetcher::new(Arc::clone(&client))),
            Arc::new(MokaSnapshotCache::<PollutionSnapshot>::with_config(
                settings.cache,
            )),
        ));
    }
    if settings.enable_uv {
        collector = collector.with_ultraviolet(SourceBinding::ultraviolet(
            Arc::new(UltravioletFetcher::new(client)),
            Arc::new(MokaSnapshotCache::<UltravioletSnapshot>::with_config(
                settings.cache,
            )),
        ));
    }

    info!(
        locations = collector.locations().len(),
        sources = ?collector.sources(),
        unit = %settings.degrees_unit,
        cache_ttl_secs = settings.cache_ttl.as_secs(),
        "Collector ready"
    );
    Ok(collector)
}

/// Build the shared HTTP state
///
/// # Errors
///
/// See [`build_collector`].
pub async fn build_state(settings: &ExporterSettings) -> Result<AppState, ApplicationError> {
    Ok(AppState::new(build_collector(settings).await?))
}
