//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the moka snapshot
//! cache, the OpenWeather fetchers and the Nominatim geocoder. Also owns
//! configuration loading and logging setup.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use cache::{MokaCacheConfig, MokaSnapshotCache};
pub use config::{
    AppConfig, CacheConfig, CollectorConfig, ExporterSettings, LoggingConfig,
    OpenWeatherAppConfig, ServerConfig, parse_listen_address,
};
pub use telemetry::{TelemetryError, init_logging};
