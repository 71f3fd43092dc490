//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod cache_port;
mod fetcher_port;
mod geocoding_port;

pub use cache_port::{CacheStats, SnapshotCache};
pub use fetcher_port::{FetchError, Fetched, SnapshotFetcher};
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
