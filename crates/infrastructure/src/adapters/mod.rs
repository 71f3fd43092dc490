//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod geocoding_adapter;
mod openweather_adapter;

pub use geocoding_adapter::GeocodingAdapter;
pub use openweather_adapter::{PollutionFetcher, UltravioletFetcher, WeatherFetcher};
