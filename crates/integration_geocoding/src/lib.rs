//! Nominatim geocoding integration
//!
//! Resolves free-form location names ("Seattle, WA") to coordinates using
//! the [Nominatim](https://nominatim.openstreetmap.org) search API.

mod nominatim;

pub use nominatim::{GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient};
