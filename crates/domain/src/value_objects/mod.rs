//! Value Objects - Immutable, identity-less domain primitives

mod data_source;
mod degrees_unit;
mod geo_location;
mod location;

pub use data_source::DataSource;
pub use degrees_unit::DegreesUnit;
pub use geo_location::GeoLocation;
pub use location::{CacheKey, Location, parse_location_names};
