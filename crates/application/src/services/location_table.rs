//! Location table
//!
//! Built once at startup by geocoding every configured name, then shared
//! read-only by all scrapes. Any resolution failure aborts startup.

use std::sync::Arc;

use domain::Location;
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::GeocodingPort};

/// Immutable, ordered list of resolved locations
#[derive(Debug, Clone)]
pub struct LocationTable {
    locations: Arc<[Location]>,
}

impl LocationTable {
    /// Geocode every name, in configuration order
    ///
    /// Names are resolved one after another so a rate-limited geocoder is
    /// never hit concurrently.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Resolution` naming the first location that
    /// could not be resolved.
    #[instrument(skip(names, geocoder), fields(count = names.len()))]
    pub async fn resolve(
        names: &[String],
        geocoder: &dyn GeocodingPort,
    ) -> Result<Self, ApplicationError> {
        let mut locations = Vec::with_capacity(names.len());

        for name in names {
            debug!(location = %name, "Geocoding location");
            let coordinates = geocoder
                .geocode(name)
                .await
                .map_err(|e| match e {
                    ApplicationError::Resolution { .. } => e,
                    other => ApplicationError::resolution(name.as_str(), other.to_string()),
                })?;

            let location = Location::new(name.as_str(), coordinates);
            info!(
                location = %location.name(),
                latitude = coordinates.latitude(),
                longitude = coordinates.longitude(),
                "Resolved location"
            );
            locations.push(location);
        }

        Ok(Self::from_locations(locations))
    }

    /// Build a table from already resolved locations
    #[must_use]
    pub fn from_locations(locations: Vec<Location>) -> Self {
        Self {
            locations: locations.into(),
        }
    }

    /// Iterate over locations in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Number of locations
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
