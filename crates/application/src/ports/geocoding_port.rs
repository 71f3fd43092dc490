//! Geocoding port
//!
//! Resolves a human-readable location string into coordinates. Only used at
//! startup while building the location table.

use async_trait::async_trait;
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for forward geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a free-form location string to coordinates
    async fn geocode(&self, query: &str) -> Result<GeoLocation, ApplicationError>;
}
