//! Resolved coordinates of a configured location
//!
//! Coordinates come from the geocoder once at startup and are sent verbatim
//! as `lat`/`lon` on every OpenWeather request, so anything outside the WGS84
//! range is rejected before the collector ever sees it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// WGS84 coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
}

impl GeoLocation {
    /// Build coordinates from decimal degrees
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` when either value is not a
    /// finite number inside its WGS84 range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let invalid = |reason: &str| {
            DomainError::invalid_coordinates(format!("{latitude},{longitude}"), reason)
        };

        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build coordinates from the decimal strings geocoders return
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` when a value does not parse
    /// as a number or is out of range.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, DomainError> {
        let number = |value: &str, axis: &str| {
            value.trim().parse::<f64>().map_err(|_| {
                DomainError::invalid_coordinates(
                    format!("{latitude},{longitude}"),
                    format!("{axis} is not a number"),
                )
            })
        };

        Self::new(number(latitude, "latitude")?, number(longitude, "longitude")?)
    }

    /// Latitude in decimal degrees
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seattle_is_accepted() {
        let seattle = GeoLocation::new(47.6, -122.3).unwrap();
        assert!((seattle.latitude() - 47.6).abs() < f64::EPSILON);
        assert!((seattle.longitude() + 122.3).abs() < f64::EPSILON);
    }

    #[test]
    fn poles_and_antimeridian_are_accepted() {
        assert!(GeoLocation::new(90.0, 180.0).is_ok());
        assert!(GeoLocation::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn swapped_lat_lon_is_rejected() {
        let err = GeoLocation::new(-122.3, 47.6).unwrap_err();
        match err {
            DomainError::InvalidCoordinates {
                coordinates,
                reason,
            } => {
                assert_eq!(coordinates, "-122.3,47.6");
                assert!(reason.starts_with("latitude"));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn longitude_out_of_range_is_rejected() {
        let err = GeoLocation::new(47.6, 237.7).unwrap_err();
        assert!(err.to_string().contains("longitude must be within [-180, 180]"));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(GeoLocation::new(f64::NAN, -122.3).is_err());
        assert!(GeoLocation::new(47.6, f64::INFINITY).is_err());
    }

    #[test]
    fn parses_nominatim_strings() {
        let location = GeoLocation::parse("47.6038321", " -122.3300624 ").unwrap();
        assert!((location.latitude() - 47.603_832_1).abs() < 1e-9);
        assert!((location.longitude() + 122.330_062_4).abs() < 1e-9);
    }

    #[test]
    fn unparsable_string_names_the_axis() {
        let err = GeoLocation::parse("47.6", "west").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid coordinates (47.6,west): longitude is not a number"
        );
    }

    #[test]
    fn parsed_values_are_range_checked() {
        assert!(GeoLocation::parse("95.0", "-122.3").is_err());
    }

    #[test]
    fn display_is_lat_comma_lon() {
        let location = GeoLocation::new(40.7128, -74.006).unwrap();
        assert_eq!(location.to_string(), "40.7128,-74.006");
    }
}
