//! Snapshot entities
//!
//! Immutable, parsed representations of one upstream response per source.
//! Snapshots are produced by the fetch adapters, shared through the cache and
//! read by the metric registry; nothing mutates them after construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One weather condition entry as reported upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition code
    pub id: i64,
    /// Group of weather parameters (Rain, Snow, Clouds, ...)
    pub main: String,
    /// Localised description, e.g. "clear sky"
    pub description: String,
    /// Icon identifier
    pub icon: String,
}

/// Current weather for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Observation time
    pub observed_at: DateTime<Utc>,
    /// Sunrise time
    pub sunrise: DateTime<Utc>,
    /// Sunset time
    pub sunset: DateTime<Utc>,
    /// Temperature in the configured unit
    pub temperature: f64,
    /// Apparent temperature in the configured unit
    pub feels_like: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Dew point in the configured unit
    pub dew_point: f64,
    /// Cloudiness percentage
    pub clouds: f64,
    /// UV index reported alongside current conditions
    pub uv_index: f64,
    /// Visibility in meters
    pub visibility: f64,
    /// Wind speed, m/s (metric, kelvin) or mph (imperial)
    pub wind_speed: f64,
    /// Wind gust speed, same unit as `wind_speed`
    pub wind_gust: f64,
    /// Wind direction in meteorological degrees
    pub wind_degree: f64,
    /// Rain volume for the last hour in mm
    pub rain_1h: f64,
    /// Snow volume for the last hour in mm
    pub snow_1h: f64,
    /// Reported conditions, in upstream order
    pub conditions: Vec<Condition>,
}

impl WeatherSnapshot {
    /// Textual description of the current conditions
    ///
    /// Upstream may report several conditions; the last one wins. Returns an
    /// empty string when none were reported.
    #[must_use]
    pub fn current_conditions(&self) -> &str {
        self.conditions
            .last()
            .map_or("", |condition| condition.description.as_str())
    }
}

/// Air pollution for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionSnapshot {
    /// Observation time
    pub observed_at: DateTime<Utc>,
    /// Air quality index (1 = good ... 5 = very poor)
    pub air_quality_index: f64,
    /// Carbon monoxide, μg/m3
    pub carbon_monoxide: f64,
    /// Nitrogen monoxide, μg/m3
    pub nitrogen_monoxide: f64,
    /// Nitrogen dioxide, μg/m3
    pub nitrogen_dioxide: f64,
    /// Ozone, μg/m3
    pub ozone: f64,
    /// Sulphur dioxide, μg/m3
    pub sulphur_dioxide: f64,
    /// Fine particles matter, μg/m3
    pub pm2_5: f64,
    /// Coarse particulate matter, μg/m3
    pub pm10: f64,
    /// Ammonia, μg/m3
    pub ammonia: f64,
}

/// Ultraviolet index for one location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltravioletSnapshot {
    /// Observation time
    pub observed_at: DateTime<Utc>,
    /// UV index
    pub index: f64,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn weather(conditions: &[&str]) -> WeatherSnapshot {
        WeatherSnapshot {
            observed_at: DateTime::from_timestamp(1_690_020_000, 0).unwrap_or_default(),
            sunrise: DateTime::from_timestamp(1_690_000_000, 0).unwrap_or_default(),
            sunset: DateTime::from_timestamp(1_690_050_000, 0).unwrap_or_default(),
            temperature: 60.5,
            feels_like: 59.0,
            pressure: 1012.0,
            humidity: 80.0,
            dew_point: 54.0,
            clouds: 0.0,
            uv_index: 3.2,
            visibility: 10_000.0,
            wind_speed: 4.6,
            wind_gust: 0.0,
            wind_degree: 270.0,
            rain_1h: 0.0,
            snow_1h: 0.0,
            conditions: conditions
                .iter()
                .map(|description| Condition {
                    id: 800,
                    main: "Clear".to_string(),
                    description: (*description).to_string(),
                    icon: "01d".to_string(),
                })
                .collect(),
        }
    }
}
