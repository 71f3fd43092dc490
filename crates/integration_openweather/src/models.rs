//! OpenWeather response models
//!
//! Only the fields the exporter reads are modelled. Optional upstream blocks
//! (`rain`, `snow`, gusts) default to zero.

use serde::{Deserialize, Serialize};

/// Geographic coordinates echoed back by the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
}

/// One Call 3.0 response with `exclude=minutely,hourly,daily,alerts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneCallResponse {
    /// Latitude of the location
    #[serde(default)]
    pub lat: f64,
    /// Longitude of the location
    #[serde(default)]
    pub lon: f64,
    /// Timezone name
    #[serde(default)]
    pub timezone: String,
    /// Shift in seconds from UTC
    #[serde(default)]
    pub timezone_offset: i64,
    /// Current conditions
    pub current: CurrentWeather,
}

/// Current conditions block of a One Call response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentWeather {
    /// Observation time, unix seconds
    pub dt: i64,
    /// Sunrise time, unix seconds
    pub sunrise: i64,
    /// Sunset time, unix seconds
    pub sunset: i64,
    /// Temperature
    pub temp: f64,
    /// Apparent temperature
    pub feels_like: f64,
    /// Atmospheric pressure on sea level, hPa
    pub pressure: f64,
    /// Humidity, %
    pub humidity: f64,
    /// Dew point
    pub dew_point: f64,
    /// Cloudiness, %
    pub clouds: f64,
    /// UV index
    pub uvi: f64,
    /// Average visibility, metres
    pub visibility: f64,
    /// Wind speed
    pub wind_speed: f64,
    /// Wind gust
    pub wind_gust: f64,
    /// Wind direction, degrees (meteorological)
    pub wind_deg: f64,
    /// Rain volume
    pub rain: Option<Precipitation>,
    /// Snow volume
    pub snow: Option<Precipitation>,
    /// Weather conditions
    pub weather: Vec<WeatherCondition>,
}

/// Precipitation volume block
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    /// Volume for the last hour, mm
    #[serde(rename = "1h", default)]
    pub one_hour: f64,
}

/// Weather condition entry
///
/// See <https://openweathermap.org/weather-conditions>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherCondition {
    /// Condition id
    pub id: i64,
    /// Group of weather parameters
    pub main: String,
    /// Condition description in the requested language
    pub description: String,
    /// Icon id
    pub icon: String,
}

/// Current air pollution response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionResponse {
    /// Coordinates of the location
    #[serde(default)]
    pub coord: Coordinates,
    /// Pollution entries; the current endpoint returns exactly one
    pub list: Vec<PollutionEntry>,
}

/// One air pollution measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionEntry {
    /// Measurement time, unix seconds
    #[serde(default)]
    pub dt: i64,
    /// Air quality index
    pub main: AirQuality,
    /// Pollutant concentrations
    pub components: PollutionComponents,
}

/// Air quality index block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    /// 1 = Good, 2 = Fair, 3 = Moderate, 4 = Poor, 5 = Very Poor
    pub aqi: f64,
}

/// Pollutant concentrations, μg/m3
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollutionComponents {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

/// UV index response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UviResponse {
    /// Latitude
    #[serde(default)]
    pub lat: f64,
    /// Longitude
    #[serde(default)]
    pub lon: f64,
    /// Measurement time, unix seconds
    #[serde(default)]
    pub date: i64,
    /// UV index
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_call_minimal_current_block() {
        let json = r#"{
            "current": {
                "temp": 60.5,
                "humidity": 80,
                "sunrise": 1690000000,
                "sunset": 1690050000,
                "weather": [{"description": "clear sky"}]
            }
        }"#;

        let response: OneCallResponse = serde_json::from_str(json).unwrap();
        let current = response.current;
        assert!((current.temp - 60.5).abs() < f64::EPSILON);
        assert!((current.humidity - 80.0).abs() < f64::EPSILON);
        assert_eq!(current.sunrise, 1_690_000_000);
        assert_eq!(current.weather[0].description, "clear sky");
        assert!(current.rain.is_none());
    }

    #[test]
    fn one_call_without_current_is_rejected() {
        let json = r#"{"lat": 47.6, "lon": -122.3}"#;
        assert!(serde_json::from_str::<OneCallResponse>(json).is_err());
    }

    #[test]
    fn precipitation_reads_one_hour_key() {
        let json = r#"{"current": {"temp": 1.0, "rain": {"1h": 0.4}, "snow": {}}}"#;
        let response: OneCallResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.current.rain, Some(Precipitation { one_hour: 0.4 }));
        assert_eq!(response.current.snow, Some(Precipitation { one_hour: 0.0 }));
    }

    #[test]
    fn pollution_response() {
        let json = r#"{
            "coord": {"lon": -122.3, "lat": 47.6},
            "list": [{
                "dt": 1690020000,
                "main": {"aqi": 2},
                "components": {
                    "co": 201.94, "no": 0.02, "no2": 0.77, "o3": 68.66,
                    "so2": 0.64, "pm2_5": 0.5, "pm10": 0.54, "nh3": 0.12
                }
            }]
        }"#;

        let response: PollutionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.list.len(), 1);
        let entry = &response.list[0];
        assert!((entry.main.aqi - 2.0).abs() < f64::EPSILON);
        assert!((entry.components.pm2_5 - 0.5).abs() < f64::EPSILON);
        assert!((entry.components.nh3 - 0.12).abs() < f64::EPSILON);
    }

    #[test]
    fn uvi_response() {
        let json = r#"{"lat": 47.6, "lon": -122.3, "date_iso": "2023-07-22T12:00:00Z", "date": 1690027200, "value": 7.25}"#;
        let response: UviResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.date, 1_690_027_200);
        assert!((response.value - 7.25).abs() < f64::EPSILON);
    }
}
