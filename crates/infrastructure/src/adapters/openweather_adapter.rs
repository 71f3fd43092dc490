//! OpenWeather adapters - Implement `SnapshotFetcher` using integration_openweather
//!
//! One fetcher per data source. Each maps the integration response into the
//! domain snapshot and the integration error into a `FetchError`.

use std::sync::Arc;

use application::ports::{FetchError, Fetched, SnapshotFetcher};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    Condition, DegreesUnit, Location, PollutionSnapshot, UltravioletSnapshot, WeatherSnapshot,
};
use integration_openweather::{
    CurrentWeather, OpenWeatherClient, OpenWeatherError, PollutionEntry, UviResponse,
};
use tracing::instrument;

/// Map integration error to fetch error
fn map_error(err: OpenWeatherError) -> FetchError {
    match err {
        OpenWeatherError::ConnectionFailed(e) | OpenWeatherError::RequestFailed(e) => {
            FetchError::Transport(e)
        },
        OpenWeatherError::HttpStatus { status, body } => FetchError::Status { status, body },
        OpenWeatherError::ParseError { status, message } => FetchError::Parse { status, message },
    }
}

fn timestamp(secs: i64, field: &str) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| format!("{field} out of range: {secs}"))
}

fn weather_snapshot(current: CurrentWeather) -> Result<WeatherSnapshot, String> {
    Ok(WeatherSnapshot {
        observed_at: timestamp(current.dt, "dt")?,
        sunrise: timestamp(current.sunrise, "sunrise")?,
        sunset: timestamp(current.sunset, "sunset")?,
        temperature: current.temp,
        feels_like: current.feels_like,
        pressure: current.pressure,
        humidity: current.humidity,
        dew_point: current.dew_point,
        clouds: current.clouds,
        uv_index: current.uvi,
        visibility: current.visibility,
        wind_speed: current.wind_speed,
        wind_gust: current.wind_gust,
        wind_degree: current.wind_deg,
        rain_1h: current.rain.map_or(0.0, |rain| rain.one_hour),
        snow_1h: current.snow.map_or(0.0, |snow| snow.one_hour),
        conditions: current
            .weather
            .into_iter()
            .map(|w| Condition {
                id: w.id,
                main: w.main,
                description: w.description,
                icon: w.icon,
            })
            .collect(),
    })
}

fn pollution_snapshot(entry: &PollutionEntry) -> Result<PollutionSnapshot, String> {
    let components = entry.components;
    Ok(PollutionSnapshot {
        observed_at: timestamp(entry.dt, "dt")?,
        air_quality_index: entry.main.aqi,
        carbon_monoxide: components.co,
        nitrogen_monoxide: components.no,
        nitrogen_dioxide: components.no2,
        ozone: components.o3,
        sulphur_dioxide: components.so2,
        pm2_5: components.pm2_5,
        pm10: components.pm10,
        ammonia: components.nh3,
    })
}

fn ultraviolet_snapshot(uvi: &UviResponse) -> Result<UltravioletSnapshot, String> {
    Ok(UltravioletSnapshot {
        observed_at: timestamp(uvi.date, "date")?,
        index: uvi.value,
    })
}

/// Wrap a conversion failure as a parse error carrying the response status
fn converted<T>(result: Result<T, String>, status: String) -> Result<Fetched<T>, FetchError> {
    match result {
        Ok(snapshot) => Ok(Fetched { snapshot, status }),
        Err(message) => Err(FetchError::Parse { status, message }),
    }
}

/// Fetcher for current weather (One Call 3.0)
#[derive(Debug)]
pub struct WeatherFetcher {
    client: Arc<OpenWeatherClient>,
    units: DegreesUnit,
    language: String,
    endpoint: String,
}

impl WeatherFetcher {
    /// Create a fetcher reporting in the given unit and language
    pub fn new(
        client: Arc<OpenWeatherClient>,
        units: DegreesUnit,
        language: impl Into<String>,
    ) -> Self {
        let endpoint = client.one_call_url();
        Self {
            client,
            units,
            language: language.into(),
            endpoint,
        }
    }
}

#[async_trait]
impl SnapshotFetcher<WeatherSnapshot> for WeatherFetcher {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self), fields(location = %location.name()))]
    async fn fetch(&self, location: &Location) -> Result<Fetched<WeatherSnapshot>, FetchError> {
        let coordinates = location.coordinates();
        let response = self
            .client
            .current_weather(
                coordinates.latitude(),
                coordinates.longitude(),
                self.units.api_units(),
                &self.language,
            )
            .await
            .map_err(map_error)?;

        converted(weather_snapshot(response.data), response.status)
    }
}

/// Fetcher for current air pollution
#[derive(Debug)]
pub struct PollutionFetcher {
    client: Arc<OpenWeatherClient>,
    endpoint: String,
}

impl PollutionFetcher {
    /// Create a pollution fetcher
    pub fn new(client: Arc<OpenWeatherClient>) -> Self {
        let endpoint = client.air_pollution_url();
        Self { client, endpoint }
    }
}

#[async_trait]
impl SnapshotFetcher<PollutionSnapshot> for PollutionFetcher {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self), fields(location = %location.name()))]
    async fn fetch(&self, location: &Location) -> Result<Fetched<PollutionSnapshot>, FetchError> {
        let coordinates = location.coordinates();
        let response = self
            .client
            .air_pollution(coordinates.latitude(), coordinates.longitude())
            .await
            .map_err(map_error)?;

        converted(pollution_snapshot(&response.data), response.status)
    }
}

/// Fetcher for the UV index
#[derive(Debug)]
pub struct UltravioletFetcher {
    client: Arc<OpenWeatherClient>,
    endpoint: String,
}

impl UltravioletFetcher {
    /// Create a UV index fetcher
    pub fn new(client: Arc<OpenWeatherClient>) -> Self {
        let endpoint = client.uvi_url();
        Self { client, endpoint }
    }
}

#[async_trait]
impl SnapshotFetcher<UltravioletSnapshot> for UltravioletFetcher {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self), fields(location = %location.name()))]
    async fn fetch(
        &self,
        location: &Location,
    ) -> Result<Fetched<UltravioletSnapshot>, FetchError> {
        let coordinates = location.coordinates();
        let response = self
            .client
            .uv_index(coordinates.latitude(), coordinates.longitude())
            .await
            .map_err(map_error)?;

        converted(ultraviolet_snapshot(&response.data), response.status)
    }
}
