//! OpenWeather HTTP client
//!
//! One request per call, no retries. The API key travels as the `appid`
//! query parameter and is never logged.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{
    CurrentWeather, OneCallResponse, PollutionEntry, PollutionResponse, UviResponse,
};

const ONE_CALL_PATH: &str = "/data/3.0/onecall";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";
const UVI_PATH: &str = "/data/2.5/uvi";

/// Blocks dropped from One Call responses; only `current` is read
const ONE_CALL_EXCLUDE: &str = "minutely,hourly,daily,alerts";

/// OpenWeather client errors
#[derive(Debug, Error)]
pub enum OpenWeatherError {
    /// The HTTP client could not be built
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// No response was received
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The API answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status line, e.g. `401 Unauthorized`
        status: String,
        /// Response body
        body: String,
    },

    /// The body could not be parsed
    #[error("Parse error ({status}): {message}")]
    ParseError {
        /// Status line of the response that failed to parse
        status: String,
        /// Parser message
        message: String,
    },
}

impl OpenWeatherError {
    /// Status line of the response, if one was received
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::ConnectionFailed(_) | Self::RequestFailed(_) => None,
            Self::HttpStatus { status, .. } | Self::ParseError { status, .. } => Some(status),
        }
    }
}

/// OpenWeather client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    /// API base URL (default: <https://api.openweathermap.org>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// A parsed response together with the status line it arrived with
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    /// Parsed payload
    pub data: T,
    /// HTTP status line, e.g. `200 OK`
    pub status: String,
}

/// OpenWeather HTTP client
#[derive(Debug)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(
        config: &OpenWeatherConfig,
        api_key: SecretString,
    ) -> Result<Self, OpenWeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OpenWeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// One Call endpoint URL, without query string
    #[must_use]
    pub fn one_call_url(&self) -> String {
        format!("{}{ONE_CALL_PATH}", self.base_url)
    }

    /// Air pollution endpoint URL, without query string
    #[must_use]
    pub fn air_pollution_url(&self) -> String {
        format!("{}{AIR_POLLUTION_PATH}", self.base_url)
    }

    /// UV index endpoint URL, without query string
    #[must_use]
    pub fn uvi_url(&self) -> String {
        format!("{}{UVI_PATH}", self.base_url)
    }

    /// Fetch current conditions
    ///
    /// `units` is one of `metric`, `imperial` or `internal`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// unparseable body.
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    pub async fn current_weather(
        &self,
        latitude: f64,
        longitude: f64,
        units: &str,
        language: &str,
    ) -> Result<ApiResponse<CurrentWeather>, OpenWeatherError> {
        let response: ApiResponse<OneCallResponse> = self
            .get_json(
                &self.one_call_url(),
                &[
                    ("lat", latitude.to_string()),
                    ("lon", longitude.to_string()),
                    ("units", units.to_string()),
                    ("lang", language.to_string()),
                    ("exclude", ONE_CALL_EXCLUDE.to_string()),
                ],
            )
            .await?;

        Ok(ApiResponse {
            data: response.data.current,
            status: response.status,
        })
    }

    /// Fetch current air pollution
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, an
    /// unparseable body or an empty `list`.
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    pub async fn air_pollution(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ApiResponse<PollutionEntry>, OpenWeatherError> {
        let response: ApiResponse<PollutionResponse> = self
            .get_json(
                &self.air_pollution_url(),
                &[("lat", latitude.to_string()), ("lon", longitude.to_string())],
            )
            .await?;

        let status = response.status;
        let entry = response.data.list.into_iter().next().ok_or_else(|| {
            OpenWeatherError::ParseError {
                status: status.clone(),
                message: "No pollution data in response".to_string(),
            }
        })?;

        Ok(ApiResponse {
            data: entry,
            status,
        })
    }

    /// Fetch the current UV index
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// unparseable body.
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    pub async fn uv_index(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ApiResponse<UviResponse>, OpenWeatherError> {
        self.get_json(
            &self.uvi_url(),
            &[("lat", latitude.to_string()), ("lon", longitude.to_string())],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>, OpenWeatherError> {
        debug!(url = %url, "Requesting OpenWeather");

        let response = self
            .client
            .get(url)
            .query(&[("appid", self.api_key.expose_secret())])
            .query(query)
            .send()
            .await
            .map_err(|e| OpenWeatherError::RequestFailed(e.without_url().to_string()))?;

        let status = response.status();
        let status_line = status.to_string();
        let body = response
            .text()
            .await
            .map_err(|e| OpenWeatherError::RequestFailed(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(OpenWeatherError::HttpStatus {
                status: status_line,
                body,
            });
        }

        let data = serde_json::from_str(&body).map_err(|e| OpenWeatherError::ParseError {
            status: status_line.clone(),
            message: e.to_string(),
        })?;

        Ok(ApiResponse {
            data,
            status: status_line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> OpenWeatherClient {
        let config = OpenWeatherConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        OpenWeatherClient::new(&config, SecretString::from("test-key"))
            .expect("client creation should succeed")
    }

    #[test]
    fn test_config_defaults() {
        let config = OpenWeatherConfig::default();
        assert_eq!(config.base_url, "https://api.openweathermap.org");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: OpenWeatherConfig = serde_json::from_str("{}").expect("should deserialize");
        assert_eq!(config, OpenWeatherConfig::default());
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client("https://api.openweathermap.org");
        assert_eq!(
            client.one_call_url(),
            "https://api.openweathermap.org/data/3.0/onecall"
        );
        assert_eq!(
            client.air_pollution_url(),
            "https://api.openweathermap.org/data/2.5/air_pollution"
        );
        assert_eq!(
            client.uvi_url(),
            "https://api.openweathermap.org/data/2.5/uvi"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = client("http://localhost:8080/");
        assert_eq!(client.one_call_url(), "http://localhost:8080/data/3.0/onecall");
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let client = client("http://localhost");
        assert!(!format!("{client:?}").contains("test-key"));
    }

    #[test]
    fn test_error_status() {
        assert_eq!(OpenWeatherError::RequestFailed("timeout".into()).status(), None);
        let err = OpenWeatherError::HttpStatus {
            status: "401 Unauthorized".into(),
            body: String::new(),
        };
        assert_eq!(err.status(), Some("401 Unauthorized"));
        assert!(err.to_string().contains("401"));
    }
}
