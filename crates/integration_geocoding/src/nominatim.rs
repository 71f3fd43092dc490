//! Nominatim geocoding client
//!
//! Converts free-form location names to geographic coordinates using the
//! Nominatim search API (OpenStreetMap).
//!
//! Requests are spaced according to the Nominatim usage policy (at most one
//! request per second) and carry an identifying user agent.

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum spacing between two requests in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("openweather-exporter/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_min_interval_ms() -> u64 {
    1100
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing against a local server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            min_interval_ms: 0,
            ..Default::default()
        }
    }
}

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// No HTTP response was received
    #[error("Nominatim unreachable: {0}")]
    Transport(String),

    /// Nominatim answered with a non-2xx status
    #[error("Nominatim returned {0}")]
    Status(String),

    /// The response body or the coordinates in it could not be used
    #[error("Unusable Nominatim response: {0}")]
    Parse(String),

    /// The search returned no place
    #[error("No place matches {0:?}")]
    NotFound(String),
}

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Convert a free-form address to geographic coordinates
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodingError>;
}

/// Nominatim-based geocoding client with request spacing
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    search_url: String,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| GeocodingError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            min_interval: Duration::from_millis(config.min_interval_ms),
            last_request: Mutex::new(None),
        })
    }

    /// Sleep until `min_interval` has passed since the previous request
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        let wait = last.map_or(Duration::ZERO, |at| {
            self.min_interval.saturating_sub(at.elapsed())
        });
        if !wait.is_zero() {
            debug!(?wait, "Spacing geocoding request");
            tokio::time::sleep(wait).await;
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodingError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeocodingError::NotFound(address.to_string()));
        }

        self.pace().await;
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Status(status.to_string()));
        }

        let place = response
            .json::<Vec<Place>>()
            .await
            .map_err(|e| GeocodingError::Parse(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NotFound(query.to_string()))?;

        debug!(
            display_name = place.display_name.as_deref().unwrap_or_default(),
            "Resolved place"
        );
        GeoLocation::parse(&place.lat, &place.lon).map_err(|e| GeocodingError::Parse(e.to_string()))
    }
}

/// One entry of a `format=json` search response
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: Option<String>,
}
