//! Application configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `config.toml` (or an explicit file), then `OPENWEATHER_EXPORTER__*`
//! environment variables. [`AppConfig::validate`] turns the raw values into
//! typed [`ExporterSettings`].

use std::{
    net::{SocketAddr, ToSocketAddrs},
    path::Path,
    time::Duration,
};

use application::ApplicationError;
use domain::{DegreesUnit, parse_location_names};
use integration_geocoding::NominatimConfig;
use integration_openweather::OpenWeatherConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::cache::MokaCacheConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "OPENWEATHER_EXPORTER";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenWeather API configuration
    #[serde(default)]
    pub openweather: OpenWeatherAppConfig,

    /// Which locations and sources to collect
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Nominatim geocoding configuration
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Snapshot cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on; `:port` binds all interfaces
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

fn default_listen_address() -> String {
    ":9091".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
        }
    }
}

/// OpenWeather API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherAppConfig {
    /// API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Temperature unit: C, F or K
    #[serde(default = "default_degrees_unit")]
    pub degrees_unit: String,

    /// Language of condition descriptions
    #[serde(default = "default_language")]
    pub language: String,

    /// API base URL
    #[serde(default = "default_openweather_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_degrees_unit() -> String {
    "F".to_string()
}

fn default_language() -> String {
    "EN".to_string()
}

fn default_openweather_base_url() -> String {
    OpenWeatherConfig::default().base_url
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for OpenWeatherAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            degrees_unit: default_degrees_unit(),
            language: default_language(),
            base_url: default_openweather_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Collection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Pipe-delimited list of location names
    #[serde(default = "default_city")]
    pub city: String,

    /// Cache TTL in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Collect air pollution metrics
    #[serde(default)]
    pub enable_pollution: bool,

    /// Collect UV index metrics
    #[serde(default)]
    pub enable_uv: bool,
}

fn default_city() -> String {
    "New York, NY".to_string()
}

const fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            cache_ttl_secs: default_cache_ttl_secs(),
            enable_pollution: false,
            enable_uv: false,
        }
    }
}

/// Snapshot cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached snapshots per source
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

fn default_max_capacity() -> u64 {
    MokaCacheConfig::default().max_capacity
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,

    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "warn,openweather_exporter=info,presentation_http=info,application=info,\
     infrastructure=info,integration_openweather=info,integration_geocoding=info,\
     tower_http=info"
        .to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_log_filter(),
        }
    }
}

/// Validated settings the exporter is started with
#[derive(Debug, Clone)]
pub struct ExporterSettings {
    /// Socket address to bind
    pub listen_address: SocketAddr,
    /// OpenWeather API key
    pub api_key: SecretString,
    /// Location names, in configuration order
    pub locations: Vec<String>,
    /// Temperature unit
    pub degrees_unit: DegreesUnit,
    /// Language of condition descriptions
    pub language: String,
    /// Lifetime of cached snapshots
    pub cache_ttl: Duration,
    /// Collect air pollution metrics
    pub enable_pollution: bool,
    /// Collect UV index metrics
    pub enable_uv: bool,
    /// OpenWeather client configuration
    pub openweather: OpenWeatherConfig,
    /// Nominatim client configuration
    pub geocoding: NominatimConfig,
    /// Cache configuration
    pub cache: MokaCacheConfig,
}

/// Parse a listen address; `:port` binds all interfaces
///
/// # Errors
///
/// Returns a configuration error if the address cannot be resolved.
pub fn parse_listen_address(address: &str) -> Result<SocketAddr, ApplicationError> {
    let address = address.trim();
    let full = if address.starts_with(':') {
        format!("0.0.0.0{address}")
    } else {
        address.to_string()
    };

    full.to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| {
            ApplicationError::Configuration(format!("Invalid listen address: {address:?}"))
        })
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// Without `path`, `config.toml` in the working directory is read if it
    /// exists. Environment variables use the `OPENWEATHER_EXPORTER__` prefix
    /// and `__` between nested keys, e.g.
    /// `OPENWEATHER_EXPORTER__COLLECTOR__CACHE_TTL_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any source fails to
    /// parse.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
    }

    fn load_with(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Validate the raw configuration
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` for an unknown degrees unit or a
    /// malformed location list, and `ApplicationError::Configuration` for a
    /// missing API key, a zero TTL or an invalid listen address.
    pub fn validate(&self) -> Result<ExporterSettings, ApplicationError> {
        let api_key = self
            .openweather
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .cloned()
            .ok_or_else(|| {
                ApplicationError::Configuration("OpenWeather API key is required".to_string())
            })?;

        let degrees_unit: DegreesUnit = self.openweather.degrees_unit.parse()?;
        let locations = parse_location_names(&self.collector.city)?;

        if self.collector.cache_ttl_secs == 0 {
            return Err(ApplicationError::Configuration(
                "Cache TTL must be at least one second".to_string(),
            ));
        }

        let listen_address = parse_listen_address(&self.server.listen_address)?;

        Ok(ExporterSettings {
            listen_address,
            api_key,
            locations,
            degrees_unit,
            language: self.openweather.language.clone(),
            cache_ttl: Duration::from_secs(self.collector.cache_ttl_secs),
            enable_pollution: self.collector.enable_pollution,
            enable_uv: self.collector.enable_uv,
            openweather: OpenWeatherConfig {
                base_url: self.openweather.base_url.clone(),
                timeout_secs: self.openweather.timeout_secs,
            },
            geocoding: self.geocoding.clone(),
            cache: MokaCacheConfig {
                max_capacity: self.cache.max_capacity,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use domain::DomainError;

    use super::*;

    fn with_key() -> AppConfig {
        let mut config = AppConfig::default();
        config.openweather.api_key = Some(SecretString::from("secret"));
        config
    }

    fn no_env() -> config::Environment {
        AppConfig::environment().source(Some(HashMap::new()))
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.listen_address, ":9091");
        assert_eq!(config.openweather.degrees_unit, "F");
        assert_eq!(config.openweather.language, "EN");
        assert_eq!(config.collector.city, "New York, NY");
        assert_eq!(config.collector.cache_ttl_secs, 300);
        assert!(!config.collector.enable_pollution);
        assert!(!config.collector.enable_uv);
        assert!(!config.logging.json);
    }

    #[test]
    fn validate_produces_typed_settings() {
        let mut config = with_key();
        config.collector.city = "Seattle, WA | New York, NY".to_string();
        config.openweather.degrees_unit = "K".to_string();

        let settings = config.validate().unwrap();

        assert_eq!(settings.listen_address, "0.0.0.0:9091".parse().unwrap());
        assert_eq!(settings.locations, vec!["Seattle, WA", "New York, NY"]);
        assert_eq!(settings.degrees_unit, DegreesUnit::Kelvin);
        assert_eq!(settings.cache_ttl, Duration::from_secs(300));
        assert_eq!(settings.api_key.expose_secret(), "secret");
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let mut config = AppConfig::default();
        config.openweather.api_key = Some(SecretString::from("  "));
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let mut config = with_key();
        config.openweather.degrees_unit = "X".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::UnknownUnit(ref unit)) if unit == "X"
        ));
        assert!(err.to_string().contains("Unknown unit X"));
    }

    #[test]
    fn malformed_location_list_is_rejected() {
        let mut config = with_key();
        config.collector.city = "Seattle, WA||Boston, MA".to_string();
        assert!(matches!(
            config.validate(),
            Err(ApplicationError::Domain(DomainError::MalformedLocationList(_)))
        ));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = with_key();
        config.collector.cache_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn listen_address_forms() {
        assert_eq!(
            parse_listen_address(":9091").unwrap(),
            "0.0.0.0:9091".parse().unwrap()
        );
        assert_eq!(
            parse_listen_address("127.0.0.1:8080").unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
        assert!(parse_listen_address("not an address").is_err());
        assert!(parse_listen_address(":notaport").is_err());
    }

    #[test]
    fn load_reads_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
listen_address = "127.0.0.1:9100"

[openweather]
api_key = "from-file"
degrees_unit = "C"

[collector]
city = "Seattle, WA"
cache_ttl_secs = 60
enable_pollution = true
"#
        )
        .unwrap();

        let config = AppConfig::load_with(Some(file.path()), no_env()).unwrap();

        assert_eq!(config.server.listen_address, "127.0.0.1:9100");
        assert_eq!(config.openweather.degrees_unit, "C");
        assert_eq!(config.collector.cache_ttl_secs, 60);
        assert!(config.collector.enable_pollution);
        assert!(!config.collector.enable_uv);
        assert_eq!(config.openweather.language, "EN");

        let settings = config.validate().unwrap();
        assert_eq!(settings.api_key.expose_secret(), "from-file");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(AppConfig::load_with(Some(&path), no_env()).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[collector]\ncache_ttl_secs = 60").unwrap();

        let env = HashMap::from([
            (
                "OPENWEATHER_EXPORTER__COLLECTOR__CACHE_TTL_SECS".to_string(),
                "120".to_string(),
            ),
            (
                "OPENWEATHER_EXPORTER__OPENWEATHER__API_KEY".to_string(),
                "12345".to_string(),
            ),
            (
                "OPENWEATHER_EXPORTER__COLLECTOR__ENABLE_UV".to_string(),
                "true".to_string(),
            ),
        ]);
        let environment = AppConfig::environment().source(Some(env));

        let config = AppConfig::load_with(Some(file.path()), environment).unwrap();

        assert_eq!(config.collector.cache_ttl_secs, 120);
        assert!(config.collector.enable_uv);
        assert_eq!(
            config.openweather.api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("12345".to_string())
        );
    }

    #[test]
    fn api_key_is_not_serialized() {
        let json = serde_json::to_string(&with_key()).unwrap();
        assert!(!json.contains("secret"));
    }
}
