//! Command-line flags
//!
//! Every flag can also be given through its `OW_*` environment variable.
//! Flags that are present override the file and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use infrastructure::AppConfig;
use secrecy::SecretString;

/// OpenWeather exporter for Prometheus
#[derive(Debug, Parser)]
#[command(name = "openweather-exporter")]
#[command(author, version, about = "Openweather Exporter for Openweather API", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./config.toml if present)
    #[arg(long, env = "OW_CONFIG")]
    pub config: Option<PathBuf>,

    /// HTTP address to listen on
    #[arg(long, env = "OW_LISTEN_ADDRESS")]
    pub listen_address: Option<String>,

    /// Openweather API key
    #[arg(long, env = "OW_APIKEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// Pipe-delimited list of locations to gather metrics for
    #[arg(long, env = "OW_CITY")]
    pub city: Option<String>,

    /// Base unit for temperature output: C, F or K
    #[arg(long, env = "OW_DEGREES_UNIT")]
    pub degrees_unit: Option<String>,

    /// Language for condition descriptions
    #[arg(long, env = "OW_LANGUAGE")]
    pub language: Option<String>,

    /// Seconds a fetched response is reused before calling the API again
    #[arg(long, env = "OW_CACHE_TTL")]
    pub cache_ttl: Option<u64>,

    /// Collect air pollution metrics
    #[arg(long, env = "OW_ENABLE_POLLUTION")]
    pub enable_pollution: bool,

    /// Collect UV index metrics
    #[arg(long, env = "OW_ENABLE_UV")]
    pub enable_uv: bool,

    /// Log as JSON lines
    #[arg(long, env = "OW_LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    /// Apply the flags that were given on top of the loaded configuration
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(listen_address) = self.listen_address {
            config.server.listen_address = listen_address;
        }
        if let Some(apikey) = self.apikey {
            config.openweather.api_key = Some(SecretString::from(apikey));
        }
        if let Some(city) = self.city {
            config.collector.city = city;
        }
        if let Some(degrees_unit) = self.degrees_unit {
            config.openweather.degrees_unit = degrees_unit;
        }
        if let Some(language) = self.language {
            config.openweather.language = language;
        }
        if let Some(cache_ttl) = self.cache_ttl {
            config.collector.cache_ttl_secs = cache_ttl;
        }
        if self.enable_pollution {
            config.collector.enable_pollution = true;
        }
        if self.enable_uv {
            config.collector.enable_uv = true;
        }
        if self.log_json {
            config.logging.json = true;
        }
    }
}
