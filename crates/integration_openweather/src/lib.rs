//! OpenWeather integration
//!
//! Client for the OpenWeather APIs (<https://openweathermap.org/api>):
//! One Call 3.0 current conditions, current air pollution and the UV index.
//! Every call reports the HTTP status line it received so callers can account
//! for upstream usage.

pub mod client;
mod models;

pub use client::{ApiResponse, OpenWeatherClient, OpenWeatherConfig, OpenWeatherError};
pub use models::{
    AirQuality, Coordinates, CurrentWeather, OneCallResponse, PollutionComponents,
    PollutionEntry, PollutionResponse, Precipitation, UviResponse, WeatherCondition,
};
