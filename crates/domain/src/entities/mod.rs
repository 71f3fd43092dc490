//! Domain entities - parsed upstream responses

mod snapshot;

pub use snapshot::{Condition, PollutionSnapshot, UltravioletSnapshot, WeatherSnapshot};
