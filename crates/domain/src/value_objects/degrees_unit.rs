//! Temperature unit selection
//!
//! The exporter accepts a single-letter unit (`C`, `F` or `K`) and maps it to
//! the unit system understood by the OpenWeather API.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::DomainError;

/// Unit in which temperatures (and wind speeds) are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegreesUnit {
    /// Celsius, metric system
    Celsius,
    /// Fahrenheit, imperial system
    Fahrenheit,
    /// Kelvin, the API's internal units
    Kelvin,
}

impl DegreesUnit {
    /// Value of the `units` query parameter for this unit
    #[must_use]
    pub const fn api_units(&self) -> &'static str {
        match self {
            Self::Celsius => "metric",
            Self::Fahrenheit => "imperial",
            Self::Kelvin => "internal",
        }
    }

    /// Single-letter symbol as accepted in configuration
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
            Self::Kelvin => "K",
        }
    }
}

impl FromStr for DegreesUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(Self::Celsius),
            "F" => Ok(Self::Fahrenheit),
            "K" => Ok(Self::Kelvin),
            other => Err(DomainError::UnknownUnit(other.to_string())),
        }
    }
}

impl fmt::Display for DegreesUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_symbols_to_api_units() {
        assert_eq!("C".parse::<DegreesUnit>().unwrap().api_units(), "metric");
        assert_eq!("F".parse::<DegreesUnit>().unwrap().api_units(), "imperial");
        assert_eq!("K".parse::<DegreesUnit>().unwrap().api_units(), "internal");
    }

    #[test]
    fn rejects_unknown_symbols() {
        for input in ["X", "c", "", "celsius", " F"] {
            let err = input.parse::<DegreesUnit>().unwrap_err();
            assert!(matches!(err, DomainError::UnknownUnit(ref u) if u == input));
        }
    }

    #[test]
    fn display_round_trips_symbol() {
        for unit in [
            DegreesUnit::Celsius,
            DegreesUnit::Fahrenheit,
            DegreesUnit::Kelvin,
        ] {
            assert_eq!(unit.to_string().parse::<DegreesUnit>().unwrap(), unit);
        }
    }
}
