//! Upstream data sources collected per location

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the independent upstream data categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Current weather conditions (always collected)
    Weather,
    /// Air pollution (optional)
    Pollution,
    /// Ultraviolet index (optional)
    Ultraviolet,
}

impl DataSource {
    /// All sources, in collection order
    pub const ALL: [Self; 3] = [Self::Weather, Self::Pollution, Self::Ultraviolet];

    /// Stable lowercase identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Pollution => "pollution",
            Self::Ultraviolet => "ultraviolet",
        }
    }

    /// Position of this source in per-source arrays
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Weather => 0,
            Self::Pollution => 1,
            Self::Ultraviolet => 2,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_distinct() {
        let mut slots: Vec<usize> = DataSource::ALL.iter().map(|s| s.slot()).collect();
        slots.dedup();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&DataSource::Ultraviolet).unwrap();
        assert_eq!(json, "\"ultraviolet\"");
        assert_eq!(DataSource::Pollution.to_string(), "pollution");
    }
}
