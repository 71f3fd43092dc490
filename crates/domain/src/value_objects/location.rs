//! Resolved location value object
//!
//! A `Location` is created once at startup after geocoding and lives for the
//! whole process. It carries one precomputed cache key per data source so the
//! collector never has to format keys on the scrape path.

use serde::Serialize;
use std::{collections::HashSet, fmt};

use super::{DataSource, GeoLocation};
use crate::DomainError;

/// Cache key identifying one (location, source) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a source from the location identity
    ///
    /// Components are hashed with blake3 so names of any length map to a
    /// fixed-size key; the `|` separator keeps `("ab", "c")` and `("a", "bc")`
    /// apart.
    fn derive(source: DataSource, components: &[&str]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for component in components {
            hasher.update(component.as_bytes());
            hasher.update(b"|");
        }
        Self(format!("{}:{}", source.as_str(), hasher.finalize().to_hex()))
    }

    /// Borrow the key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured location together with its resolved coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    name: String,
    coordinates: GeoLocation,
    #[serde(skip)]
    cache_keys: [CacheKey; 3],
}

impl Location {
    /// Create a location from its configured name and resolved coordinates
    #[must_use]
    pub fn new(name: impl Into<String>, coordinates: GeoLocation) -> Self {
        let name = name.into();
        let lat = coordinates.latitude().to_string();
        let lon = coordinates.longitude().to_string();
        let cache_keys =
            DataSource::ALL.map(|source| CacheKey::derive(source, &[&name, &lat, &lon]));

        Self {
            name,
            coordinates,
            cache_keys,
        }
    }

    /// Human-readable name, used as the `location` label
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved coordinates
    #[must_use]
    pub const fn coordinates(&self) -> GeoLocation {
        self.coordinates
    }

    /// Cache key for the given source
    #[must_use]
    pub fn cache_key(&self, source: DataSource) -> &CacheKey {
        &self.cache_keys[source.slot()]
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.coordinates)
    }
}

/// Split a pipe-delimited location list into trimmed names
///
/// `"New York, NY|Seattle, WA"` yields two names. Empty entries and
/// duplicates make the list malformed.
///
/// # Errors
///
/// Returns `DomainError::MalformedLocationList` for an empty list, an empty
/// entry, or a name that appears twice.
pub fn parse_location_names(list: &str) -> Result<Vec<String>, DomainError> {
    if list.trim().is_empty() {
        return Err(DomainError::MalformedLocationList(
            "no locations configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for (index, entry) in list.split('|').enumerate() {
        let name = entry.trim();
        if name.is_empty() {
            return Err(DomainError::MalformedLocationList(format!(
                "entry {} is empty",
                index + 1
            )));
        }
        if !seen.insert(name) {
            return Err(DomainError::MalformedLocationList(format!(
                "duplicate location {name:?}"
            )));
        }
        names.push(name.to_string());
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn seattle() -> Location {
        Location::new("Seattle, WA", GeoLocation::new(47.6, -122.3).unwrap())
    }

    #[test]
    fn cache_keys_differ_per_source() {
        let loc = seattle();
        let weather = loc.cache_key(DataSource::Weather);
        let pollution = loc.cache_key(DataSource::Pollution);
        let uv = loc.cache_key(DataSource::Ultraviolet);

        assert_ne!(weather, pollution);
        assert_ne!(pollution, uv);
        assert!(weather.as_str().starts_with("weather:"));
        assert!(uv.as_str().starts_with("ultraviolet:"));
    }

    #[test]
    fn cache_keys_differ_per_location() {
        let a = seattle();
        let b = Location::new("Portland, OR", GeoLocation::new(45.5, -122.7).unwrap());
        assert_ne!(
            a.cache_key(DataSource::Weather),
            b.cache_key(DataSource::Weather)
        );
    }

    #[test]
    fn cache_keys_are_stable() {
        assert_eq!(
            seattle().cache_key(DataSource::Weather),
            seattle().cache_key(DataSource::Weather)
        );
    }

    #[test]
    fn display_includes_name_and_coordinates() {
        let display = seattle().to_string();
        assert!(display.starts_with("Seattle, WA ("));
        assert!(display.contains("47.6"));
    }

    #[test]
    fn parses_pipe_delimited_list() {
        let names = parse_location_names("New York, NY|Seattle, WA").unwrap();
        assert_eq!(names, vec!["New York, NY", "Seattle, WA"]);
    }

    #[test]
    fn trims_whitespace_around_entries() {
        let names = parse_location_names("  Berlin | Paris ").unwrap();
        assert_eq!(names, vec!["Berlin", "Paris"]);
    }

    #[test]
    fn rejects_empty_entries() {
        assert!(parse_location_names("").is_err());
        assert!(parse_location_names("   ").is_err());
        assert!(parse_location_names("Berlin||Paris").is_err());
        assert!(parse_location_names("Berlin|").is_err());
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = parse_location_names("Berlin|Paris| Berlin").unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    proptest! {
        #[test]
        fn parsed_names_are_trimmed_and_non_empty(
            names in prop::collection::hash_set("[A-Za-z][A-Za-z ,]{0,20}[A-Za-z]", 1..6)
        ) {
            let list = names.iter().cloned().collect::<Vec<_>>().join("|");
            let parsed = parse_location_names(&list).unwrap();
            prop_assert_eq!(parsed.len(), names.len());
            for name in parsed {
                prop_assert!(!name.is_empty());
                prop_assert_eq!(name.trim(), name.as_str());
            }
        }
    }
}
