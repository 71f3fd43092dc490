//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Degrees unit is not one of C, F or K
    #[error("Unknown unit {0} (must be C, F, or K)")]
    UnknownUnit(String),

    /// Location list could not be split into location names
    #[error("Malformed location list: {0}")]
    MalformedLocationList(String),

    /// Coordinates that are not numbers or lie outside the WGS84 range
    #[error("Invalid coordinates ({coordinates}): {reason}")]
    InvalidCoordinates { coordinates: String, reason: String },
}

impl DomainError {
    /// Create an invalid coordinates error
    pub fn invalid_coordinates(coordinates: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            coordinates: coordinates.into(),
            reason: reason.into(),
        }
    }
}
