//! Application-level errors
//!
//! Startup errors (configuration, resolution) are fatal: the process must not
//! serve. Runtime errors (fetch, cache write) are recovered inside the scrape
//! that produced them.

use domain::DomainError;
use thiserror::Error;

use crate::ports::FetchError;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configured location could not be geocoded
    #[error("Could not resolve location {location:?}: {reason}")]
    Resolution { location: String, reason: String },

    /// Upstream request failed or returned an unusable response
    #[error(transparent)]
    UpstreamFetch(#[from] FetchError),

    /// A snapshot could not be stored in the cache
    #[error("Cache write failed: {0}")]
    CacheWrite(String),
}

impl ApplicationError {
    /// Create a resolution error
    pub fn resolution(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            location: location.into(),
            reason: reason.into(),
        }
    }
}
