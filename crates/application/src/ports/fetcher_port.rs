//! Upstream fetcher port
//!
//! One fetcher exists per data source. A fetch performs exactly one outbound
//! request and either yields a parsed snapshot or a `FetchError`. Both carry
//! the HTTP status line when a response was received, so the collector can
//! account for every call that reached the upstream.

use async_trait::async_trait;
use domain::Location;
use thiserror::Error;

/// A successfully parsed upstream response
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<S> {
    /// Parsed snapshot
    pub snapshot: S,
    /// HTTP status line, e.g. `200 OK`
    pub status: String,
}

/// Recoverable upstream failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response was received (connect error, timeout, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The upstream answered with a non-2xx status
    #[error("Upstream returned {status}: {body}")]
    Status { status: String, body: String },

    /// The body could not be parsed into a snapshot
    #[error("Parse error ({status}): {message}")]
    Parse { status: String, message: String },
}

impl FetchError {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// HTTP status line, if a response was received
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Transport(_) => None,
            Self::Status { status, .. } | Self::Parse { status, .. } => Some(status),
        }
    }
}

/// Fetcher for the snapshots of one source
#[async_trait]
pub trait SnapshotFetcher<S>: Send + Sync + std::fmt::Debug {
    /// Endpoint URL used as the `endpoint` label of the call counter
    fn endpoint(&self) -> &str;

    /// Fetch a fresh snapshot for the given location
    async fn fetch(&self, location: &Location) -> Result<Fetched<S>, FetchError>;
}
