use crate::{entities::GeocodeResult, query::GeocodeQuery};
use async_trait::async_trait;
use thiserror::Error;

/// A single attempt of a geocoding provider failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider signaled that the client exceeded its rate limit.
    #[error("Throttled by the provider (status {0})")]
    Throttled(u16),
    #[error("The request timed out")]
    Timeout,
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Unexpected response status {0}")]
    Status(u16),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Throttling signals: `429 Too Many Requests` and `503 Service Unavailable`.
    pub const fn from_throttling_status(status: u16) -> Option<Self> {
        match status {
            429 | 503 => Some(Self::Throttled(status)),
            _ => None,
        }
    }

    pub const fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled(_))
    }

    /// Transient errors might go away when trying again later.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Throttled(_) | Self::Timeout | Self::Connection(_) => true,
            Self::Status(status) => *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}

/// A geocoding backend, e.g. a public HTTP API.
///
/// Implementations must return normalized results so that
/// callers never need to know which provider answered.
/// An empty result is a successful "not found".
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn attempt(&self, query: &GeocodeQuery) -> Result<GeocodeResult, ProviderError>;
}
