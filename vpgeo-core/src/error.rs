use crate::{gateways::geocode::ProviderError, query::QueryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
    #[error("Giving up on '{key}' after {retries} retries: {last}")]
    RetriesExhausted {
        key: String,
        retries: u32,
        last: ProviderError,
    },
    #[error("Geocoding provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        source: ProviderError,
    },
    #[error("No geocoding provider available")]
    NoProvider,
    #[error("The geocoding queue stopped before answering")]
    Dropped,
}

impl GeocodeError {
    /// The lookup key itself was unusable.
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }
}
