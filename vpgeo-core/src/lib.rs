//! # vpgeo-core
//!
//! Geocoding lookup keys, the contracts of the outer gateways
//! (providers and durable cache storage) and the session cache.

pub mod cache;
pub mod error;
pub mod gateways;
pub mod query;

pub mod entities {
    pub use vpgeo_entities::{address::*, geo::*, place::*, result::*};
}

pub mod prelude {
    pub use crate::{
        cache::GeocodeCache,
        entities::*,
        error::GeocodeError,
        gateways::{
            cache::{CacheStore, CacheStoreError},
            geocode::{GeocodingProvider, ProviderError},
        },
        query::{GeocodeQuery, QueryError},
    };
}
