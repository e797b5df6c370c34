use crate::entities::GeocodeResult;
use std::{collections::HashMap, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Durable storage of the geocoding cache.
///
/// The whole cache is stored as one snapshot that
/// is overwritten on every save.
pub trait CacheStore: Send + Sync {
    /// A store without a snapshot yields an empty map.
    fn load(&self) -> Result<HashMap<String, GeocodeResult>, CacheStoreError>;
    fn save(&self, entries: &HashMap<String, GeocodeResult>) -> Result<(), CacheStoreError>;
}
