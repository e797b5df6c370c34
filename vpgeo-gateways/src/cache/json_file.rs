use jfs::Store;
use std::{collections::HashMap, fs, io, path::Path};
use vpgeo_boundary::CacheSnapshot;
use vpgeo_core::{
    entities::GeocodeResult,
    gateways::cache::{CacheStore, CacheStoreError},
};

pub const DEFAULT_KEY: &str = "vp_geocoding_cache";

/// Keeps the geocoding cache as a single JSON document on disk.
pub struct JsonFileCache {
    json_store: Store,
    key: String,
}

impl JsonFileCache {
    pub fn try_new<P: AsRef<Path>>(directory: P, key: impl Into<String>) -> io::Result<Self> {
        fs::create_dir_all(directory.as_ref())?;
        let json_store = Store::new(directory)?;
        let key = key.into();
        Ok(Self { json_store, key })
    }
    pub fn path(&self) -> &Path {
        self.json_store.path()
    }
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CacheStore for JsonFileCache {
    fn load(&self) -> Result<HashMap<String, GeocodeResult>, CacheStoreError> {
        let snapshot = match self.json_store.get::<CacheSnapshot>(&self.key) {
            Ok(snapshot) => snapshot,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No geocoding cache found in {}", self.path().display());
                return Ok(HashMap::new());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(snapshot
            .into_iter()
            .map(|(key, res)| (key, res.into()))
            .collect())
    }

    fn save(&self, entries: &HashMap<String, GeocodeResult>) -> Result<(), CacheStoreError> {
        let snapshot: CacheSnapshot = entries
            .iter()
            .map(|(key, res)| (key.clone(), res.clone().into()))
            .collect();
        self.json_store.save_with_id(&snapshot, &self.key)?;
        Ok(())
    }
}
