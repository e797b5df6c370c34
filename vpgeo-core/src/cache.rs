use crate::{entities::GeocodeResult, gateways::cache::*};
use std::{collections::HashMap, sync::Arc};

/// Session cache of geocoding results.
///
/// Keys are the exact lookup keys. Entries are never evicted,
/// "not found" results are cached as well. Every insert yields
/// a full snapshot that has to be persisted through the [`CacheStore`].
pub struct GeocodeCache {
    entries: HashMap<String, GeocodeResult>,
    store: Arc<dyn CacheStore>,
}

/// A snapshot of the cache that still needs to be written.
///
/// Saving blocks on I/O and needs no access to the cache.
#[must_use]
pub struct PendingSave {
    store: Arc<dyn CacheStore>,
    snapshot: HashMap<String, GeocodeResult>,
}

impl PendingSave {
    /// A failing store only costs durability, the entry stays cached.
    pub fn save(self) {
        if let Err(err) = self.store.save(&self.snapshot) {
            log::warn!("Unable to persist the geocoding cache: {err}");
        }
    }
}

impl GeocodeCache {
    /// Loads the persisted snapshot.
    ///
    /// An unreadable snapshot is logged and replaced by an empty cache.
    pub fn load<S>(store: S) -> Self
    where
        S: CacheStore + 'static,
    {
        let entries = match store.load() {
            Ok(entries) => {
                log::debug!("Loaded {} cached geocoding results", entries.len());
                entries
            }
            Err(err) => {
                log::warn!("Unable to load the geocoding cache, starting empty: {err}");
                HashMap::new()
            }
        };
        Self {
            entries,
            store: Arc::new(store),
        }
    }

    pub fn get(&self, key: &str) -> Option<&GeocodeResult> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, result: GeocodeResult) -> PendingSave {
        self.entries.insert(key, result);
        PendingSave {
            store: Arc::clone(&self.store),
            snapshot: self.entries.clone(),
        }
    }

    pub fn clear(&mut self) -> Result<(), CacheStoreError> {
        self.entries.clear();
        self.store.save(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GeocodeResult)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Place;
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use vpgeo_entities::builders::*;

    #[derive(Default, Clone)]
    struct MockStore {
        saved: Arc<Mutex<Vec<HashMap<String, GeocodeResult>>>>,
        initial: HashMap<String, GeocodeResult>,
        broken: bool,
    }

    impl CacheStore for MockStore {
        fn load(&self) -> Result<HashMap<String, GeocodeResult>, CacheStoreError> {
            if self.broken {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "garbage").into());
            }
            Ok(self.initial.clone())
        }
        fn save(&self, entries: &HashMap<String, GeocodeResult>) -> Result<(), CacheStoreError> {
            if self.broken {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into());
            }
            self.saved.lock().unwrap().push(entries.clone());
            Ok(())
        }
    }

    fn kyoto() -> GeocodeResult {
        GeocodeResult::Places(vec![Place::build()
            .lat_lon(35.0116, 135.7681)
            .display_name("Kyoto, Japan")
            .finish()])
    }

    #[test]
    fn load_persisted_entries() {
        let mut store = MockStore::default();
        store.initial.insert("Kyoto".into(), kyoto());
        let cache = GeocodeCache::load(store);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("Kyoto"), Some(&kyoto()));
        assert_eq!(cache.get("kyoto"), None);
    }

    #[test]
    fn insert_persists_full_snapshot() {
        let store = MockStore::default();
        let saved = store.saved.clone();
        let mut cache = GeocodeCache::load(store);
        cache.insert("Kyoto".into(), kyoto()).save();
        cache.insert("Atlantis".into(), GeocodeResult::Places(vec![])).save();
        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].len(), 2);
        assert!(saved[1]["Atlantis"].is_empty());
    }

    #[test]
    fn broken_store_degrades_to_memory() {
        let store = MockStore {
            broken: true,
            ..Default::default()
        };
        let mut cache = GeocodeCache::load(store);
        assert!(cache.is_empty());
        cache.insert("Kyoto".into(), kyoto()).save();
        assert_eq!(cache.get("Kyoto"), Some(&kyoto()));
        assert!(cache.clear().is_err());
        assert!(cache.is_empty());
    }
}
