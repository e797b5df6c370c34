use crate::config::{self, Config, GeocodingGateway};
use anyhow::{Context as _, Result};
use vpgeo_application::prelude::*;
use vpgeo_gateways::{
    cache::JsonFileCache,
    geocoding::{http_client, Nominatim, Photon},
};

pub fn provider_chain(cfg: &Config) -> Result<ProviderChain> {
    let client = http_client(&cfg.http.user_agent).context("Unable to create HTTP client")?;
    let language = cfg.http.accept_language.clone();
    let slots = cfg
        .providers
        .iter()
        .map(|p| {
            let config::Provider {
                gateway,
                timeout,
                min_interval,
            } = p;
            let slot = match gateway {
                GeocodingGateway::Photon { base_url, limit } => {
                    log::info!("Use Photon geocoding gateway ({base_url})");
                    let mut gw = Photon::new(client.clone(), base_url.clone());
                    if let Some(limit) = limit {
                        gw.limit = *limit;
                    }
                    gw.language = language.clone();
                    ProviderSlot::new(gw, *timeout)
                }
                GeocodingGateway::Nominatim { base_url } => {
                    log::info!("Use Nominatim geocoding gateway ({base_url})");
                    let mut gw = Nominatim::new(client.clone(), base_url.clone());
                    gw.language = language.clone();
                    ProviderSlot::new(gw, *timeout)
                }
            };
            match min_interval {
                Some(interval) => slot.with_min_interval(*interval),
                None => slot,
            }
        })
        .collect();
    Ok(ProviderChain::new(slots))
}

pub fn cache_store(cfg: &config::Cache) -> Result<JsonFileCache> {
    let store = JsonFileCache::try_new(&cfg.dir, cfg.key.clone())
        .with_context(|| format!("Unable to open cache directory {}", cfg.dir.display()))?;
    log::debug!(
        "Use geocoding cache '{}' in {}",
        store.key(),
        store.path().display()
    );
    Ok(store)
}

pub fn queue_policy(cfg: &config::Queue) -> QueuePolicy {
    let config::Queue {
        throttle_backoff,
        max_throttled_retries,
        max_failed_retries,
    } = *cfg;
    QueuePolicy {
        throttle_backoff,
        max_throttled_retries,
        max_failed_retries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{
        path::PathBuf,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };
    use vpgeo_core::prelude::*;
    use vpgeo_entities::builders::*;

    struct CountingProvider(Arc<AtomicUsize>);

    #[async_trait]
    impl GeocodingProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }
        async fn attempt(&self, _: &GeocodeQuery) -> Result<GeocodeResult, ProviderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(GeocodeResult::Places(vec![Place::build()
                .lat_lon(35.6585805, 139.7454329)
                .display_name("Tokyo Tower, Minato, Japan")
                .finish()]))
        }
    }

    fn counting_service(cfg: &config::Cache, calls: &Arc<AtomicUsize>) -> GeocodeService {
        let chain = ProviderChain::new(vec![ProviderSlot::new(
            CountingProvider(Arc::clone(calls)),
            Duration::from_secs(1),
        )]);
        let cache = GeocodeCache::load(cache_store(cfg).unwrap());
        GeocodeService::new(chain, cache, QueuePolicy::default())
    }

    #[test]
    fn build_default_provider_chain() {
        let file: Option<PathBuf> = None;
        let cfg = Config::try_load_from_file_or_default(file).unwrap();
        let chain = provider_chain(&cfg).unwrap();
        assert_eq!(chain.names().collect::<Vec<_>>(), vec!["photon", "nominatim"]);
        assert_eq!(queue_policy(&cfg.queue), QueuePolicy::default());
    }

    #[test]
    fn open_cache_store() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config::Cache {
            dir: dir.path().join("cache"),
            key: "trip".into(),
        };
        let store = cache_store(&cfg).unwrap();
        assert_eq!(store.key(), "trip");
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn reuse_cache_of_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config::Cache {
            dir: dir.path().to_path_buf(),
            key: "trip".into(),
        };
        let calls = Arc::new(AtomicUsize::new(0));

        let first_run = counting_service(&cfg, &calls);
        let found = first_run.lookup("Tokyo Tower").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        drop(first_run);

        let second_run = counting_service(&cfg, &calls);
        assert_eq!(second_run.cache_len(), 1);
        assert_eq!(second_run.lookup("Tokyo Tower").await.unwrap(), found);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
