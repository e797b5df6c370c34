use anyhow::{anyhow, Context as _, Result};
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};
use vpgeo_gateways::cache::DEFAULT_KEY as DEFAULT_CACHE_KEY;

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "vpgeo.toml";

const ENV_NAME_CACHE_DIR: &str = "VPGEO_CACHE_DIR";

pub struct Config {
    pub cache: Cache,
    pub queue: Queue,
    pub http: Http,
    pub providers: Vec<Provider>,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::debug!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)
                .with_context(|| format!("Invalid configuration file {}", file_path.display()))?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::debug!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(dir) = env::var(ENV_NAME_CACHE_DIR) {
            cfg.cache.dir = PathBuf::from(dir);
        }
        Ok(cfg)
    }
}

pub struct Cache {
    /// File system directory of the JSON cache document.
    pub dir: PathBuf,
    pub key: String,
}

pub struct Queue {
    pub throttle_backoff: Duration,
    pub max_throttled_retries: u32,
    pub max_failed_retries: u32,
}

pub struct Http {
    pub user_agent: String,
    pub accept_language: Option<String>,
}

pub struct Provider {
    pub gateway: GeocodingGateway,
    pub timeout: Duration,
    pub min_interval: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodingGateway {
    Photon { base_url: String, limit: Option<u8> },
    Nominatim { base_url: String },
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            cache,
            queue,
            http,
            geocoding,
            gateway,
        } = from;

        let raw::Cache { dir, key } = cache.unwrap_or_default();
        let cache = Cache {
            dir,
            key: key.unwrap_or_else(|| DEFAULT_CACHE_KEY.to_string()),
        };
        if cache.key.trim().is_empty() {
            return Err(anyhow!("Empty cache key"));
        }

        let raw::Queue {
            throttle_backoff,
            max_throttled_retries,
            max_failed_retries,
        } = queue.unwrap_or_default();
        let queue = Queue {
            throttle_backoff,
            max_throttled_retries,
            max_failed_retries,
        };

        let raw::Http {
            user_agent,
            accept_language,
        } = http.unwrap_or_default();
        if user_agent.trim().is_empty() {
            return Err(anyhow!("An HTTP user agent is required"));
        }
        let http = Http {
            user_agent,
            accept_language,
        };

        let raw::Geocoding { providers: names } = geocoding.unwrap_or_default();
        if names.is_empty() {
            return Err(anyhow!("No geocoding providers defined"));
        }
        let defaults = raw::Gateway::default();
        let (photon, nominatim) = match gateway {
            Some(raw::Gateway { photon, nominatim }) => (
                photon.or(defaults.photon),
                nominatim.or(defaults.nominatim),
            ),
            None => (defaults.photon, defaults.nominatim),
        };
        let mut providers = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(anyhow!("Geocoding provider '{name:?}' is listed twice"));
            }
            let provider = match name {
                raw::GeocodingGateway::Photon => {
                    let raw::Photon {
                        base_url,
                        timeout,
                        min_interval,
                        limit,
                    } = photon
                        .clone()
                        .ok_or_else(|| anyhow!("Missing 'photon' gateway configuration"))?;
                    Provider {
                        gateway: GeocodingGateway::Photon { base_url, limit },
                        timeout,
                        min_interval,
                    }
                }
                raw::GeocodingGateway::Nominatim => {
                    let raw::Nominatim {
                        base_url,
                        timeout,
                        min_interval,
                    } = nominatim
                        .clone()
                        .ok_or_else(|| anyhow!("Missing 'nominatim' gateway configuration"))?;
                    Provider {
                        gateway: GeocodingGateway::Nominatim { base_url },
                        timeout,
                        min_interval,
                    }
                }
            };
            if provider.timeout.is_zero() {
                return Err(anyhow!("Zero timeout of geocoding provider '{name:?}'"));
            }
            providers.push(provider);
        }

        Ok(Self {
            cache,
            queue,
            http,
            providers,
        })
    }
}
