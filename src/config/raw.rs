use duration_str::{deserialize_duration, deserialize_option_duration};
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

const DEFAULT_CONFIG_FILE: &str = include_str!("vpgeo.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub cache: Option<Cache>,
    pub queue: Option<Queue>,
    pub http: Option<Http>,
    pub geocoding: Option<Geocoding>,
    pub gateway: Option<Gateway>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Cache {
    pub dir: PathBuf,
    pub key: Option<String>,
}

impl Default for Cache {
    fn default() -> Self {
        Config::default().cache.expect("Cache configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Queue {
    #[serde(deserialize_with = "deserialize_duration")]
    pub throttle_backoff: Duration,
    pub max_throttled_retries: u32,
    pub max_failed_retries: u32,
}

impl Default for Queue {
    fn default() -> Self {
        Config::default().queue.expect("Queue configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Http {
    pub user_agent: String,
    pub accept_language: Option<String>,
}

impl Default for Http {
    fn default() -> Self {
        Config::default().http.expect("HTTP configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Geocoding {
    pub providers: Vec<GeocodingGateway>,
}

impl Default for Geocoding {
    fn default() -> Self {
        Config::default().geocoding.expect("Geocoding configuration")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeocodingGateway {
    Photon,
    Nominatim,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gateway {
    pub photon: Option<Photon>,
    pub nominatim: Option<Nominatim>,
}

impl Default for Gateway {
    fn default() -> Self {
        Config::default().gateway.expect("Gateway configuration")
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Photon {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub min_interval: Option<Duration>,
    pub limit: Option<u8>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Nominatim {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub min_interval: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parse_default_config_from_file() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG_FILE).unwrap();
        assert!(cfg.cache.is_some());
        assert!(cfg.queue.is_some());
        assert!(cfg.http.is_some());
        assert!(cfg.geocoding.is_some());
        assert!(cfg.gateway.is_some());
    }

    #[test]
    fn default_gateway_config() {
        let Gateway { photon, nominatim } = Gateway::default();
        let photon = photon.unwrap();
        assert_eq!(photon.timeout, Duration::from_secs(8));
        assert!(photon.min_interval.is_none());
        let nominatim = nominatim.unwrap();
        assert_eq!(nominatim.timeout, Duration::from_secs(12));
        assert_eq!(nominatim.min_interval, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn default_queue_config() {
        let cfg = Queue::default();
        assert_eq!(cfg.throttle_backoff, Duration::from_secs(5));
        assert_eq!(cfg.max_throttled_retries, 3);
        assert_eq!(cfg.max_failed_retries, 2);
    }

    #[test]
    fn parse_provider_names() {
        let cfg: Config = toml::from_str(
            r#"
            [geocoding]
            providers = ["nominatim"]
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.geocoding.unwrap().providers,
            vec![GeocodingGateway::Nominatim]
        );
        let res: Result<Config, _> = toml::from_str(
            r#"
            [geocoding]
            providers = ["opencage"]
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn parse_full_config_example_from_file() {
        let cfg_string = fs::read_to_string("src/config/vpgeo.full-example.toml").unwrap();
        let _: Config = toml::from_str(&cfg_string).unwrap();
    }
}
