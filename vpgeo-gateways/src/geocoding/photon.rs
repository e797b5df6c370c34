use super::{fetch_json, non_blank};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use vpgeo_core::{
    entities::*,
    gateways::geocode::{GeocodingProvider, ProviderError},
    query::GeocodeQuery,
};

pub const DEFAULT_BASE_URL: &str = "https://photon.komoot.io";
pub const DEFAULT_LIMIT: u8 = 5;

/// Geocoding with [Photon](https://photon.komoot.io), an OSM based
/// search engine without strict usage limits.
#[derive(Debug, Clone)]
pub struct Photon {
    pub client: Client,
    pub base_url: String,
    pub limit: u8,
    pub language: Option<String>,
}

impl Photon {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            limit: DEFAULT_LIMIT,
            language: None,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url.trim_end_matches('/'))
    }

    fn params(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        if let Some(lang) = &self.language {
            params.push(("lang", lang.clone()));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: longitude, latitude
    coordinates: [f64; 2],
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    name: Option<String>,
    housenumber: Option<String>,
    street: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl From<Properties> for Address {
    fn from(from: Properties) -> Self {
        let Properties {
            name,
            housenumber,
            street,
            postcode,
            city,
            state,
            country,
        } = from;
        Self {
            name: non_blank(name),
            house_number: non_blank(housenumber),
            street: non_blank(street),
            zip: non_blank(postcode),
            city: non_blank(city),
            state: non_blank(state),
            country: non_blank(country),
        }
    }
}

fn places_from_features(collection: FeatureCollection) -> GeocodeResult {
    let places = collection
        .features
        .into_iter()
        .map(|f| {
            let [lon, lat] = f.geometry.coordinates;
            let address = Address::from(f.properties);
            Place {
                lat,
                lon,
                display_name: address.label(),
            }
        })
        .collect();
    GeocodeResult::Places(places)
}

/// The first feature with any address information.
fn reverse_from_features(collection: FeatureCollection) -> GeocodeResult {
    let rev = collection
        .features
        .into_iter()
        .map(|f| Address::from(f.properties))
        .find(|address| !address.is_empty())
        .map(|address| ReverseAddress {
            display_name: address.label(),
            address,
        });
    GeocodeResult::Reverse(rev)
}

#[async_trait]
impl GeocodingProvider for Photon {
    fn name(&self) -> &str {
        "photon"
    }

    async fn attempt(&self, query: &GeocodeQuery) -> Result<GeocodeResult, ProviderError> {
        match query {
            GeocodeQuery::Search(text) => {
                let params = self.params(vec![("q", text.clone()), ("limit", self.limit.to_string())]);
                let request = self.client.get(self.url("api/")).query(&params);
                log::debug!("Photon search for '{text}'");
                fetch_json(request).await.map(places_from_features)
            }
            GeocodeQuery::Reverse(pos) => {
                let params = self.params(vec![
                    ("lat", pos.lat().to_string()),
                    ("lon", pos.lon().to_string()),
                ]);
                let request = self.client.get(self.url("reverse")).query(&params);
                log::debug!("Photon reverse lookup of {pos}");
                fetch_json(request).await.map(reverse_from_features)
            }
        }
    }
}
