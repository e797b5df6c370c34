use super::{fetch_json, non_blank};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use vpgeo_core::{
    entities::*,
    gateways::geocode::{GeocodingProvider, ProviderError},
    query::GeocodeQuery,
};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Geocoding with [Nominatim](https://nominatim.org).
///
/// The public instance allows at most one request per second
/// and requires an identifying `User-Agent`.
#[derive(Debug, Clone)]
pub struct Nominatim {
    pub client: Client,
    pub base_url: String,
    pub language: Option<String>,
}

impl Nominatim {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            language: None,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url.trim_end_matches('/'))
    }

    fn params(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        params.insert(0, ("format", "jsonv2".to_string()));
        if let Some(lang) = &self.language {
            params.push(("accept-language", lang.clone()));
        }
        params
    }
}

// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    name: Option<String>,
    address: Option<ReverseResponseAddress>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponseAddress {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

fn parse_coordinate(s: &str) -> Result<f64, ProviderError> {
    s.trim()
        .parse()
        .map_err(|_| ProviderError::Malformed(format!("Invalid coordinate '{s}'")))
}

fn places_from_hits(hits: Vec<SearchHit>) -> Result<GeocodeResult, ProviderError> {
    let places: Vec<Place> = hits
        .into_iter()
        .map(|hit| {
            Ok(Place {
                lat: parse_coordinate(&hit.lat)?,
                lon: parse_coordinate(&hit.lon)?,
                display_name: hit.display_name,
            })
        })
        .collect::<Result<_, ProviderError>>()?;
    Ok(GeocodeResult::Places(places))
}

fn reverse_from_response(res: ReverseResponse) -> GeocodeResult {
    if let Some(err) = res.error {
        log::debug!("Nominatim found no address: {err}");
        return GeocodeResult::Reverse(None);
    }
    let ReverseResponse {
        display_name,
        name,
        address,
        ..
    } = res;
    let Some(display_name) = non_blank(display_name) else {
        return GeocodeResult::Reverse(None);
    };
    let addr = address.unwrap_or_default();
    let address = Address {
        name: non_blank(name),
        house_number: non_blank(addr.house_number),
        street: non_blank(addr.road),
        zip: non_blank(addr.postcode),
        city: non_blank(addr.city)
            .or_else(|| non_blank(addr.town))
            .or_else(|| non_blank(addr.village)),
        state: non_blank(addr.state),
        country: non_blank(addr.country),
    };
    GeocodeResult::Reverse(Some(ReverseAddress {
        display_name,
        address,
    }))
}

#[async_trait]
impl GeocodingProvider for Nominatim {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn attempt(&self, query: &GeocodeQuery) -> Result<GeocodeResult, ProviderError> {
        match query {
            GeocodeQuery::Search(text) => {
                let params = self.params(vec![("q", text.clone())]);
                let request = self.client.get(self.url("search")).query(&params);
                log::debug!("Nominatim search for '{text}'");
                let hits = fetch_json(request).await?;
                places_from_hits(hits)
            }
            GeocodeQuery::Reverse(pos) => {
                let params = self.params(vec![
                    ("lat", pos.lat().to_string()),
                    ("lon", pos.lon().to_string()),
                ]);
                let request = self.client.get(self.url("reverse")).query(&params);
                log::debug!("Nominatim reverse lookup of {pos}");
                fetch_json(request).await.map(reverse_from_response)
            }
        }
    }
}
