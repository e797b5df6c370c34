use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(feature = "entity-conversions")]
mod conv;

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "extra-derive"), derive(Debug, Clone, PartialEq))]
pub struct Place {
    pub lat          : f64,
    pub lon          : f64,
    pub display_name : String,
}

#[derive(Default, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "extra-derive"), derive(Debug, Clone, PartialEq))]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "extra-derive"), derive(Debug, Clone, PartialEq))]
pub struct ReverseAddress {
    pub display_name: String,
    #[serde(default)]
    pub address: Address,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "extra-derive"), derive(Debug, Clone, PartialEq))]
#[serde(rename_all = "kebab-case")]
pub enum GeocodeResult {
    Places(Vec<Place>),
    Reverse(Option<ReverseAddress>),
}

/// A resolved lookup as printed by the command line interface.
#[derive(Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "extra-derive"), derive(Debug, Clone, PartialEq))]
pub struct Lookup {
    pub key: String,
    pub result: GeocodeResult,
}

/// All cached results keyed by their lookup key.
///
/// A sorted map keeps the persisted document stable between writes.
pub type CacheSnapshot = BTreeMap<String, GeocodeResult>;
