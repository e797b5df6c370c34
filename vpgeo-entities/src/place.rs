use crate::address::*;

/// A single forward geocoding hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// The outcome of a reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseAddress {
    pub display_name: String,
    pub address: Address,
}
