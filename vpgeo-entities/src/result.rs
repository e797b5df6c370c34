use crate::place::*;

/// Provider independent geocoding result.
///
/// "Not found" is a regular result: an empty list of places
/// or a reverse lookup without an address.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeResult {
    Places(Vec<Place>),
    Reverse(Option<ReverseAddress>),
}

impl GeocodeResult {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Places(places) => places.is_empty(),
            Self::Reverse(addr) => addr.is_none(),
        }
    }

    pub fn places(&self) -> Option<&[Place]> {
        match self {
            Self::Places(places) => Some(places),
            Self::Reverse(_) => None,
        }
    }

    pub fn reverse(&self) -> Option<&ReverseAddress> {
        match self {
            Self::Reverse(addr) => addr.as_ref(),
            Self::Places(_) => None,
        }
    }
}
