use super::*;
use vpgeo_entities as e;

impl From<e::place::Place> for Place {
    fn from(from: e::place::Place) -> Self {
        let e::place::Place {
            lat,
            lon,
            display_name,
        } = from;
        Self {
            lat,
            lon,
            display_name,
        }
    }
}

impl From<Place> for e::place::Place {
    fn from(from: Place) -> Self {
        let Place {
            lat,
            lon,
            display_name,
        } = from;
        Self {
            lat,
            lon,
            display_name,
        }
    }
}

impl From<e::address::Address> for Address {
    fn from(from: e::address::Address) -> Self {
        let e::address::Address {
            name,
            house_number,
            street,
            zip,
            city,
            state,
            country,
        } = from;
        Self {
            name,
            house_number,
            street,
            zip,
            city,
            state,
            country,
        }
    }
}

impl From<Address> for e::address::Address {
    fn from(from: Address) -> Self {
        let Address {
            name,
            house_number,
            street,
            zip,
            city,
            state,
            country,
        } = from;
        Self {
            name,
            house_number,
            street,
            zip,
            city,
            state,
            country,
        }
    }
}

impl From<e::place::ReverseAddress> for ReverseAddress {
    fn from(from: e::place::ReverseAddress) -> Self {
        let e::place::ReverseAddress {
            display_name,
            address,
        } = from;
        Self {
            display_name,
            address: address.into(),
        }
    }
}

impl From<ReverseAddress> for e::place::ReverseAddress {
    fn from(from: ReverseAddress) -> Self {
        let ReverseAddress {
            display_name,
            address,
        } = from;
        Self {
            display_name,
            address: address.into(),
        }
    }
}

impl From<e::result::GeocodeResult> for GeocodeResult {
    fn from(from: e::result::GeocodeResult) -> Self {
        use e::result::GeocodeResult as E;
        match from {
            E::Places(places) => Self::Places(places.into_iter().map(Into::into).collect()),
            E::Reverse(rev) => Self::Reverse(rev.map(Into::into)),
        }
    }
}

impl From<GeocodeResult> for e::result::GeocodeResult {
    fn from(from: GeocodeResult) -> Self {
        match from {
            GeocodeResult::Places(places) => {
                Self::Places(places.into_iter().map(Into::into).collect())
            }
            GeocodeResult::Reverse(rev) => Self::Reverse(rev.map(Into::into)),
        }
    }
}
