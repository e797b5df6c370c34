pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{address_builder::*, place_builder::*, reverse_address_builder::*};

pub mod place_builder {

    use super::*;
    use crate::place::*;

    #[derive(Debug)]
    pub struct PlaceBuild {
        place: Place,
    }

    impl PlaceBuild {
        pub fn lat_lon(mut self, lat: f64, lon: f64) -> Self {
            self.place.lat = lat;
            self.place.lon = lon;
            self
        }
        pub fn display_name(mut self, name: &str) -> Self {
            self.place.display_name = name.into();
            self
        }
        pub fn finish(self) -> Place {
            self.place
        }
    }

    impl Builder for Place {
        type Build = PlaceBuild;
        fn build() -> PlaceBuild {
            PlaceBuild {
                place: Place {
                    lat: 0.0,
                    lon: 0.0,
                    display_name: "".into(),
                },
            }
        }
    }
}

pub mod address_builder {

    use super::*;
    use crate::address::*;

    #[derive(Debug)]
    pub struct AddressBuild {
        addr: Address,
    }

    impl AddressBuild {
        pub fn name(mut self, x: &str) -> Self {
            self.addr.name = Some(x.into());
            self
        }
        pub fn house_number(mut self, x: &str) -> Self {
            self.addr.house_number = Some(x.into());
            self
        }
        pub fn street(mut self, x: &str) -> Self {
            self.addr.street = Some(x.into());
            self
        }
        pub fn zip(mut self, x: &str) -> Self {
            self.addr.zip = Some(x.into());
            self
        }
        pub fn city(mut self, x: &str) -> Self {
            self.addr.city = Some(x.into());
            self
        }
        pub fn state(mut self, x: &str) -> Self {
            self.addr.state = Some(x.into());
            self
        }
        pub fn country(mut self, x: &str) -> Self {
            self.addr.country = Some(x.into());
            self
        }
        pub fn finish(self) -> Address {
            self.addr
        }
    }

    impl Builder for Address {
        type Build = AddressBuild;
        fn build() -> Self::Build {
            AddressBuild {
                addr: Address::default(),
            }
        }
    }

    #[test]
    fn empty_address() {
        assert!(Address::default().is_empty());
        assert!(!Address::build().name("x").finish().is_empty());
        assert!(!Address::build().house_number("x").finish().is_empty());
        assert!(!Address::build().street("x").finish().is_empty());
        assert!(!Address::build().zip("x").finish().is_empty());
        assert!(!Address::build().city("x").finish().is_empty());
        assert!(!Address::build().state("x").finish().is_empty());
        assert!(!Address::build().country("x").finish().is_empty());
    }
}

pub mod reverse_address_builder {

    use super::*;
    use crate::{address::*, place::*};

    #[derive(Debug)]
    pub struct ReverseAddressBuild {
        rev: ReverseAddress,
    }

    impl ReverseAddressBuild {
        pub fn display_name(mut self, name: &str) -> Self {
            self.rev.display_name = name.into();
            self
        }
        pub fn address(mut self, address: Address) -> Self {
            self.rev.address = address;
            self
        }
        pub fn finish(self) -> ReverseAddress {
            self.rev
        }
    }

    impl Builder for ReverseAddress {
        type Build = ReverseAddressBuild;
        fn build() -> Self::Build {
            ReverseAddressBuild {
                rev: ReverseAddress {
                    display_name: "".into(),
                    address: Address::default(),
                },
            }
        }
    }
}
