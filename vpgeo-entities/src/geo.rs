use std::fmt;
use thiserror::Error;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of range")]
    Latitude(f64),
    #[error("Longitude {0} is out of range")]
    Longitude(f64),
}

impl Coordinate {
    pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);
    pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);

    pub fn try_from_lat_lon(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !(Self::LAT_RANGE.0..=Self::LAT_RANGE.1).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !(Self::LON_RANGE.0..=Self::LON_RANGE.1).contains(&lon) {
            return Err(CoordinateError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    pub const fn lat(&self) -> f64 {
        self.lat
    }

    pub const fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}
