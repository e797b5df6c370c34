use crate::entities::{Coordinate, CoordinateError};
use std::fmt;
use thiserror::Error;
use url::Url;

/// What a lookup key asks for.
///
/// A key is either a free text search, a `"<lat>,<lon>"` pair or a
/// Nominatim style lookup URL (`.../search?q=..` or
/// `.../reverse?lat=..&lon=..`). The exact key string identifies
/// the lookup in the cache, the parsed query is what providers see.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeQuery {
    Search(String),
    Reverse(Coordinate),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    #[error("Empty query")]
    Empty,
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Unsupported lookup URL '{0}'")]
    UnsupportedUrl(String),
    #[error("Missing query parameter '{0}'")]
    MissingParameter(&'static str),
    #[error("Invalid number '{0}'")]
    Number(String),
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

impl GeocodeQuery {
    pub fn search(text: impl Into<String>) -> Result<Self, QueryError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self::Search(trimmed.to_owned()))
    }

    pub fn reverse(lat: f64, lon: f64) -> Result<Self, QueryError> {
        Ok(Self::Reverse(Coordinate::try_from_lat_lon(lat, lon)?))
    }

    pub fn parse(key: &str) -> Result<Self, QueryError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(QueryError::Empty);
        }
        if key.starts_with("http://") || key.starts_with("https://") {
            return Self::from_lookup_url(key);
        }
        if let Some((lat, lon)) = key.split_once(',') {
            if let (Ok(lat), Ok(lon)) = (lat.trim().parse(), lon.trim().parse()) {
                return Self::reverse(lat, lon);
            }
        }
        Self::search(key)
    }

    fn from_lookup_url(key: &str) -> Result<Self, QueryError> {
        let url = Url::parse(key)?;
        let param = |name: &'static str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .ok_or(QueryError::MissingParameter(name))
        };
        let path = url.path().trim_end_matches('/');
        if path.ends_with("/search") {
            return Self::search(param("q")?);
        }
        if path.ends_with("/reverse") {
            let lat = parse_number(&param("lat")?)?;
            let lon = parse_number(&param("lon")?)?;
            return Self::reverse(lat, lon);
        }
        Err(QueryError::UnsupportedUrl(key.to_owned()))
    }

    /// The canonical key of this query.
    ///
    /// Parsing the key yields the same query again.
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub const fn is_reverse(&self) -> bool {
        matches!(self, Self::Reverse(_))
    }
}

fn parse_number(s: &str) -> Result<f64, QueryError> {
    s.parse().map_err(|_| QueryError::Number(s.to_owned()))
}

impl fmt::Display for GeocodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search(text) => f.write_str(text),
            Self::Reverse(pos) => write!(f, "{pos}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_free_text() {
        assert_eq!(
            GeocodeQuery::parse("Tokyo Tower").unwrap(),
            GeocodeQuery::Search("Tokyo Tower".into())
        );
        assert_eq!(
            GeocodeQuery::parse("  Paris, France ").unwrap(),
            GeocodeQuery::Search("Paris, France".into())
        );
        assert_eq!(
            GeocodeQuery::parse("10115, Berlin").unwrap(),
            GeocodeQuery::Search("10115, Berlin".into())
        );
    }

    #[test]
    fn parse_coordinate_pair() {
        let q = GeocodeQuery::parse("35.0, 135.75").unwrap();
        assert_eq!(q, GeocodeQuery::reverse(35.0, 135.75).unwrap());
        assert!(q.is_reverse());
        assert_eq!(
            GeocodeQuery::parse("95,10").unwrap_err(),
            QueryError::Coordinate(CoordinateError::Latitude(95.0))
        );
    }

    #[test]
    fn parse_empty() {
        assert_eq!(GeocodeQuery::parse("").unwrap_err(), QueryError::Empty);
        assert_eq!(GeocodeQuery::parse(" \t ").unwrap_err(), QueryError::Empty);
        assert_eq!(GeocodeQuery::search("  ").unwrap_err(), QueryError::Empty);
    }

    #[test]
    fn parse_search_url() {
        let q = GeocodeQuery::parse(
            "https://nominatim.openstreetmap.org/search?format=jsonv2&q=Kiyomizu-dera%2C%20Kyoto",
        )
        .unwrap();
        assert_eq!(q, GeocodeQuery::Search("Kiyomizu-dera, Kyoto".into()));
    }

    #[test]
    fn parse_reverse_url() {
        let q = GeocodeQuery::parse(
            "https://nominatim.openstreetmap.org/reverse?format=jsonv2&lat=35.6586&lon=139.7454&accept-language=en",
        )
        .unwrap();
        assert_eq!(q, GeocodeQuery::reverse(35.6586, 139.7454).unwrap());
    }

    #[test]
    fn parse_invalid_urls() {
        assert_eq!(
            GeocodeQuery::parse("https://nominatim.openstreetmap.org/search?format=jsonv2")
                .unwrap_err(),
            QueryError::MissingParameter("q")
        );
        assert_eq!(
            GeocodeQuery::parse("https://nominatim.openstreetmap.org/reverse?lat=1&lon=east")
                .unwrap_err(),
            QueryError::Number("east".into())
        );
        assert!(matches!(
            GeocodeQuery::parse("https://example.com/lookup?q=x").unwrap_err(),
            QueryError::UnsupportedUrl(_)
        ));
        assert!(matches!(
            GeocodeQuery::parse("https://").unwrap_err(),
            QueryError::Url(_)
        ));
    }

    #[test]
    fn canonical_key_round_trip() {
        for q in [
            GeocodeQuery::search("Kyoto").unwrap(),
            GeocodeQuery::reverse(-33.8568, 151.2153).unwrap(),
        ] {
            assert_eq!(GeocodeQuery::parse(&q.key()).unwrap(), q);
        }
        assert_eq!(GeocodeQuery::reverse(35.0, 135.5).unwrap().key(), "35,135.5");
    }
}
