//! Geographic coordinates and their canonical text form.
//!
//! A [`Coordinate`] renders as `"<latitude>,<longitude>"` with exactly six
//! digits after the decimal point. This canonical string is used in request
//! URLs, in ranked results, and as the serialized form.
//!
//! No geographic range validation is performed: values outside
//! [-90, 90] / [-180, 180] are passed through as given.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A point in the geographic coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in decimal degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Errors returned when parsing a [`Coordinate`] from text.
///
/// Messages never include the rejected input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("invalid coordinate, expected comma-separated tuple")]
    InvalidFormat,

    #[error("malformed latitude, expected floating number")]
    InvalidLatitude,

    #[error("malformed longitude, expected floating number")]
    InvalidLongitude,
}

impl fmt::Display for Coordinate {
    /// Format as the canonical `"lat,lon"` string.
    ///
    /// ```
    /// use fastroutes::Coordinate;
    ///
    /// assert_eq!(Coordinate::new(13.38886, 52.517037).to_string(), "13.388860,52.517037");
    /// assert_eq!(Coordinate::new(-1.0, 0.5).to_string(), "-1.000000,0.500000");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    /// Parse a `"lat,lon"` tuple such as `13.388860,52.517037`.
    ///
    /// ```
    /// use fastroutes::Coordinate;
    ///
    /// let c: Coordinate = "13.388860,52.517037".parse().unwrap();
    /// assert_eq!(c, Coordinate::new(13.388860, 52.517037));
    /// assert!("75.32".parse::<Coordinate>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoordinateError::InvalidFormat);
        };

        let latitude = parse_component(lat).ok_or(CoordinateError::InvalidLatitude)?;
        let longitude = parse_component(lon).ok_or(CoordinateError::InvalidLongitude)?;

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Parse one component, rejecting NaN and infinities.
fn parse_component(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
