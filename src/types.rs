//! Core types: coordinates, addresses, geocoder candidates

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Half the circumference of the earth in web-mercator metres
const MERCATOR_EXTENT: f64 = 20_037_508.342_789_244;

/// Metres per degree of latitude (spherical approximation)
const METERS_PER_DEGREE: f64 = 111_320.0;

/// A projected map-plane coordinate (web mercator, metres)
///
/// This is the unit the map surface, the marker and the submission payload
/// work in. Serialized as `{"x": .., "y": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
}

impl Location {
    /// Create a location from map-plane coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unproject to geographic coordinates
    pub fn to_lon_lat(self) -> LonLat {
        let lon = self.x / MERCATOR_EXTENT * 180.0;
        let lat = (self.y / MERCATOR_EXTENT * PI).exp().atan() * 360.0 / PI - 90.0;
        LonLat { lon, lat }
    }
}

/// A geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    /// Longitude
    pub lon: f64,
    /// Latitude
    pub lat: f64,
}

impl LonLat {
    /// Create a geographic coordinate
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Project into web-mercator map-plane units
    pub fn to_web_mercator(self) -> Location {
        let x = self.lon * MERCATOR_EXTENT / 180.0;
        let y = ((90.0 + self.lat) * PI / 360.0).tan().ln() / (PI / 180.0) * MERCATOR_EXTENT
            / 180.0;
        Location { x, y }
    }

    /// Shift by a distance in metres (negative values move south / west)
    pub fn offset_by_meters(self, north: f64, east: f64) -> Self {
        let lat = self.lat + north / METERS_PER_DEGREE;
        let lon = self.lon + east / (METERS_PER_DEGREE * self.lat.to_radians().cos());
        Self { lon, lat }
    }
}

/// A reverse-geocoded street address
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    /// Street line
    pub street: String,
    /// City or locality
    pub city: String,
    /// State / region
    pub region: String,
    /// Postal code
    pub postal: String,
}

impl Address {
    /// `"<street> <city> <region> <postal>"`, as written into the address box
    pub fn one_line(&self) -> String {
        format!("{} {}", self.street, self.locality())
    }

    /// `"<city> <region> <postal>"`, the second line of the summary
    pub fn locality(&self) -> String {
        format!("{} {} {}", self.city, self.region, self.postal)
    }
}

/// One forward-geocoding match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    /// Matched address text
    pub address: String,
    /// Matched location in map-plane units
    pub location: Location,
    /// Geocoder confidence, when the provider reports one
    #[serde(default)]
    pub score: Option<f64>,
}

/// Base map provider of the hosting instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basemap {
    /// Google Maps (the only provider with a street-view panel)
    Google,
    /// Bing Maps
    Bing,
    /// Esri tiles
    Esri,
    /// Plain tile server
    #[default]
    Tms,
}

impl Basemap {
    /// Whether the provider offers a street-view panel
    pub const fn has_street_view(self) -> bool {
        matches!(self, Self::Google)
    }
}

impl std::str::FromStr for Basemap {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "bing" => Ok(Self::Bing),
            "esri" => Ok(Self::Esri),
            "tms" => Ok(Self::Tms),
            other => Err(crate::error::Error::Parse(format!(
                "unknown basemap type: {other}"
            ))),
        }
    }
}
