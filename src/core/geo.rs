use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Latitude limit of the Web Mercator square used by the native engines
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        let wrapped = lng % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped < -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// Clamps latitude to valid range
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Decodes the bridge form `[lat, lng]`.
    pub fn from_wire(value: &Value) -> Result<Self> {
        let pair = value
            .as_array()
            .filter(|pair| pair.len() == 2)
            .ok_or_else(|| Error::Argument(format!("expected [lat, lng], got {value}")))?;

        let component = |index: usize| {
            pair[index]
                .as_f64()
                .ok_or_else(|| Error::Argument(format!("non-numeric coordinate in {value}")))
        };

        let lat_lng = Self::new(component(0)?, component(1)?);
        if !lat_lng.is_valid() {
            return Err(Error::InvalidCoordinates(format!(
                "{}, {}",
                lat_lng.lat, lat_lng.lng
            )));
        }
        Ok(lat_lng)
    }

    /// Encodes as the bridge form `[lat, lng]`.
    pub fn to_wire(&self) -> Value {
        serde_json::json!([self.lat, self.lng])
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Decodes the bridge form `[[south, west], [north, east]]`.
    pub fn from_wire(value: &Value) -> Result<Self> {
        match value.as_array().map(Vec::as_slice) {
            Some([south_west, north_east]) => {
                let bounds =
                    Self::new(LatLng::from_wire(south_west)?, LatLng::from_wire(north_east)?);
                if bounds.south_west.lat > bounds.north_east.lat {
                    return Err(Error::InvalidCoordinates(format!(
                        "south {} is north of {}",
                        bounds.south_west.lat, bounds.north_east.lat
                    )));
                }
                Ok(bounds)
            }
            _ => Err(Error::Argument(format!(
                "expected [[south, west], [north, east]], got {value}"
            ))),
        }
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// `[west, south, east, north]`, the order tile sources use for `bounds`.
    pub fn to_bbox(&self) -> [f64; 4] {
        [
            self.south_west.lng,
            self.south_west.lat,
            self.north_east.lng,
            self.north_east.lat,
        ]
    }
}
