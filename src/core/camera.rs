use serde_json::{json, Value};

use crate::{
    core::{
        constants::{DEFAULT_ZOOM_DELTA, MAX_TILT, MAX_ZOOM, MIN_ZOOM},
        geo::{LatLng, LatLngBounds},
    },
    data::args::Args,
    Error, Result,
};

/// Where the camera looks and from which angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPosition {
    pub target: LatLng,
    pub zoom: f64,
    /// Degrees clockwise from north, in `[0, 360)`.
    pub bearing: f64,
    /// Pitch in degrees, `0` looks straight down.
    pub tilt: f64,
}

impl CameraPosition {
    pub fn new(target: LatLng, zoom: f64) -> Self {
        Self {
            target,
            zoom,
            bearing: 0.0,
            tilt: 0.0,
        }
    }

    /// Decodes `{"target": [lat, lng], "zoom": .., "bearing": .., "tilt": ..}`.
    pub fn from_wire(value: &Value) -> Result<Self> {
        let args = Args::new(value)?;
        Ok(Self {
            target: args.lat_lng("target")?,
            zoom: args.f64_or("zoom", MIN_ZOOM)?,
            bearing: args.f64_or("bearing", 0.0)?,
            tilt: args.f64_or("tilt", 0.0)?,
        })
    }

    pub fn to_wire(&self) -> Value {
        json!({
            "target": self.target.to_wire(),
            "zoom": self.zoom,
            "bearing": self.bearing,
            "tilt": self.tilt,
        })
    }

    /// Brings every component into the range the engines accept.
    ///
    /// An inverted `zoom_range` pins the zoom to its upper end.
    pub fn normalized(mut self, zoom_range: (f64, f64)) -> Self {
        self.zoom = self.zoom.max(zoom_range.0).min(zoom_range.1);
        self.tilt = self.tilt.clamp(0.0, MAX_TILT);
        self.bearing = self.bearing.rem_euclid(360.0);
        self.target = LatLng::new(
            LatLng::clamp_lat(self.target.lat),
            LatLng::wrap_lng(self.target.lng),
        );
        self
    }
}

impl Default for CameraPosition {
    fn default() -> Self {
        Self::new(LatLng::default(), MIN_ZOOM)
    }
}

/// A requested camera move, as sent by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraUpdate {
    NewCameraPosition(CameraPosition),
    NewLatLng(LatLng),
    NewLatLngBounds { bounds: LatLngBounds, padding: f64 },
    NewLatLngZoom(LatLng, f64),
    ZoomBy(f64),
    ZoomIn,
    ZoomOut,
    ZoomTo(f64),
    BearingTo(f64),
    TiltTo(f64),
}

impl CameraUpdate {
    /// Decodes the list form `["newLatLngZoom", [lat, lng], zoom]` etc.
    pub fn from_wire(value: &Value) -> Result<Self> {
        let list = value
            .as_array()
            .filter(|list| !list.is_empty())
            .ok_or_else(|| Error::Argument(format!("expected a camera update list, got {value}")))?;

        let tag = list[0]
            .as_str()
            .ok_or_else(|| Error::Argument(format!("camera update tag must be a string, got {}", list[0])))?;

        let arg = |index: usize| {
            list.get(index).ok_or_else(|| {
                Error::Argument(format!("`{tag}` is missing argument {index}"))
            })
        };
        let number = |index: usize| {
            let value = arg(index)?;
            value
                .as_f64()
                .ok_or_else(|| Error::Argument(format!("`{tag}` expects a number, got {value}")))
        };

        let update = match tag {
            "newCameraPosition" => Self::NewCameraPosition(CameraPosition::from_wire(arg(1)?)?),
            "newLatLng" => Self::NewLatLng(LatLng::from_wire(arg(1)?)?),
            "newLatLngBounds" => Self::NewLatLngBounds {
                bounds: LatLngBounds::from_wire(arg(1)?)?,
                padding: if list.len() > 2 { number(2)? } else { 0.0 },
            },
            "newLatLngZoom" => Self::NewLatLngZoom(LatLng::from_wire(arg(1)?)?, number(2)?),
            "zoomBy" => Self::ZoomBy(number(1)?),
            "zoomIn" => Self::ZoomIn,
            "zoomOut" => Self::ZoomOut,
            "zoomTo" => Self::ZoomTo(number(1)?),
            "bearingTo" => Self::BearingTo(number(1)?),
            "tiltTo" => Self::TiltTo(number(1)?),
            other => {
                return Err(Error::Argument(format!("unknown camera update `{other}`")));
            }
        };
        Ok(update)
    }

    /// Resulting position for updates that need no projection; `None` for
    /// bounds fitting, which only the engine can resolve.
    pub fn apply(&self, current: &CameraPosition, zoom_range: (f64, f64)) -> Option<CameraPosition> {
        let mut next = *current;
        match *self {
            Self::NewCameraPosition(position) => next = position,
            Self::NewLatLng(target) => next.target = target,
            Self::NewLatLngBounds { .. } => return None,
            Self::NewLatLngZoom(target, zoom) => {
                next.target = target;
                next.zoom = zoom;
            }
            Self::ZoomBy(amount) => next.zoom += amount,
            Self::ZoomIn => next.zoom += DEFAULT_ZOOM_DELTA,
            Self::ZoomOut => next.zoom -= DEFAULT_ZOOM_DELTA,
            Self::ZoomTo(zoom) => next.zoom = zoom,
            Self::BearingTo(bearing) => next.bearing = bearing,
            Self::TiltTo(tilt) => next.tilt = tilt,
        }
        Some(next.normalized(zoom_range))
    }
}

/// The full zoom range the engines support.
pub const DEFAULT_ZOOM_RANGE: (f64, f64) = (MIN_ZOOM, MAX_ZOOM);
