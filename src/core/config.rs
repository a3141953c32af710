//! Controller configuration decoded from the host's creation parameters.
//!
//! Unknown keys are ignored so hosts can send options meant for the platform
//! view without tripping the decoder.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    core::{
        camera::{CameraPosition, DEFAULT_ZOOM_RANGE},
        constants::{MAX_ZOOM, MIN_ZOOM},
    },
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Style URL or inline style JSON the map starts with.
    pub style_string: Option<String>,
    /// Relay `camera#onMove` for every camera change, not just idle.
    pub track_camera_position: bool,
    /// `[min, max]`, either side may be null.
    pub min_max_zoom_preference: [Option<f64>; 2],
    /// Device pixel ratio used for style images.
    pub pixel_ratio: f64,
    #[serde(skip)]
    pub initial_camera_position: CameraPosition,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            style_string: None,
            track_camera_position: false,
            min_max_zoom_preference: [None, None],
            pixel_ratio: 1.0,
            initial_camera_position: CameraPosition::default(),
        }
    }
}

impl ControllerConfig {
    /// Decodes creation params; `null` yields the defaults.
    pub fn from_creation_params(params: &Value) -> Result<Self> {
        if params.is_null() {
            return Ok(Self::default());
        }

        let mut config: Self = serde_json::from_value(params.clone())?;
        if let Some(camera) = params.get("initialCameraPosition").filter(|v| !v.is_null()) {
            config.initial_camera_position = CameraPosition::from_wire(camera)?;
        }

        config.validate()?;
        config.initial_camera_position = config
            .initial_camera_position
            .normalized(config.zoom_range());
        Ok(config)
    }

    /// Rejects an inverted zoom preference and a non-positive pixel ratio.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.preferred_zoom();
        if min > max {
            return Err(Error::Argument(format!(
                "minMaxZoomPreference has min {min} above max {max}"
            )));
        }
        if self.pixel_ratio.is_nan() || self.pixel_ratio <= 0.0 {
            return Err(Error::Argument(format!(
                "pixelRatio must be positive, got {}",
                self.pixel_ratio
            )));
        }
        Ok(())
    }

    fn preferred_zoom(&self) -> (f64, f64) {
        let [min, max] = self.min_max_zoom_preference;
        (
            min.unwrap_or(DEFAULT_ZOOM_RANGE.0).max(MIN_ZOOM),
            max.unwrap_or(DEFAULT_ZOOM_RANGE.1).min(MAX_ZOOM),
        )
    }

    /// Effective `(min, max)` zoom, filling gaps with the engine limits.
    ///
    /// Always ordered: a preference with min above max collapses to max.
    pub fn zoom_range(&self) -> (f64, f64) {
        let (min, max) = self.preferred_zoom();
        (min.min(max), max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::from_creation_params(&Value::Null).unwrap();
        assert_eq!(config, ControllerConfig::default());
        assert_eq!(config.zoom_range(), (MIN_ZOOM, MAX_ZOOM));
    }

    #[test]
    fn test_creation_params() {
        let config = ControllerConfig::from_creation_params(&json!({
            "styleString": "https://demotiles.maplibre.org/style.json",
            "trackCameraPosition": true,
            "minMaxZoomPreference": [2.0, null],
            "initialCameraPosition": { "target": [10.0, 20.0], "zoom": 1.0 },
            "compassEnabled": false,
        }))
        .unwrap();

        assert!(config.track_camera_position);
        assert_eq!(config.zoom_range(), (2.0, MAX_ZOOM));
        assert_eq!(config.initial_camera_position.target, LatLng::new(10.0, 20.0));
        // Clamped into the preferred range.
        assert_eq!(config.initial_camera_position.zoom, 2.0);
    }

    #[test]
    fn test_rejects_inverted_zoom() {
        let result = ControllerConfig::from_creation_params(&json!({
            "minMaxZoomPreference": [10.0, 5.0],
        }));
        assert!(matches!(result, Err(Error::Argument(_))));
    }

    #[test]
    fn test_zoom_range_is_ordered_for_unchecked_config() {
        let config = ControllerConfig {
            min_max_zoom_preference: [Some(30.0), None],
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.zoom_range(), (MAX_ZOOM, MAX_ZOOM));
    }

    #[test]
    fn test_rejects_bad_pixel_ratio() {
        for ratio in [0.0, -2.0, f64::NAN] {
            let config = ControllerConfig {
                pixel_ratio: ratio,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{ratio}");
        }
    }
}
