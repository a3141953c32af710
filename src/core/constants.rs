//! Engine-wide defaults shared by camera and source decoding.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Lowest zoom level any native engine accepts.
pub const MIN_ZOOM: f64 = 0.0;

/// Highest camera zoom level.
pub const MAX_ZOOM: f64 = 22.0;

/// Highest tile zoom a source may declare.
pub const MAX_SOURCE_ZOOM: f64 = 24.0;

/// Maximum camera pitch in degrees.
pub const MAX_TILT: f64 = 60.0;

/// Programmatic +/- zoom step for `zoomIn` / `zoomOut`.
pub const DEFAULT_ZOOM_DELTA: f64 = 1.0;
