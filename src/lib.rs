//! # maplet-bridge
//!
//! Style bookkeeping between a host application's message bridge and a
//! native map engine.
//!
//! Argument bundles arriving over the bridge are decoded into typed source,
//! layer and camera configuration, applied to the engine through the
//! [`StyleEngine`] facade, and tracked in a [`StyleMutationRegistry`] so that
//! add operations are idempotent and removing a source never strands its
//! layers. Engine callbacks travel back across the bridge through an
//! [`EventRelay`].

pub mod bridge;
pub mod core;
pub mod data;
pub mod events;
pub mod prelude;
pub mod style;

pub use crate::core::{
    camera::{CameraPosition, CameraUpdate},
    config::ControllerConfig,
    geo::{LatLng, LatLngBounds, Point},
};

pub use crate::style::{
    config::{LayerConfig, LayerKind, SourceConfig, SourceKind},
    controller::StyleController,
    engine::{EngineError, StyleEngine},
    headless::HeadlessEngine,
    registry::{ImageRecord, LayerRecord, SourceRecord, StyleMutationRegistry},
};

pub use crate::bridge::MethodCall;
pub use crate::data::args::Args;
pub use crate::events::{EngineEvent, EventRelay, OutboundMessage};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}
