//! Prelude module for common maplet-bridge types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maplet_bridge::prelude::*;`

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
    properties::{PropertyGroup, PropertyValue},
    registry::StyleMutationRegistry,
};

pub use crate::bridge::MethodCall;
pub use crate::data::args::Args;
pub use crate::events::{EngineEvent, EventRelay, OutboundMessage};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
