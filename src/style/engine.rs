use crate::{
    core::camera::CameraUpdate,
    style::config::{LayerConfig, SourceConfig},
};

/// Failure reported by the native map engine for a rejected mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("engine error: {message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The slice of a native map engine's style API that the bridge drives.
///
/// Every call is synchronous: the engine has finished the existence check or
/// the mutation by the time it returns.
pub trait StyleEngine {
    fn source_exists(&self, source_id: &str) -> bool;

    fn layer_exists(&self, layer_id: &str) -> bool;

    fn image_exists(&self, image_id: &str) -> bool;

    fn remove_source(&mut self, source_id: &str) -> Result<(), EngineError>;

    fn remove_layer(&mut self, layer_id: &str) -> Result<(), EngineError>;

    fn remove_image(&mut self, image_id: &str) -> Result<(), EngineError>;

    /// The source kind travels inside `config`.
    fn add_source(&mut self, source_id: &str, config: &SourceConfig) -> Result<(), EngineError>;

    /// `source_id` is `None` for source-less kinds such as background.
    fn add_layer(
        &mut self,
        layer_id: &str,
        source_id: Option<&str>,
        config: &LayerConfig,
    ) -> Result<(), EngineError>;

    fn add_image(&mut self, image_id: &str, bytes: &[u8], sdf: bool) -> Result<(), EngineError>;

    /// Starts loading a new style from a URL or inline style JSON. The engine
    /// reports completion through a style-loaded event.
    fn set_style(&mut self, style: &str) -> Result<(), EngineError> {
        Err(EngineError::new(format!(
            "loading style {style} is not supported by this engine"
        )))
    }

    /// Moves the camera. Engines without a camera report an error.
    fn move_camera(&mut self, update: &CameraUpdate) -> Result<(), EngineError> {
        Err(EngineError::new(format!(
            "camera update {update:?} is not supported by this engine"
        )))
    }
}
