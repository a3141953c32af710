use image::GenericImageView;

use crate::{
    core::{camera::CameraPosition, camera::CameraUpdate, config::ControllerConfig},
    events::{EngineEvent, EventRelay, OutboundMessage},
    style::{
        config::{LayerConfig, SourceConfig},
        engine::StyleEngine,
        registry::StyleMutationRegistry,
    },
    Error, Result,
};

/// Drives one map's style: composes the add/remove workflows over the
/// registry and the engine, and relays engine callbacks to the host.
///
/// Every method runs on the engine's callback thread, one call at a time.
pub struct StyleController<E: StyleEngine> {
    engine: E,
    registry: StyleMutationRegistry,
    relay: EventRelay,
    config: ControllerConfig,
    camera: CameraPosition,
}

impl<E: StyleEngine> StyleController<E> {
    pub fn new(engine: E, relay: EventRelay, config: ControllerConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Controller config is inconsistent: {}", e);
        }
        let camera = config.initial_camera_position;
        Self {
            engine,
            registry: StyleMutationRegistry::new(),
            relay,
            config,
            camera,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn registry(&self) -> &StyleMutationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Last camera position reported by the engine or set through `move_camera`.
    pub fn camera_position(&self) -> &CameraPosition {
        &self.camera
    }

    /// Adds or replaces a source.
    ///
    /// Layers drawing from an existing source with this id are detached first,
    /// since the engine refuses to replace a source that is still in use.
    pub fn add_source(&mut self, source_id: &str, config: SourceConfig) -> Result<()> {
        config.validate()?;

        let dependents = self.registry.layers_for_source(source_id);
        if !dependents.is_empty() {
            log::debug!(
                "detaching {} layers before replacing source {}",
                dependents.len(),
                source_id
            );
        }
        self.registry.remove_layers(&mut self.engine, dependents);
        self.registry
            .remove_source_if_present(&mut self.engine, source_id)?;

        self.engine.add_source(source_id, &config)?;
        self.registry.record_source(source_id, config.kind());
        Ok(())
    }

    /// Removes a source and every recorded layer drawing from it.
    pub fn remove_source(&mut self, source_id: &str) -> Result<()> {
        let dependents = self.registry.layers_for_source(source_id);
        self.registry.remove_layers(&mut self.engine, dependents);
        self.registry
            .remove_source_if_present(&mut self.engine, source_id)?;
        Ok(())
    }

    /// Adds or replaces a layer.
    pub fn add_layer(&mut self, layer_id: &str, config: LayerConfig) -> Result<()> {
        config.validate()?;
        if let Some(source_id) = config.source.as_deref() {
            if let Some(source) = self.registry.source(source_id) {
                if !config.kind.accepts_source(source.kind) {
                    return Err(Error::Layer(format!(
                        "{} layer {} cannot draw from {} source {}",
                        config.kind, layer_id, source.kind, source_id
                    )));
                }
            }
        }

        self.registry
            .remove_layer_if_present(&mut self.engine, layer_id)?;
        self.engine
            .add_layer(layer_id, config.source.as_deref(), &config)?;
        self.registry
            .record_layer(layer_id, config.source.as_deref(), config.kind);
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<()> {
        self.registry
            .remove_layer_if_present(&mut self.engine, layer_id)?;
        Ok(())
    }

    /// Registers a style image. `bytes` must be an encoded bitmap (PNG, JPEG, ...).
    pub fn add_image(&mut self, image_id: &str, bytes: &[u8], sdf: bool) -> Result<()> {
        if bytes.is_empty() {
            return Err(Error::Argument(format!("image {image_id} has no bytes")));
        }
        let (width, height) = image::load_from_memory(bytes)?.dimensions();
        log::debug!(
            "adding image {} ({}x{}, sdf: {})",
            image_id,
            width,
            height,
            sdf
        );

        self.registry
            .remove_image_if_present(&mut self.engine, image_id)?;
        self.engine.add_image(image_id, bytes, sdf)?;
        self.registry
            .record_image(image_id, (width, height), self.config.pixel_ratio, sdf);
        Ok(())
    }

    pub fn remove_image(&mut self, image_id: &str) -> Result<()> {
        self.registry
            .remove_image_if_present(&mut self.engine, image_id)?;
        Ok(())
    }

    /// Asks the engine to load `style`. The registry is reset once the engine
    /// reports the new style as loaded.
    pub fn set_style(&mut self, style: &str) -> Result<()> {
        self.engine.set_style(style)?;
        self.config.style_string = Some(style.to_string());
        Ok(())
    }

    /// Loads the style named in the creation params, if any.
    pub fn load_initial_style(&mut self) -> Result<()> {
        match self.config.style_string.clone() {
            Some(style) => self.set_style(&style),
            None => Ok(()),
        }
    }

    /// Moves the camera through the engine and mirrors the result locally
    /// when it can be computed without projection.
    pub fn move_camera(&mut self, update: CameraUpdate) -> Result<()> {
        self.engine.move_camera(&update)?;
        if let Some(next) = update.apply(&self.camera, self.config.zoom_range()) {
            self.camera = next;
        }
        Ok(())
    }

    /// Must run before anything else touches the registry for the new style.
    pub fn on_style_loaded(&mut self) {
        self.registry.reset_on_style_reload();
        self.relay.send(OutboundMessage::style_loaded());
    }

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::StyleLoaded => self.on_style_loaded(),
            EngineEvent::Click { point, lat_lng } => {
                self.relay.send(OutboundMessage::map_click(point, lat_lng))
            }
            EngineEvent::LongClick { point, lat_lng } => self
                .relay
                .send(OutboundMessage::map_long_click(point, lat_lng)),
            EngineEvent::SourceLoaded { source_id } => {
                if !self.registry.has_source(&source_id) {
                    log::debug!("source {} loaded but is not recorded", source_id);
                }
                self.relay.send(OutboundMessage::source_loaded(&source_id))
            }
            EngineEvent::CameraMove(position) => {
                self.camera = position;
                if self.config.track_camera_position {
                    self.relay.send(OutboundMessage::camera_move(&self.camera));
                }
            }
            EngineEvent::CameraIdle => {
                let position = self
                    .config
                    .track_camera_position
                    .then_some(&self.camera);
                self.relay.send(OutboundMessage::camera_idle(position));
            }
        }
    }
}
