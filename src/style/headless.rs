//! In-memory engine for hosts without a native map and for tests.
//!
//! It enforces the same style rules the native engines do: ids are unique, a
//! layer's source must exist when the layer is added, a source cannot be
//! removed while a layer still draws from it, and removing something that is
//! not there is an error.

use image::GenericImageView;
use serde_json::Value;

use crate::{
    core::camera::CameraUpdate,
    prelude::HashMap,
    style::{
        config::{LayerConfig, SourceConfig},
        engine::{EngineError, StyleEngine},
    },
};

#[derive(Debug, Clone, PartialEq)]
struct EngineLayer {
    id: String,
    source_id: Option<String>,
    style: Value,
}

/// Decoded metadata of a registered style image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleImage {
    pub width: u32,
    pub height: u32,
    pub sdf: bool,
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    /// Bottom-to-top draw order
    layers: Vec<EngineLayer>,
    sources: HashMap<String, Option<SourceConfig>>,
    images: HashMap<String, Option<StyleImage>>,
    camera_updates: Vec<CameraUpdate>,
    style: Option<String>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer behind the bridge's back, as a host style would.
    pub fn seed_layer(&mut self, layer_id: &str, source_id: Option<&str>) {
        self.layers.push(EngineLayer {
            id: layer_id.to_string(),
            source_id: source_id.map(str::to_string),
            style: Value::Null,
        });
    }

    pub fn seed_source(&mut self, source_id: &str) {
        self.sources.insert(source_id.to_string(), None);
    }

    pub fn seed_image(&mut self, image_id: &str) {
        self.images.insert(image_id.to_string(), None);
    }

    /// Drops every source, layer and image, like loading a new style URL.
    pub fn reload_style(&mut self) {
        self.layers.clear();
        self.sources.clear();
        self.images.clear();
    }

    /// Layer ids bottom to top.
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.id.as_str()).collect()
    }

    /// Style JSON the layer was added with; `Null` for seeded layers.
    pub fn layer_style(&self, layer_id: &str) -> Option<&Value> {
        self.layers
            .iter()
            .find(|layer| layer.id == layer_id)
            .map(|layer| &layer.style)
    }

    pub fn source_config(&self, source_id: &str) -> Option<&SourceConfig> {
        self.sources.get(source_id).and_then(Option::as_ref)
    }

    pub fn image(&self, image_id: &str) -> Option<StyleImage> {
        self.images.get(image_id).copied().flatten()
    }

    pub fn camera_updates(&self) -> &[CameraUpdate] {
        &self.camera_updates
    }

    /// Style URL or JSON most recently loaded.
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }
}

impl StyleEngine for HeadlessEngine {
    fn source_exists(&self, source_id: &str) -> bool {
        self.sources.contains_key(source_id)
    }

    fn layer_exists(&self, layer_id: &str) -> bool {
        self.layers.iter().any(|layer| layer.id == layer_id)
    }

    fn image_exists(&self, image_id: &str) -> bool {
        self.images.contains_key(image_id)
    }

    fn remove_source(&mut self, source_id: &str) -> Result<(), EngineError> {
        if let Some(layer) = self
            .layers
            .iter()
            .find(|layer| layer.source_id.as_deref() == Some(source_id))
        {
            return Err(EngineError::new(format!(
                "Source \"{}\" cannot be removed while layer \"{}\" is using it.",
                source_id, layer.id
            )));
        }
        self.sources
            .remove(source_id)
            .map(|_| ())
            .ok_or_else(|| EngineError::new(format!("There is no source with ID \"{source_id}\"")))
    }

    fn remove_layer(&mut self, layer_id: &str) -> Result<(), EngineError> {
        let index = self
            .layers
            .iter()
            .position(|layer| layer.id == layer_id)
            .ok_or_else(|| EngineError::new(format!("There is no layer with ID \"{layer_id}\"")))?;
        self.layers.remove(index);
        Ok(())
    }

    fn remove_image(&mut self, image_id: &str) -> Result<(), EngineError> {
        self.images
            .remove(image_id)
            .map(|_| ())
            .ok_or_else(|| EngineError::new(format!("There is no image with ID \"{image_id}\"")))
    }

    fn add_source(&mut self, source_id: &str, config: &SourceConfig) -> Result<(), EngineError> {
        if self.source_exists(source_id) {
            return Err(EngineError::new(format!(
                "Source \"{source_id}\" already exists."
            )));
        }
        self.sources
            .insert(source_id.to_string(), Some(config.clone()));
        Ok(())
    }

    fn add_layer(
        &mut self,
        layer_id: &str,
        source_id: Option<&str>,
        config: &LayerConfig,
    ) -> Result<(), EngineError> {
        if self.layer_exists(layer_id) {
            return Err(EngineError::new(format!(
                "Layer \"{layer_id}\" already exists on this map."
            )));
        }
        if let Some(source_id) = source_id {
            if !self.source_exists(source_id) {
                return Err(EngineError::new(format!(
                    "Source \"{source_id}\" not found for layer \"{layer_id}\"."
                )));
            }
        }

        let layer = EngineLayer {
            id: layer_id.to_string(),
            source_id: source_id.map(str::to_string),
            style: config.to_style_json(layer_id),
        };
        match &config.below_layer_id {
            Some(below) => {
                let index = self
                    .layers
                    .iter()
                    .position(|layer| &layer.id == below)
                    .ok_or_else(|| {
                        EngineError::new(format!(
                            "Layer \"{below}\" not found, cannot add \"{layer_id}\" below it."
                        ))
                    })?;
                self.layers.insert(index, layer);
            }
            None => self.layers.push(layer),
        }
        Ok(())
    }

    fn add_image(&mut self, image_id: &str, bytes: &[u8], sdf: bool) -> Result<(), EngineError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| EngineError::new(format!("Could not decode image \"{image_id}\": {e}")))?;
        let (width, height) = decoded.dimensions();

        // Re-adding an image id replaces the bitmap.
        self.images.insert(
            image_id.to_string(),
            Some(StyleImage { width, height, sdf }),
        );
        Ok(())
    }

    fn set_style(&mut self, style: &str) -> Result<(), EngineError> {
        if style.trim().is_empty() {
            return Err(EngineError::new("Style string is empty."));
        }
        self.reload_style();
        self.style = Some(style.to_string());
        Ok(())
    }

    fn move_camera(&mut self, update: &CameraUpdate) -> Result<(), EngineError> {
        self.camera_updates.push(update.clone());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::style::config::{LayerKind, TileSourceConfig};
    use std::io::Cursor;

    /// A small PNG for image tests.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    fn raster() -> SourceConfig {
        SourceConfig::Raster(TileSourceConfig {
            tiles: vec!["https://example.com/{z}/{x}/{y}.png".to_string()],
            ..Default::default()
        })
    }

    #[test]
    fn test_layer_needs_existing_source() {
        let mut engine = HeadlessEngine::new();
        let config = LayerConfig::new(LayerKind::Raster, Some("sat"));

        assert!(engine.add_layer("sat", Some("sat"), &config).is_err());

        engine.add_source("sat", &raster()).unwrap();
        engine.add_layer("sat", Some("sat"), &config).unwrap();
        assert!(engine.add_layer("sat", Some("sat"), &config).is_err());
    }

    #[test]
    fn test_source_in_use_cannot_be_removed() {
        let mut engine = HeadlessEngine::new();
        engine.add_source("sat", &raster()).unwrap();
        engine
            .add_layer("sat", Some("sat"), &LayerConfig::new(LayerKind::Raster, Some("sat")))
            .unwrap();

        let err = engine.remove_source("sat").unwrap_err();
        assert!(err.message.contains("is using it"));

        engine.remove_layer("sat").unwrap();
        engine.remove_source("sat").unwrap();
        assert!(engine.remove_source("sat").is_err());
    }

    #[test]
    fn test_below_layer_ordering() {
        let mut engine = HeadlessEngine::new();
        engine.seed_layer("labels", None);

        let mut config = LayerConfig::new(LayerKind::Background, None);
        config.below_layer_id = Some("labels".to_string());
        engine.add_layer("land", None, &config).unwrap();

        assert_eq!(engine.layer_ids(), vec!["land", "labels"]);

        config.below_layer_id = Some("missing".to_string());
        assert!(engine.add_layer("water", None, &config).is_err());
    }

    #[test]
    fn test_add_image_decodes() {
        let mut engine = HeadlessEngine::new();
        engine.add_image("pin", &png_bytes(4, 2), true).unwrap();
        assert_eq!(
            engine.image("pin"),
            Some(StyleImage {
                width: 4,
                height: 2,
                sdf: true
            })
        );

        assert!(engine.add_image("junk", &[1, 2, 3], false).is_err());
        assert!(!engine.image_exists("junk"));
    }

    #[test]
    fn test_reload_style() {
        let mut engine = HeadlessEngine::new();
        engine.seed_source("basemap");
        engine.seed_layer("basemap-fill", Some("basemap"));
        engine.seed_image("pin");

        engine.reload_style();

        assert!(!engine.source_exists("basemap"));
        assert!(!engine.layer_exists("basemap-fill"));
        assert!(!engine.image_exists("pin"));
    }

    #[test]
    fn test_set_style_drops_old_style() {
        let mut engine = HeadlessEngine::new();
        engine.seed_source("basemap");

        engine.set_style("https://example.com/style.json").unwrap();

        assert!(!engine.source_exists("basemap"));
        assert_eq!(engine.style(), Some("https://example.com/style.json"));
        assert!(engine.set_style("  ").is_err());
    }
}
