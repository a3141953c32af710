use crate::{
    prelude::HashMap,
    style::{
        config::{LayerKind, SourceKind},
        engine::{EngineError, StyleEngine},
    },
};

/// A layer this bridge attached to the active style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRecord {
    pub layer_id: String,
    pub source_id: Option<String>,
    pub kind: LayerKind,
}

/// A source this bridge attached to the active style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub source_id: String,
    pub kind: SourceKind,
}

/// A style image this bridge registered.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub image_id: String,
    /// Bitmap size in physical pixels
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
    pub sdf: bool,
}

impl ImageRecord {
    /// Size in logical pixels, the unit icon sizes are expressed in.
    pub fn logical_size(&self) -> (f64, f64) {
        (
            f64::from(self.width) / self.pixel_ratio,
            f64::from(self.height) / self.pixel_ratio,
        )
    }
}

/// Tracks which layers, sources and images are attached to the active style.
///
/// The registry is a passive store: it never adds anything to the engine and
/// never cascades on its own. Callers compose the add workflows, removing
/// dependent layers before replacing or removing a source.
#[derive(Debug, Default)]
pub struct StyleMutationRegistry {
    /// All layer records indexed by ID
    layers: HashMap<String, LayerRecord>,
    /// Layer IDs in the order they were recorded
    layer_order: Vec<String>,
    sources: HashMap<String, SourceRecord>,
    images: HashMap<String, ImageRecord>,
}

impl StyleMutationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every layer recorded against `source_id`, in insertion order.
    pub fn layers_for_source(&self, source_id: &str) -> Vec<String> {
        self.layer_order
            .iter()
            .filter(|id| {
                self.layers
                    .get(*id)
                    .map(|record| record.source_id.as_deref() == Some(source_id))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Removes a layer from the registry and the engine if either knows it.
    ///
    /// Layers the engine has but the registry does not (seeded by the
    /// embedding application) are removed from the engine only. An absent
    /// layer is a no-op, so calling this twice always succeeds the second time.
    pub fn remove_layer_if_present(
        &mut self,
        engine: &mut dyn StyleEngine,
        layer_id: &str,
    ) -> Result<(), EngineError> {
        if self.forget_layer(layer_id).is_some() {
            log::debug!("removing recorded layer {}", layer_id);
            return engine.remove_layer(layer_id);
        }
        if engine.layer_exists(layer_id) {
            log::debug!("removing unrecorded layer {}", layer_id);
            return engine.remove_layer(layer_id);
        }
        Ok(())
    }

    /// Removes a source from the registry and the engine if either knows it.
    ///
    /// Does not touch layers: callers remove `layers_for_source` first.
    pub fn remove_source_if_present(
        &mut self,
        engine: &mut dyn StyleEngine,
        source_id: &str,
    ) -> Result<(), EngineError> {
        let dependents = self.layers_for_source(source_id);
        if !dependents.is_empty() {
            log::warn!(
                "source {} removed while layers {:?} still reference it",
                source_id,
                dependents
            );
        }

        if self.sources.remove(source_id).is_some() {
            log::debug!("removing recorded source {}", source_id);
            return engine.remove_source(source_id);
        }
        if engine.source_exists(source_id) {
            log::debug!("removing unrecorded source {}", source_id);
            return engine.remove_source(source_id);
        }
        Ok(())
    }

    /// Removes a style image from the registry and the engine if either knows it.
    pub fn remove_image_if_present(
        &mut self,
        engine: &mut dyn StyleEngine,
        image_id: &str,
    ) -> Result<(), EngineError> {
        if self.images.remove(image_id).is_some() {
            log::debug!("removing recorded image {}", image_id);
            return engine.remove_image(image_id);
        }
        if engine.image_exists(image_id) {
            log::debug!("removing unrecorded image {}", image_id);
            return engine.remove_image(image_id);
        }
        Ok(())
    }

    /// Best-effort removal of every id in `layer_ids`.
    ///
    /// Engine failures are logged and skipped so that a partial cleanup never
    /// blocks the add that usually follows.
    pub fn remove_layers<I, S>(&mut self, engine: &mut dyn StyleEngine, layer_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for layer_id in layer_ids {
            let layer_id = layer_id.as_ref();
            self.forget_layer(layer_id);
            if !engine.layer_exists(layer_id) {
                continue;
            }
            if let Err(e) = engine.remove_layer(layer_id) {
                log::warn!("Failed to remove layer {}: {}", layer_id, e);
            }
        }
    }

    /// Records a layer the engine just accepted, replacing any earlier record
    /// with the same id. A replaced layer moves to the end of insertion order.
    pub fn record_layer(&mut self, layer_id: &str, source_id: Option<&str>, kind: LayerKind) {
        self.forget_layer(layer_id);
        self.layers.insert(
            layer_id.to_string(),
            LayerRecord {
                layer_id: layer_id.to_string(),
                source_id: source_id.map(str::to_string),
                kind,
            },
        );
        self.layer_order.push(layer_id.to_string());
    }

    /// Records a source the engine just accepted.
    pub fn record_source(&mut self, source_id: &str, kind: SourceKind) {
        self.sources.insert(
            source_id.to_string(),
            SourceRecord {
                source_id: source_id.to_string(),
                kind,
            },
        );
    }

    /// Records a style image the engine just accepted.
    pub fn record_image(&mut self, image_id: &str, size: (u32, u32), pixel_ratio: f64, sdf: bool) {
        self.images.insert(
            image_id.to_string(),
            ImageRecord {
                image_id: image_id.to_string(),
                width: size.0,
                height: size.1,
                pixel_ratio,
                sdf,
            },
        );
    }

    /// Forgets everything. The engine has already dropped the old style.
    pub fn reset_on_style_reload(&mut self) {
        log::info!(
            "style reloaded, dropping {} layers, {} sources, {} images",
            self.layers.len(),
            self.sources.len(),
            self.images.len()
        );
        self.layers.clear();
        self.layer_order.clear();
        self.sources.clear();
        self.images.clear();
    }

    fn forget_layer(&mut self, layer_id: &str) -> Option<LayerRecord> {
        let record = self.layers.remove(layer_id)?;
        self.layer_order.retain(|id| id != layer_id);
        Some(record)
    }

    pub fn layer(&self, layer_id: &str) -> Option<&LayerRecord> {
        self.layers.get(layer_id)
    }

    pub fn source(&self, source_id: &str) -> Option<&SourceRecord> {
        self.sources.get(source_id)
    }

    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    pub fn has_source(&self, source_id: &str) -> bool {
        self.sources.contains_key(source_id)
    }

    pub fn image(&self, image_id: &str) -> Option<&ImageRecord> {
        self.images.get(image_id)
    }

    pub fn has_image(&self, image_id: &str) -> bool {
        self.images.contains_key(image_id)
    }

    /// Layer ids in insertion order
    pub fn layer_ids(&self) -> Vec<String> {
        self.layer_order.clone()
    }

    /// Source ids, sorted
    pub fn source_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sources.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Image ids, sorted
    pub fn image_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.images.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.sources.is_empty() && self.images.is_empty()
    }
}
