//! Method-call dispatch from the host bridge onto a [`StyleController`].

use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    core::camera::CameraUpdate,
    data::{args::Args, geometry},
    style::{
        config::{GeoJsonSourceConfig, LayerConfig, SourceConfig},
        controller::StyleController,
        engine::StyleEngine,
    },
    Error, Result,
};

/// One inbound call: a method name and its argument bundle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: &str, arguments: Value) -> Self {
        Self {
            method: method.to_string(),
            arguments,
        }
    }
}

impl<E: StyleEngine> StyleController<E> {
    /// Runs `call` and returns the reply sent back to the host.
    pub fn handle_method_call(&mut self, call: &MethodCall) -> Result<Value> {
        log::debug!("method call {}", call.method);

        match call.method.as_str() {
            // Insertion order of the layers this bridge added, not draw order.
            "style#getLayerIds" => return Ok(json!(self.registry().layer_ids())),
            "style#getSourceIds" => return Ok(json!(self.registry().source_ids())),
            "style#getImageIds" => return Ok(json!(self.registry().image_ids())),
            "camera#getPosition" => return Ok(self.camera_position().to_wire()),
            _ => {}
        }

        let args = Args::new(&call.arguments)?;
        match call.method.as_str() {
            "map#setStyle" => self.set_style(args.str("style")?)?,
            "style#addSource" => {
                let config = SourceConfig::from_wire(args.value("source")?)?;
                self.add_source(args.str("sourceId")?, config)?;
            }
            "style#addGeometrySource" => {
                let shape = geometry::from_wire(args.value("geometry")?)?;
                let properties = args.get("properties").cloned().unwrap_or_else(|| json!({}));
                let config = SourceConfig::GeoJson(GeoJsonSourceConfig::inline(
                    geometry::feature(&shape, properties)?,
                ));
                self.add_source(args.str("sourceId")?, config)?;
            }
            "style#removeSource" => self.remove_source(args.str("sourceId")?)?,
            "style#addLayer" => {
                let config = LayerConfig::from_wire(args.value("layer")?)?;
                self.add_layer(args.str("layerId")?, config)?;
            }
            "style#removeLayer" => self.remove_layer(args.str("layerId")?)?,
            "style#addImage" => {
                let bytes = args.bytes("bytes")?;
                self.add_image(args.str("imageId")?, &bytes, args.bool_or("sdf", false)?)?;
            }
            "style#removeImage" => self.remove_image(args.str("imageId")?)?,
            "camera#move" => {
                let update =
                    CameraUpdate::from_wire(args.value("cameraUpdate")?)?;
                self.move_camera(update)?;
                return Ok(self.camera_position().to_wire());
            }
            other => return Err(Error::UnknownMethod(other.to_string())),
        }
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::config::ControllerConfig, events::EventRelay, style::config::GeoJsonData,
        style::headless::HeadlessEngine,
    };

    fn controller() -> StyleController<HeadlessEngine> {
        let (relay, _receiver) = EventRelay::channel();
        StyleController::new(HeadlessEngine::new(), relay, ControllerConfig::default())
    }

    fn call(controller: &mut StyleController<HeadlessEngine>, method: &str, args: Value) -> Result<Value> {
        controller.handle_method_call(&MethodCall::new(method, args))
    }

    #[test]
    fn test_source_and_layer_calls() {
        let mut controller = controller();
        call(
            &mut controller,
            "style#addSource",
            json!({ "sourceId": "roads", "source": { "type": "vector", "url": "u" } }),
        )
        .unwrap();
        call(
            &mut controller,
            "style#addLayer",
            json!({
                "layerId": "roads-line",
                "layer": { "type": "line", "source": "roads", "paint": { "line-width": 2 } },
            }),
        )
        .unwrap();

        assert_eq!(
            call(&mut controller, "style#getLayerIds", Value::Null).unwrap(),
            json!(["roads-line"])
        );

        call(&mut controller, "style#removeSource", json!({ "sourceId": "roads" })).unwrap();
        assert_eq!(
            call(&mut controller, "style#getSourceIds", Value::Null).unwrap(),
            json!([])
        );
        assert_eq!(
            call(&mut controller, "style#getLayerIds", Value::Null).unwrap(),
            json!([])
        );
    }

    #[test]
    fn test_geometry_source() {
        let mut controller = controller();
        call(
            &mut controller,
            "style#addGeometrySource",
            json!({
                "sourceId": "route",
                "geometry": [[0.0, 0.0], [1.0, 1.0]],
                "properties": { "name": "walk" },
            }),
        )
        .unwrap();

        let Some(SourceConfig::GeoJson(source)) = controller.engine().source_config("route") else {
            panic!("route should be a geojson source");
        };
        let GeoJsonData::Inline(feature) = &source.data else {
            panic!("route should be inline");
        };
        assert_eq!(feature["geometry"]["type"], "LineString");
        assert_eq!(feature["properties"]["name"], "walk");
        assert_eq!(feature["bbox"], json!([0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_unknown_property_leaves_state_untouched() {
        let mut controller = controller();
        call(
            &mut controller,
            "style#addSource",
            json!({ "sourceId": "roads", "source": { "type": "vector", "url": "u" } }),
        )
        .unwrap();

        let result = call(
            &mut controller,
            "style#addLayer",
            json!({
                "layerId": "roads-line",
                "layer": { "type": "line", "source": "roads", "paint": { "line-glow": 1 } },
            }),
        );

        assert!(matches!(result, Err(Error::Argument(_))));
        assert!(controller.registry().layer_ids().is_empty());
        assert!(controller.engine().layer_ids().is_empty());
    }

    #[test]
    fn test_camera_move_returns_position() {
        let mut controller = controller();
        let reply = call(
            &mut controller,
            "camera#move",
            json!({ "cameraUpdate": ["newLatLngZoom", [1.0, 2.0], 3.0] }),
        )
        .unwrap();

        assert_eq!(reply["target"], json!([1.0, 2.0]));
        assert_eq!(reply["zoom"], 3.0);
    }

    #[test]
    fn test_argument_errors() {
        let mut controller = controller();
        assert!(matches!(
            call(&mut controller, "style#removeLayer", json!({})),
            Err(Error::Argument(_))
        ));
        assert!(matches!(
            call(&mut controller, "style#addImage", json!({ "imageId": "pin", "bytes": "png" })),
            Err(Error::Argument(_))
        ));
        assert!(matches!(
            call(&mut controller, "map#explode", json!({})),
            Err(Error::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_set_style_call() {
        let mut controller = controller();
        call(&mut controller, "map#setStyle", json!({ "style": "https://example.com/style.json" }))
            .unwrap();
        assert_eq!(controller.engine().style(), Some("https://example.com/style.json"));
        assert!(call(&mut controller, "map#setStyle", json!({})).is_err());
    }

    #[test]
    fn test_layer_ids_follow_insertion_not_draw_order() {
        let mut controller = controller();
        call(
            &mut controller,
            "style#addLayer",
            json!({ "layerId": "top", "layer": { "type": "background" } }),
        )
        .unwrap();
        call(
            &mut controller,
            "style#addLayer",
            json!({ "layerId": "bottom", "layer": { "type": "background", "belowLayerId": "top" } }),
        )
        .unwrap();

        assert_eq!(controller.engine().layer_ids(), vec!["bottom", "top"]);
        assert_eq!(
            call(&mut controller, "style#getLayerIds", Value::Null).unwrap(),
            json!(["top", "bottom"])
        );
    }

    #[test]
    fn test_method_call_deserializes() {
        let call: MethodCall =
            serde_json::from_value(json!({ "method": "style#getLayerIds" })).unwrap();
        assert_eq!(call.arguments, Value::Null);
    }
}
