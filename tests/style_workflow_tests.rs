use maplet_bridge::prelude::*;
use serde_json::json;

/// Integration tests for the style mutation workflows as a host drives them
#[cfg(test)]
mod style_workflow_tests {
    use super::*;

    fn roads_source() -> SourceConfig {
        SourceConfig::from_wire(&json!({
            "type": "vector",
            "url": "https://example.com/roads.json",
        }))
        .unwrap()
    }

    fn controller() -> (
        StyleController<HeadlessEngine>,
        crossbeam_channel::Receiver<OutboundMessage>,
    ) {
        let (relay, receiver) = EventRelay::channel();
        let controller = StyleController::new(HeadlessEngine::new(), relay, ControllerConfig::default());
        (controller, receiver)
    }

    #[test]
    fn test_roads_scenario() {
        let mut engine = HeadlessEngine::new();
        let mut registry = StyleMutationRegistry::new();

        engine.add_source("roads", &roads_source()).unwrap();
        registry.record_source("roads", SourceKind::Vector);
        engine
            .add_layer(
                "roads-line",
                Some("roads"),
                &LayerConfig::new(LayerKind::Line, Some("roads")),
            )
            .unwrap();
        registry.record_layer("roads-line", Some("roads"), LayerKind::Line);

        assert_eq!(registry.layers_for_source("roads"), vec!["roads-line"]);

        registry.remove_layers(&mut engine, ["roads-line"]);
        assert!(registry.layer_ids().is_empty());

        registry.remove_source_if_present(&mut engine, "roads").unwrap();
        assert!(!registry.has_source("roads"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ghost_layer_scenario() {
        let mut engine = HeadlessEngine::new();
        let mut registry = StyleMutationRegistry::new();

        registry.remove_layer_if_present(&mut engine, "ghost").unwrap();
        registry.remove_layer_if_present(&mut engine, "ghost").unwrap();

        assert!(registry.is_empty());
        assert!(engine.layer_ids().is_empty());
    }

    #[test]
    fn test_readding_source_with_new_kind() {
        let (mut controller, _rx) = controller();
        controller.add_source("roads", roads_source()).unwrap();
        controller
            .add_layer("roads-line", LayerConfig::new(LayerKind::Line, Some("roads")))
            .unwrap();
        controller
            .add_layer("roads-casing", LayerConfig::new(LayerKind::Line, Some("roads")))
            .unwrap();

        let raster = SourceConfig::from_wire(&json!({
            "type": "raster",
            "tiles": ["https://example.com/{z}/{x}/{y}.png"],
        }))
        .unwrap();
        controller.add_source("roads", raster).unwrap();

        let registry = controller.registry();
        assert_eq!(registry.source_ids(), vec!["roads"]);
        assert_eq!(registry.source("roads").unwrap().kind, SourceKind::Raster);
        assert!(registry.layers_for_source("roads").is_empty());
        assert!(controller.engine().layer_ids().is_empty());
        assert!(controller.engine().source_exists("roads"));
    }

    #[test]
    fn test_every_source_removal_cascades() {
        let (mut controller, _rx) = controller();
        for source in ["a", "b"] {
            controller.add_source(source, roads_source()).unwrap();
            for n in 0..3 {
                controller
                    .add_layer(
                        &format!("{source}-{n}"),
                        LayerConfig::new(LayerKind::Fill, Some(source)),
                    )
                    .unwrap();
            }
        }

        controller.remove_source("a").unwrap();

        let registry = controller.registry();
        assert!(registry.layers_for_source("a").is_empty());
        assert!(!registry.has_source("a"));
        assert_eq!(registry.layers_for_source("b"), vec!["b-0", "b-1", "b-2"]);
        assert_eq!(controller.engine().layer_ids(), vec!["b-0", "b-1", "b-2"]);
    }

    #[test]
    fn test_style_reload_forgets_everything() {
        let (mut controller, rx) = controller();
        controller.add_source("roads", roads_source()).unwrap();
        controller
            .add_layer("roads-line", LayerConfig::new(LayerKind::Line, Some("roads")))
            .unwrap();

        controller.engine_mut().reload_style();
        controller.handle_engine_event(EngineEvent::StyleLoaded);

        let registry = controller.registry();
        assert!(registry.layers_for_source("roads").is_empty());
        assert!(!registry.has_layer("roads-line"));
        assert!(!registry.has_source("roads"));
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_host_seeded_layers_survive_until_removed() {
        let (mut controller, _rx) = controller();
        controller.engine_mut().seed_source("basemap");
        controller.engine_mut().seed_layer("basemap-water", Some("basemap"));

        // Replacing a host source the registry never saw: the engine refuses
        // because an unrecorded layer still uses it.
        let err = controller.add_source("basemap", roads_source()).unwrap_err();
        assert!(matches!(err, MapError::Engine(_)));

        controller.remove_layer("basemap-water").unwrap();
        controller.add_source("basemap", roads_source()).unwrap();
        assert!(controller.registry().has_source("basemap"));
    }

    #[test]
    fn test_method_calls_end_to_end() {
        let (mut controller, _rx) = controller();
        let calls = [
            MethodCall::new(
                "style#addSource",
                json!({ "sourceId": "roads", "source": { "type": "vector", "url": "u" } }),
            ),
            MethodCall::new(
                "style#addLayer",
                json!({
                    "layerId": "roads-line",
                    "layer": {
                        "type": "line",
                        "source": "roads",
                        "sourceLayer": "transportation",
                        "paint": { "line-color": "#888", "line-width": 1.5 },
                    },
                }),
            ),
            MethodCall::new(
                "style#addLayer",
                json!({ "layerId": "land", "layer": { "type": "background", "belowLayerId": "roads-line" } }),
            ),
        ];
        for call in &calls {
            controller.handle_method_call(call).unwrap();
        }

        assert_eq!(controller.engine().layer_ids(), vec!["land", "roads-line"]);
        let style = controller.engine().layer_style("roads-line").unwrap();
        assert_eq!(style["paint"]["line-width"], 1.5);
        assert_eq!(style["source-layer"], "transportation");

        let ids = controller
            .handle_method_call(&MethodCall::new("style#getLayerIds", json!(null)))
            .unwrap();
        assert_eq!(ids, json!(["roads-line", "land"]));
    }
}
