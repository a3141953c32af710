use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;
use serde_json::{json, Value};

use crate::core::{
    camera::CameraPosition,
    geo::{LatLng, Point},
};

/// Callbacks delivered by the native map engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A style finished loading; everything previously added is gone.
    StyleLoaded,
    /// Tap on the map
    Click { point: Point, lat_lng: LatLng },
    /// Long press on the map
    LongClick { point: Point, lat_lng: LatLng },
    /// A source finished loading its data
    SourceLoaded { source_id: String },
    /// The camera moved, possibly mid-gesture
    CameraMove(CameraPosition),
    /// The camera came to rest
    CameraIdle,
}

/// One asynchronous message sent back across the bridge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub method: String,
    pub arguments: Value,
}

impl OutboundMessage {
    pub fn new(method: &str, arguments: Value) -> Self {
        Self {
            method: method.to_string(),
            arguments,
        }
    }

    pub fn style_loaded() -> Self {
        Self::new("map#onStyleLoaded", Value::Null)
    }

    pub fn map_click(point: Point, lat_lng: LatLng) -> Self {
        Self::new("map#onMapClick", Self::pointer_arguments(point, lat_lng))
    }

    pub fn map_long_click(point: Point, lat_lng: LatLng) -> Self {
        Self::new("map#onMapLongClick", Self::pointer_arguments(point, lat_lng))
    }

    pub fn source_loaded(source_id: &str) -> Self {
        Self::new("source#onLoaded", json!({ "sourceId": source_id }))
    }

    pub fn camera_move(position: &CameraPosition) -> Self {
        Self::new("camera#onMove", json!({ "position": position.to_wire() }))
    }

    pub fn camera_idle(position: Option<&CameraPosition>) -> Self {
        Self::new(
            "camera#onIdle",
            json!({ "position": position.map(CameraPosition::to_wire) }),
        )
    }

    fn pointer_arguments(point: Point, lat_lng: LatLng) -> Value {
        json!({
            "x": point.x,
            "y": point.y,
            "lat": lat_lng.lat,
            "lng": lat_lng.lng,
        })
    }
}

/// Sends messages to the host. Delivery is best effort: once the host side
/// has hung up, messages are dropped.
#[derive(Debug, Clone)]
pub struct EventRelay {
    sender: Sender<OutboundMessage>,
}

impl EventRelay {
    /// Creates a relay and the receiving end the bridge drains.
    pub fn channel() -> (Self, Receiver<OutboundMessage>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    pub fn new(sender: Sender<OutboundMessage>) -> Self {
        Self { sender }
    }

    pub fn send(&self, message: OutboundMessage) {
        let method = message.method.clone();
        if self.sender.send(message).is_err() {
            log::debug!("host disconnected, dropping {}", method);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_delivers_in_order() {
        let (relay, receiver) = EventRelay::channel();
        relay.send(OutboundMessage::style_loaded());
        relay.send(OutboundMessage::source_loaded("roads"));

        let methods: Vec<String> = receiver.try_iter().map(|m| m.method).collect();
        assert_eq!(methods, vec!["map#onStyleLoaded", "source#onLoaded"]);
    }

    #[test]
    fn test_relay_survives_disconnect() {
        let (relay, receiver) = EventRelay::channel();
        drop(receiver);
        relay.send(OutboundMessage::style_loaded());
    }

    #[test]
    fn test_click_arguments() {
        let message = OutboundMessage::map_click(Point::new(10.0, 20.0), LatLng::new(1.0, 2.0));
        assert_eq!(message.method, "map#onMapClick");
        assert_eq!(
            message.arguments,
            json!({ "x": 10.0, "y": 20.0, "lat": 1.0, "lng": 2.0 })
        );
    }

    #[test]
    fn test_camera_idle_without_position() {
        let message = OutboundMessage::camera_idle(None);
        assert_eq!(message.arguments, json!({ "position": null }));
    }
}
