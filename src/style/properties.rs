//! Paint and layout property tables per layer kind.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{prelude::HashMap, prelude::HashSet, style::config::LayerKind, Error, Result};

/// A paint or layout value: either a literal or a style expression
/// (a list whose first element names the operator).
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Literal(Value),
    Expression(Vec<Value>),
}

impl PropertyValue {
    pub fn from_wire(value: &Value) -> Self {
        match value {
            Value::Array(items) if items.first().map_or(false, Value::is_string) => {
                Self::Expression(items.clone())
            }
            other => Self::Literal(other.clone()),
        }
    }

    pub fn to_wire(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Expression(items) => Value::Array(items.clone()),
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }
}

/// Whether a property belongs in the `layout` or `paint` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyGroup {
    Layout,
    Paint,
}

impl std::fmt::Display for PropertyGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyGroup::Layout => write!(f, "layout"),
            PropertyGroup::Paint => write!(f, "paint"),
        }
    }
}

fn layout_names(kind: LayerKind) -> &'static [&'static str] {
    match kind {
        LayerKind::Fill => &["fill-sort-key"],
        LayerKind::Line => &[
            "line-cap",
            "line-join",
            "line-miter-limit",
            "line-round-limit",
            "line-sort-key",
        ],
        LayerKind::Symbol => &[
            "symbol-placement",
            "symbol-spacing",
            "symbol-avoid-edges",
            "symbol-sort-key",
            "symbol-z-order",
            "icon-allow-overlap",
            "icon-ignore-placement",
            "icon-optional",
            "icon-rotation-alignment",
            "icon-size",
            "icon-text-fit",
            "icon-text-fit-padding",
            "icon-image",
            "icon-rotate",
            "icon-padding",
            "icon-keep-upright",
            "icon-offset",
            "icon-anchor",
            "icon-pitch-alignment",
            "text-pitch-alignment",
            "text-rotation-alignment",
            "text-field",
            "text-font",
            "text-size",
            "text-max-width",
            "text-line-height",
            "text-letter-spacing",
            "text-justify",
            "text-radial-offset",
            "text-variable-anchor",
            "text-anchor",
            "text-max-angle",
            "text-writing-mode",
            "text-rotate",
            "text-padding",
            "text-keep-upright",
            "text-transform",
            "text-offset",
            "text-allow-overlap",
            "text-ignore-placement",
            "text-optional",
        ],
        LayerKind::Circle => &["circle-sort-key"],
        LayerKind::Heatmap
        | LayerKind::FillExtrusion
        | LayerKind::Raster
        | LayerKind::Hillshade
        | LayerKind::Background => &[],
    }
}

fn paint_names(kind: LayerKind) -> &'static [&'static str] {
    match kind {
        LayerKind::Fill => &[
            "fill-antialias",
            "fill-opacity",
            "fill-color",
            "fill-outline-color",
            "fill-translate",
            "fill-translate-anchor",
            "fill-pattern",
        ],
        LayerKind::Line => &[
            "line-opacity",
            "line-color",
            "line-translate",
            "line-translate-anchor",
            "line-width",
            "line-gap-width",
            "line-offset",
            "line-blur",
            "line-dasharray",
            "line-pattern",
            "line-gradient",
        ],
        LayerKind::Symbol => &[
            "icon-opacity",
            "icon-color",
            "icon-halo-color",
            "icon-halo-width",
            "icon-halo-blur",
            "icon-translate",
            "icon-translate-anchor",
            "text-opacity",
            "text-color",
            "text-halo-color",
            "text-halo-width",
            "text-halo-blur",
            "text-translate",
            "text-translate-anchor",
        ],
        LayerKind::Circle => &[
            "circle-radius",
            "circle-color",
            "circle-blur",
            "circle-opacity",
            "circle-translate",
            "circle-translate-anchor",
            "circle-pitch-scale",
            "circle-pitch-alignment",
            "circle-stroke-width",
            "circle-stroke-color",
            "circle-stroke-opacity",
        ],
        LayerKind::Heatmap => &[
            "heatmap-radius",
            "heatmap-weight",
            "heatmap-intensity",
            "heatmap-color",
            "heatmap-opacity",
        ],
        LayerKind::FillExtrusion => &[
            "fill-extrusion-opacity",
            "fill-extrusion-color",
            "fill-extrusion-translate",
            "fill-extrusion-translate-anchor",
            "fill-extrusion-pattern",
            "fill-extrusion-height",
            "fill-extrusion-base",
            "fill-extrusion-vertical-gradient",
        ],
        LayerKind::Raster => &[
            "raster-opacity",
            "raster-hue-rotate",
            "raster-brightness-min",
            "raster-brightness-max",
            "raster-saturation",
            "raster-contrast",
            "raster-resampling",
            "raster-fade-duration",
        ],
        LayerKind::Hillshade => &[
            "hillshade-illumination-direction",
            "hillshade-illumination-anchor",
            "hillshade-exaggeration",
            "hillshade-shadow-color",
            "hillshade-highlight-color",
            "hillshade-accent-color",
        ],
        LayerKind::Background => &["background-color", "background-pattern", "background-opacity"],
    }
}

static PROPERTY_TABLE: Lazy<HashMap<(LayerKind, PropertyGroup), HashSet<&'static str>>> =
    Lazy::new(|| {
        let mut table = HashMap::default();
        for kind in LayerKind::ALL {
            // `visibility` is common to every kind.
            let mut layout: HashSet<&'static str> = layout_names(kind).iter().copied().collect();
            layout.insert("visibility");
            table.insert((kind, PropertyGroup::Layout), layout);
            table.insert(
                (kind, PropertyGroup::Paint),
                paint_names(kind).iter().copied().collect(),
            );
        }
        table
    });

/// True when `name` is a known property of `kind` in `group`.
pub fn is_known(kind: LayerKind, group: PropertyGroup, name: &str) -> bool {
    PROPERTY_TABLE
        .get(&(kind, group))
        .map_or(false, |names| names.contains(name))
}

/// Decodes a `layout` or `paint` block, rejecting names the kind does not have.
pub fn decode_block(
    kind: LayerKind,
    group: PropertyGroup,
    block: Option<&Value>,
) -> Result<Vec<(String, PropertyValue)>> {
    let Some(block) = block.filter(|block| !block.is_null()) else {
        return Ok(Vec::new());
    };
    let map = block
        .as_object()
        .ok_or_else(|| Error::Argument(format!("`{group}` must be a map, got {block}")))?;

    map.iter()
        .map(|(name, value)| {
            if !is_known(kind, group, name) {
                return Err(Error::Argument(format!(
                    "`{name}` is not a {group} property of {kind} layers"
                )));
            }
            Ok((name.clone(), PropertyValue::from_wire(value)))
        })
        .collect()
}
