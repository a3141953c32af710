//! Typed source and layer configuration.
//!
//! Sources deserialize straight from their style JSON through a serde
//! tagged union. Layers are decoded by hand because their paint and layout
//! blocks are checked against the per-kind property tables.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{
    core::{constants::MAX_SOURCE_ZOOM, geo::LatLng},
    data::args::Args,
    style::properties::{decode_block, PropertyGroup, PropertyValue},
    Error, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Vector,
    Raster,
    RasterDem,
    #[serde(rename = "geojson")]
    GeoJson,
    Image,
    Video,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Vector => write!(f, "vector"),
            SourceKind::Raster => write!(f, "raster"),
            SourceKind::RasterDem => write!(f, "raster-dem"),
            SourceKind::GeoJson => write!(f, "geojson"),
            SourceKind::Image => write!(f, "image"),
            SourceKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileScheme {
    Xyz,
    Tms,
}

/// Shared by vector, raster and raster-dem sources.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileSourceConfig {
    /// TileJSON URL. Either this or `tiles` is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    #[serde(rename = "tileSize", default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,
    /// `[west, south, east, north]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f64; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<TileScheme>,
    /// Raster-dem only: `mapbox` or `terrarium`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

/// GeoJSON `data` is either a URL or an inline object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoJsonData {
    Url(String),
    Inline(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoJsonSourceConfig {
    pub data: GeoJsonData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub cluster: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_radius: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_max_zoom: Option<f64>,
    #[serde(default)]
    pub line_metrics: bool,
    #[serde(default)]
    pub generate_id: bool,
}

impl GeoJsonSourceConfig {
    /// A source serving `data` inline with every option at its default.
    pub fn inline(data: Value) -> Self {
        Self {
            data: GeoJsonData::Inline(data),
            maxzoom: None,
            attribution: None,
            buffer: None,
            tolerance: None,
            cluster: false,
            cluster_radius: None,
            cluster_max_zoom: None,
            line_metrics: false,
            generate_id: false,
        }
    }
}

/// Corners in `[lng, lat]` order: top-left, top-right, bottom-right, bottom-left.
pub type Corners = [[f64; 2]; 4];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSourceConfig {
    pub url: String,
    pub coordinates: Corners,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSourceConfig {
    pub urls: Vec<String>,
    pub coordinates: Corners,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SourceConfig {
    Vector(TileSourceConfig),
    Raster(TileSourceConfig),
    RasterDem(TileSourceConfig),
    #[serde(rename = "geojson")]
    GeoJson(GeoJsonSourceConfig),
    Image(ImageSourceConfig),
    Video(VideoSourceConfig),
}

impl SourceConfig {
    /// Decodes and validates a style source object.
    pub fn from_wire(value: &Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value.clone())?;
        config.validate()?;
        Ok(config)
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceConfig::Vector(_) => SourceKind::Vector,
            SourceConfig::Raster(_) => SourceKind::Raster,
            SourceConfig::RasterDem(_) => SourceKind::RasterDem,
            SourceConfig::GeoJson(_) => SourceKind::GeoJson,
            SourceConfig::Image(_) => SourceKind::Image,
            SourceConfig::Video(_) => SourceKind::Video,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            SourceConfig::Vector(tiles)
            | SourceConfig::Raster(tiles)
            | SourceConfig::RasterDem(tiles) => {
                if tiles.url.is_none() && tiles.tiles.is_empty() {
                    return Err(Error::Argument(format!(
                        "{} source needs `url` or `tiles`",
                        self.kind()
                    )));
                }
                validate_zoom_range(tiles.minzoom, tiles.maxzoom)?;
                if tiles.encoding.is_some() && self.kind() != SourceKind::RasterDem {
                    return Err(Error::Argument(
                        "`encoding` only applies to raster-dem sources".to_string(),
                    ));
                }
                if let Some([west, south, east, north]) = tiles.bounds {
                    check_corner(west, south)?;
                    check_corner(east, north)?;
                }
            }
            SourceConfig::GeoJson(geojson) => {
                validate_zoom_range(None, geojson.maxzoom)?;
                if let GeoJsonData::Inline(data) = &geojson.data {
                    if data.get("type").and_then(Value::as_str).is_none() {
                        return Err(Error::Argument(
                            "inline geojson `data` needs a `type`".to_string(),
                        ));
                    }
                }
            }
            SourceConfig::Image(image) => validate_corners(&image.coordinates)?,
            SourceConfig::Video(video) => {
                if video.urls.is_empty() {
                    return Err(Error::Argument("video source needs `urls`".to_string()));
                }
                validate_corners(&video.coordinates)?;
            }
        }
        Ok(())
    }

    pub fn to_wire(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn validate_zoom_range(min: Option<f64>, max: Option<f64>) -> Result<()> {
    let min = min.unwrap_or(0.0);
    let max = max.unwrap_or(MAX_SOURCE_ZOOM);
    if min < 0.0 || max > MAX_SOURCE_ZOOM || min > max {
        return Err(Error::Argument(format!(
            "zoom range {min}..={max} is outside 0..={MAX_SOURCE_ZOOM}"
        )));
    }
    Ok(())
}

fn check_corner(lng: f64, lat: f64) -> Result<()> {
    if !LatLng::new(lat, lng).is_valid() {
        return Err(Error::InvalidCoordinates(format!("{lat}, {lng}")));
    }
    Ok(())
}

fn validate_corners(corners: &Corners) -> Result<()> {
    corners.iter().try_for_each(|[lng, lat]| check_corner(*lng, *lat))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Fill,
    Line,
    Symbol,
    Circle,
    Heatmap,
    FillExtrusion,
    Raster,
    Hillshade,
    Background,
}

impl LayerKind {
    pub const ALL: [LayerKind; 9] = [
        LayerKind::Fill,
        LayerKind::Line,
        LayerKind::Symbol,
        LayerKind::Circle,
        LayerKind::Heatmap,
        LayerKind::FillExtrusion,
        LayerKind::Raster,
        LayerKind::Hillshade,
        LayerKind::Background,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.to_string() == name)
    }

    /// Background layers draw without a source.
    pub fn requires_source(&self) -> bool {
        !matches!(self, LayerKind::Background)
    }

    /// Whether a layer of this kind can draw from a source of `source`.
    pub fn accepts_source(&self, source: SourceKind) -> bool {
        match self {
            LayerKind::Raster => matches!(
                source,
                SourceKind::Raster | SourceKind::Image | SourceKind::Video
            ),
            LayerKind::Hillshade => source == SourceKind::RasterDem,
            LayerKind::Background => false,
            _ => matches!(source, SourceKind::Vector | SourceKind::GeoJson),
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Fill => write!(f, "fill"),
            LayerKind::Line => write!(f, "line"),
            LayerKind::Symbol => write!(f, "symbol"),
            LayerKind::Circle => write!(f, "circle"),
            LayerKind::Heatmap => write!(f, "heatmap"),
            LayerKind::FillExtrusion => write!(f, "fill-extrusion"),
            LayerKind::Raster => write!(f, "raster"),
            LayerKind::Hillshade => write!(f, "hillshade"),
            LayerKind::Background => write!(f, "background"),
        }
    }
}

/// A layer ready to hand to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    pub kind: LayerKind,
    pub source: Option<String>,
    pub source_layer: Option<String>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub filter: Option<Value>,
    pub layout: Vec<(String, PropertyValue)>,
    pub paint: Vec<(String, PropertyValue)>,
    /// Insert beneath this layer instead of on top.
    pub below_layer_id: Option<String>,
}

impl LayerConfig {
    /// A layer with no properties set.
    pub fn new(kind: LayerKind, source: Option<&str>) -> Self {
        Self {
            kind,
            source: source.map(str::to_string),
            source_layer: None,
            min_zoom: None,
            max_zoom: None,
            filter: None,
            layout: Vec::new(),
            paint: Vec::new(),
            below_layer_id: None,
        }
    }

    /// Decodes `{"type", "source", "sourceLayer", "minzoom", "maxzoom",
    /// "filter", "layout", "paint", "belowLayerId"}`.
    pub fn from_wire(value: &Value) -> Result<Self> {
        let args = Args::new(value)?;

        let type_name = args.str("type")?;
        let kind = LayerKind::parse(type_name)
            .ok_or_else(|| Error::Argument(format!("unknown layer type `{type_name}`")))?;

        let filter = args.get("filter").cloned();
        if let Some(filter) = &filter {
            if !filter.is_array() {
                return Err(Error::Argument(format!(
                    "`filter` must be an expression list, got {filter}"
                )));
            }
        }

        let config = Self {
            kind,
            source: args.opt_str("source")?.map(str::to_string),
            source_layer: args.opt_str("sourceLayer")?.map(str::to_string),
            min_zoom: args.opt_f64("minzoom")?,
            max_zoom: args.opt_f64("maxzoom")?,
            filter,
            layout: decode_block(kind, PropertyGroup::Layout, args.get("layout"))?,
            paint: decode_block(kind, PropertyGroup::Paint, args.get("paint"))?,
            below_layer_id: args.opt_str("belowLayerId")?.map(str::to_string),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match (self.kind.requires_source(), &self.source) {
            (true, None) => {
                return Err(Error::Layer(format!("{} layer needs a `source`", self.kind)));
            }
            (false, Some(source)) => {
                return Err(Error::Layer(format!(
                    "{} layer cannot draw from source `{source}`",
                    self.kind
                )));
            }
            _ => {}
        }
        if self.source_layer.is_some() && !self.kind.accepts_source(SourceKind::Vector) {
            return Err(Error::Layer(format!(
                "`sourceLayer` does not apply to {} layers",
                self.kind
            )));
        }
        validate_zoom_range(self.min_zoom, self.max_zoom)
    }

    pub fn property(&self, group: PropertyGroup, name: &str) -> Option<&PropertyValue> {
        let block = match group {
            PropertyGroup::Layout => &self.layout,
            PropertyGroup::Paint => &self.paint,
        };
        block
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Renders the layer as style JSON under `layer_id`.
    pub fn to_style_json(&self, layer_id: &str) -> Value {
        let block = |entries: &[(String, PropertyValue)]| {
            entries
                .iter()
                .map(|(name, value)| (name.clone(), value.to_wire()))
                .collect::<Map<String, Value>>()
        };

        let mut layer = json!({
            "id": layer_id,
            "type": self.kind.to_string(),
            "layout": block(&self.layout),
            "paint": block(&self.paint),
        });
        let fields = [
            ("source", self.source.clone().map(Value::from)),
            ("source-layer", self.source_layer.clone().map(Value::from)),
            ("minzoom", self.min_zoom.map(Value::from)),
            ("maxzoom", self.max_zoom.map(Value::from)),
            ("filter", self.filter.clone()),
        ];
        if let Some(object) = layer.as_object_mut() {
            for (key, value) in fields {
                if let Some(value) = value {
                    object.insert(key.to_string(), value);
                }
            }
        }
        layer
    }
}
