//! Conversion between bridge coordinate lists and `geo_types` geometries,
//! plus GeoJSON rendering for inline geojson sources.

use geo_types::{Coord, Geometry, LineString, Point, Polygon};
use serde_json::{json, Value};

use crate::{
    core::geo::{LatLng, LatLngBounds},
    Error, Result,
};

fn coord(lat_lng: &LatLng) -> Coord<f64> {
    Coord {
        x: lat_lng.lng,
        y: lat_lng.lat,
    }
}

pub fn point(lat_lng: &LatLng) -> Point<f64> {
    Point(coord(lat_lng))
}

pub fn line_string(points: &[LatLng]) -> Result<LineString<f64>> {
    if points.len() < 2 {
        return Err(Error::Argument(format!(
            "a line needs at least 2 points, got {}",
            points.len()
        )));
    }
    Ok(points.iter().map(coord).collect())
}

/// Builds a polygon from an exterior ring followed by holes. Rings are closed
/// when the last point does not repeat the first.
pub fn polygon(rings: &[Vec<LatLng>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        if ring.len() < 3 {
            return Err(Error::Argument(format!(
                "a polygon ring needs at least 3 points, got {}",
                ring.len()
            )));
        }
        Ok(ring.iter().map(coord).collect::<LineString<f64>>())
    });

    let exterior = rings
        .next()
        .ok_or_else(|| Error::Argument("a polygon needs an exterior ring".to_string()))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    // Polygon::new closes open rings.
    Ok(Polygon::new(exterior, interiors))
}

/// Decodes `[[lat, lng], ...]` into a line, or `[[[lat, lng], ...], ...]` into
/// a polygon, or a bare `[lat, lng]` into a point.
pub fn from_wire(value: &Value) -> Result<Geometry<f64>> {
    let list = value
        .as_array()
        .ok_or_else(|| Error::Argument(format!("expected a coordinate list, got {value}")))?;

    match list.first() {
        Some(Value::Number(_)) => Ok(point(&LatLng::from_wire(value)?).into()),
        Some(Value::Array(inner)) if inner.first().map_or(false, Value::is_array) => {
            let rings = list
                .iter()
                .map(|ring| {
                    ring.as_array()
                        .ok_or_else(|| Error::Argument(format!("expected a ring, got {ring}")))?
                        .iter()
                        .map(LatLng::from_wire)
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(polygon(&rings)?.into())
        }
        Some(Value::Array(_)) => {
            let points = list
                .iter()
                .map(LatLng::from_wire)
                .collect::<Result<Vec<_>>>()?;
            Ok(line_string(&points)?.into())
        }
        _ => Err(Error::Argument(format!("unsupported geometry {value}"))),
    }
}

fn positions(line: &LineString<f64>) -> Value {
    Value::Array(line.coords().map(|c| json!([c.x, c.y])).collect())
}

/// Renders a geometry as a GeoJSON geometry object.
pub fn to_geojson(geometry: &Geometry<f64>) -> Result<Value> {
    let value = match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": [p.x(), p.y()] }),
        Geometry::LineString(line) => json!({ "type": "LineString", "coordinates": positions(line) }),
        Geometry::Polygon(polygon) => {
            let rings = std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(positions)
                .collect::<Vec<_>>();
            json!({ "type": "Polygon", "coordinates": rings })
        }
        other => {
            return Err(Error::Argument(format!(
                "cannot encode {other:?} as GeoJSON"
            )))
        }
    };
    Ok(value)
}

/// Wraps a geometry in a GeoJSON `Feature` with the given properties and its
/// `bbox`.
pub fn feature(geometry: &Geometry<f64>, properties: Value) -> Result<Value> {
    let mut feature = json!({
        "type": "Feature",
        "geometry": to_geojson(geometry)?,
        "properties": properties,
    });
    if let Some(bounds) = bounds(geometry) {
        feature["bbox"] = json!(bounds.to_bbox());
    }
    Ok(feature)
}

/// Bounds of a geometry's outer coordinates. Holes lie inside the exterior.
pub fn bounds(geometry: &Geometry<f64>) -> Option<LatLngBounds> {
    let to_lat_lng = |c: &Coord<f64>| LatLng::new(c.y, c.x);
    let points: Vec<LatLng> = match geometry {
        Geometry::Point(p) => vec![to_lat_lng(&p.0)],
        Geometry::LineString(line) => line.coords().map(to_lat_lng).collect(),
        Geometry::Polygon(polygon) => polygon.exterior().coords().map(to_lat_lng).collect(),
        _ => return None,
    };
    bounds_of(&points)
}

/// Smallest bounds containing every point, `None` for an empty slice.
pub fn bounds_of(points: &[LatLng]) -> Option<LatLngBounds> {
    let (first, rest) = points.split_first()?;
    let mut bounds = LatLngBounds::new(*first, *first);
    for point in rest {
        bounds.extend(point);
    }
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_axis_order() {
        let geometry = from_wire(&json!([10.0, 20.0])).unwrap();
        assert_eq!(
            to_geojson(&geometry).unwrap(),
            json!({ "type": "Point", "coordinates": [20.0, 10.0] })
        );
    }

    #[test]
    fn test_line_string() {
        let geometry = from_wire(&json!([[0.0, 0.0], [1.0, 2.0]])).unwrap();
        let geojson = to_geojson(&geometry).unwrap();
        assert_eq!(geojson["type"], "LineString");
        assert_eq!(geojson["coordinates"], json!([[0.0, 0.0], [2.0, 1.0]]));

        assert!(from_wire(&json!([[0.0, 0.0]])).is_err());
    }

    #[test]
    fn test_polygon_closes_ring() {
        let geometry = from_wire(&json!([[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]])).unwrap();
        let geojson = to_geojson(&geometry).unwrap();
        let ring = geojson["coordinates"][0].as_array().unwrap();

        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_feature() {
        let geometry: Geometry<f64> = point(&LatLng::new(1.0, 2.0)).into();
        let value = feature(&geometry, json!({ "name": "pin" })).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["properties"]["name"], "pin");
        assert_eq!(value["bbox"], json!([2.0, 1.0, 2.0, 1.0]));
    }

    #[test]
    fn test_feature_bbox_covers_polygon() {
        let geometry = from_wire(&json!([[[0.0, 0.0], [0.0, 4.0], [3.0, 4.0]]])).unwrap();
        let value = feature(&geometry, json!({})).unwrap();
        assert_eq!(value["bbox"], json!([0.0, 0.0, 4.0, 3.0]));
    }

    #[test]
    fn test_bounds_of() {
        let bounds = bounds_of(&[
            LatLng::new(1.0, 5.0),
            LatLng::new(-2.0, 3.0),
            LatLng::new(0.0, 8.0),
        ])
        .unwrap();
        assert_eq!(bounds, LatLngBounds::from_coords(-2.0, 3.0, 1.0, 8.0));
        assert!(bounds_of(&[]).is_none());
    }
}
