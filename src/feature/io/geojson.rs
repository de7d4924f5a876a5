//! GeoJSON FeatureCollection decoding.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use crate::{error::LoadError, feature::Feature};

/// Decode a GeoJSON FeatureCollection into an ordered feature sequence.
/// Only `Polygon` and `MultiPolygon` geometries are accepted; the full
/// property bag is preserved per feature.
pub(crate) fn read(bytes: &[u8]) -> Result<Vec<Feature>, LoadError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| LoadError::Malformed(format!("invalid GeoJSON: {err}")))?;

    let features = value["features"]
        .as_array()
        .ok_or_else(|| LoadError::Malformed("GeoJSON has no features array".into()))?;

    features.iter().map(parse_feature).collect()
}

fn parse_feature(feature: &Value) -> Result<Feature, LoadError> {
    let geometry = feature["geometry"]
        .as_object()
        .ok_or_else(|| LoadError::Malformed("feature has no geometry object".into()))?;

    let coords = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| LoadError::Malformed("geometry has no coordinates".into()))?;

    let geometry = match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => MultiPolygon(vec![parse_polygon(coords)?]),
        Some("MultiPolygon") => parse_multipolygon(coords)?,
        other => {
            return Err(LoadError::Malformed(format!(
                "unsupported geometry type: {other:?}"
            )));
        }
    };

    let properties = feature["properties"].as_object().cloned().unwrap_or_default();

    Ok(Feature { geometry, properties })
}

/// Parse Polygon coordinates: an array of rings, exterior first.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>, LoadError> {
    let mut rings = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| LoadError::Malformed("polygon ring is not an array".into()))
            .and_then(|coords| parse_ring(coords))
    });

    let exterior = rings
        .next()
        .ok_or_else(|| LoadError::Malformed("polygon is missing its exterior ring".into()))??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse MultiPolygon coordinates: an array of polygon coordinate arrays.
fn parse_multipolygon(polygons: &[Value]) -> Result<MultiPolygon<f64>, LoadError> {
    polygons
        .iter()
        .map(|polygon| {
            polygon
                .as_array()
                .ok_or_else(|| LoadError::Malformed("multipolygon member is not an array".into()))
                .and_then(|rings| parse_polygon(rings))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(MultiPolygon)
}

/// Parse a ring from `[[x, y], ...]` coordinates, closing it if needed.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>, LoadError> {
    let mut points = Vec::with_capacity(coords.len());

    for pair in coords {
        let pair = pair
            .as_array()
            .filter(|pair| pair.len() >= 2)
            .ok_or_else(|| LoadError::Malformed("ring coordinate is not an [x, y] pair".into()))?;
        let x = pair[0]
            .as_f64()
            .ok_or_else(|| LoadError::Malformed("coordinate x is not a number".into()))?;
        let y = pair[1]
            .as_f64()
            .ok_or_else(|| LoadError::Malformed("coordinate y is not a number".into()))?;
        points.push(Coord { x, y });
    }

    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}
