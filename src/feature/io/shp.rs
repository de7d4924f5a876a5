//! Shapefile (.shp + .dbf) decoding.

use std::io::Cursor;

use serde_json::{Map, Number, Value};
use shapefile::{
    Shape, ShapeReader,
    dbase::{self, FieldValue, Record},
};

use crate::{error::LoadError, feature::Feature};

/// Decode a shapefile dataset from its geometry and attribute tables.
/// Shapes and records are zipped positionally, as stored on disk.
pub(crate) fn read(shp_bytes: &[u8], dbf_bytes: &[u8]) -> Result<Vec<Feature>, LoadError> {
    let shapes = ShapeReader::new(Cursor::new(shp_bytes))
        .and_then(|reader| reader.read())
        .map_err(|err| LoadError::Malformed(format!("invalid .shp: {err}")))?;

    let records = dbase::Reader::new(Cursor::new(dbf_bytes))
        .and_then(|mut reader| reader.read())
        .map_err(|err| LoadError::Malformed(format!("invalid .dbf: {err}")))?;

    if shapes.len() != records.len() {
        return Err(LoadError::Malformed(format!(
            "{} shapes but {} attribute records",
            shapes.len(),
            records.len()
        )));
    }

    shapes
        .into_iter()
        .zip(records)
        .map(|(shape, record)| {
            let geometry = match shape {
                Shape::Polygon(polygon) => shp_to_geo(&polygon),
                other => {
                    return Err(LoadError::Malformed(format!(
                        "non-polygon shape in dataset: {}",
                        other.shapetype()
                    )));
                }
            };
            Ok(Feature { geometry, properties: record_properties(record) })
        })
        .collect()
}

/// Flatten a DBF record into the same property-bag shape GeoJSON
/// features carry, so downstream code is format-agnostic.
fn record_properties(record: Record) -> Map<String, Value> {
    record
        .into_iter()
        .map(|(field, value)| (field, field_value_to_json(value)))
        .collect()
}

fn field_value_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(Some(s)) => Value::String(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => number(n),
        FieldValue::Float(Some(f)) => number(f as f64),
        FieldValue::Double(d) => number(d),
        FieldValue::Currency(c) => number(c),
        FieldValue::Integer(i) => Value::Number(i.into()),
        FieldValue::Logical(Some(b)) => Value::Bool(b),
        FieldValue::Date(Some(date)) => Value::String(date.to_string()),
        FieldValue::Memo(s) => Value::String(s),
        _ => Value::Null,
    }
}

fn number(n: f64) -> Value {
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Convert a shapefile polygon to `geo::MultiPolygon<f64>`.
///
/// Shapefiles store rings CW for exteriors and CCW for holes, with each
/// exterior followed by its holes; group them back into polygons.
fn shp_to_geo(p: &shapefile::Polygon) -> geo::MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<geo::Coord<f64>>) {
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0])
        }
    }

    /// Signed area of a coord ring (negative for CW, i.e. an exterior)
    fn signed_area(pts: &[geo::Coord<f64>]) -> f64 {
        let mut area = 0.0;
        for w in pts.windows(2) {
            area += w[0].x * w[1].y - w[1].x * w[0].y;
        }
        area / 2.0
    }

    let mut polygons: Vec<geo::Polygon<f64>> = Vec::new();
    let mut exterior: Option<geo::LineString<f64>> = None;
    let mut holes: Vec<geo::LineString<f64>> = Vec::new();

    for ring in p.rings() {
        let mut coords: Vec<geo::Coord<f64>> = ring
            .points()
            .iter()
            .map(|pt| geo::Coord { x: pt.x, y: pt.y })
            .collect();
        ensure_closed(&mut coords);
        let is_exterior = signed_area(&coords) < 0.0;
        let ring = geo::LineString(coords);

        if is_exterior {
            if let Some(ext) = exterior.take() {
                polygons.push(geo::Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(ring);
        } else {
            holes.push(ring);
        }
    }
    if let Some(ext) = exterior {
        polygons.push(geo::Polygon::new(ext, holes));
    }

    geo::MultiPolygon(polygons)
}
