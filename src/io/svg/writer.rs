//! Low-level SVG emit: header/footer, path strings, escaping.

use std::io::Write;

use anyhow::Result;
use geo::{Coord, LineString, MultiPolygon, Rect};

/// Projection function: lon/lat -> SVG coords (x, y)
pub(crate) type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Write the SVG header, including the XML declaration and opening
/// <svg> tag carrying the geographic bounds as data attributes.
pub(crate) fn write_header(
    writer: &mut impl Write,
    width: f64,
    height: f64,
    bounds: &Rect<f64>,
) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    writeln!(
        writer,
        r##"<svg xmlns="http://www.w3.org/2000/svg"
        width="{width}" height="{height}"
        viewBox="0 0 {width} {height}"
        data-lon-min="{lon_min}" data-lon-max="{lon_max}"
        data-lat-min="{lat_min}" data-lat-max="{lat_max}">"##,
        lon_min = bounds.min().x,
        lon_max = bounds.max().x,
        lat_min = bounds.min().y,
        lat_max = bounds.max().y,
    )?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    Ok(())
}

/// Write the closing </svg> tag.
pub(crate) fn write_footer(writer: &mut impl Write) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
pub(crate) fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), project));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, project));
        }
    }

    out
}

/// Build a compact SVG subpath for a ring: "M x,y L x,y ... Z"
fn ring_to_path(ring: &LineString<f64>, project: &Projection) -> String {
    let mut out = String::new();

    let mut coords = ring.coords().map(|coord| project(coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}

/// Minimal XML text escaping for tooltips and legend labels.
pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use geo::{Coord, LineString, MultiPolygon, Polygon};

    use super::{escape, multipolygon_to_path};

    #[test]
    fn path_string_closes_each_ring() {
        let square = MultiPolygon(vec![Polygon::new(
            LineString(vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 1.0, y: 0.0 },
                Coord { x: 1.0, y: 1.0 },
                Coord { x: 0.0, y: 0.0 },
            ]),
            vec![],
        )]);
        let identity = |coord: &Coord<f64>| (coord.x, coord.y);
        let path = multipolygon_to_path(&square, &identity);

        assert!(path.starts_with(" M0.000,0.000"));
        assert_eq!(path.matches('Z').count(), 1);
        assert_eq!(path.matches('L').count(), 3);
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape("plain"), "plain");
    }
}
