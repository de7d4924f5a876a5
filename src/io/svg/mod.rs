//! SVG render surface: a styled layer plus its legend as a standalone
//! SVG document.

mod writer;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use geo::Coord;

use crate::style::{Legend, StyledLayer};

use writer::{escape, multipolygon_to_path, write_footer, write_header};

const LEGEND_ROW: f64 = 16.0;
const LEGEND_SWATCH: f64 = 12.0;

/// Render a styled layer and its legend to an SVG file at `path`.
pub fn write_layer_svg(
    path: &Path,
    layer: &StyledLayer,
    legend: &Legend,
    width: u32,
    margin: u32,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[to_svg] failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    render(&mut writer, layer, legend, width as f64, margin as f64)?;
    writer.flush()?;
    Ok(())
}

/// Render a styled layer and its legend to an SVG string.
pub fn layer_to_svg_string(
    layer: &StyledLayer,
    legend: &Legend,
    width: u32,
    margin: u32,
) -> Result<String> {
    let mut buffer = Vec::new();
    render(&mut buffer, layer, legend, width as f64, margin as f64)?;
    String::from_utf8(buffer).context("[to_svg] SVG output is not valid UTF-8")
}

fn render(
    writer: &mut impl Write,
    layer: &StyledLayer,
    legend: &Legend,
    width: f64,
    margin: f64,
) -> Result<()> {
    let bounds = layer
        .features()
        .bounds()
        .ok_or_else(|| anyhow!("[to_svg] could not determine bounds; nothing to draw"))?;

    let scale = (width - 2.0 * margin) / bounds.width();
    let height = bounds.height() * scale + 2.0 * margin;

    // lon/lat -> SVG coords (Y down)
    let project = move |coord: &Coord<f64>| -> (f64, f64) {
        let x = margin + (coord.x - bounds.min().x) * scale;
        let y = margin + (bounds.max().y - coord.y) * scale;
        (x, y)
    };

    write_header(writer, width, height, &bounds)?;

    for (feature, style) in layer.features().iter().zip(layer.styles()) {
        let path = multipolygon_to_path(&feature.geometry, &project);
        write!(
            writer,
            r#"<path fill-rule="evenodd" style="fill:{};fill-opacity:{};stroke:{};stroke-width:0.5" d="{}">"#,
            style.fill, style.fill_opacity, style.stroke, path,
        )?;
        if !style.tooltip.is_empty() {
            write!(writer, "<title>{}</title>", escape(&style.tooltip))?;
        }
        writeln!(writer, "</path>")?;
    }

    draw_legend(writer, legend, margin)?;
    write_footer(writer)?;
    Ok(())
}

/// Legend block in the top-left corner: one swatch + text row per
/// distinct label, in first-seen order.
fn draw_legend(writer: &mut impl Write, legend: &Legend, margin: f64) -> Result<()> {
    if legend.is_empty() {
        return Ok(());
    }

    writeln!(writer, r#"<g class="legend">"#)?;
    for (row, entry) in legend.entries().iter().enumerate() {
        let y = margin + row as f64 * LEGEND_ROW;
        writeln!(
            writer,
            r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" style="fill:{fill};stroke:#111827;stroke-width:0.5"/>"#,
            x = margin,
            s = LEGEND_SWATCH,
            fill = entry.color,
        )?;
        writeln!(
            writer,
            r#"<text x="{x}" y="{y}" font-size="11" font-family="sans-serif">{text}</text>"#,
            x = margin + LEGEND_SWATCH + 4.0,
            y = y + LEGEND_SWATCH - 2.0,
            text = escape(&entry.text),
        )?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::color::{LabelColorMap, RandomHex};
    use crate::feature::fixtures::feature_set;
    use crate::query::Label;
    use crate::style::{RenderContext, Synchronizer};

    use super::layer_to_svg_string;

    fn styled(texts: &[&str]) -> RenderContext {
        let sync = Synchronizer::new();
        let mut ctx = RenderContext::new();
        sync.attach(&mut ctx, feature_set(texts.len()));

        let labels: Vec<Label> = texts.iter().map(|&t| Label::text(t)).collect();
        let mut strategy = RandomHex::with_rng(StdRng::seed_from_u64(11));
        let colors = LabelColorMap::resolve(&labels, &mut strategy);
        sync.apply(&mut ctx, &labels, &colors).unwrap();
        ctx
    }

    #[test]
    fn one_path_per_feature_and_one_legend_entry_per_label() {
        let ctx = styled(&["x", "y", "x"]);
        let svg =
            layer_to_svg_string(ctx.layer().unwrap(), ctx.legend(), 800, 10).unwrap();

        assert_eq!(svg.matches("<path ").count(), 3);
        assert_eq!(svg.matches("<rect x=").count(), 2);
        assert!(svg.contains(">x</text>"));
        assert!(svg.contains(">y</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn tooltips_are_escaped_into_titles() {
        let sync = Synchronizer::new();
        let mut ctx = RenderContext::new();
        sync.attach(&mut ctx, feature_set(1));

        let labels = vec![Label::text("a < b")];
        let mut strategy = RandomHex::with_rng(StdRng::seed_from_u64(0));
        let colors = LabelColorMap::resolve(&labels, &mut strategy);
        sync.apply(&mut ctx, &labels, &colors).unwrap();

        let svg =
            layer_to_svg_string(ctx.layer().unwrap(), ctx.legend(), 800, 10).unwrap();
        assert!(svg.contains("<title>a &lt; b</title>"));
    }

    #[test]
    fn neutral_layer_renders_without_legend() {
        let sync = Synchronizer::new();
        let mut ctx = RenderContext::new();
        sync.attach(&mut ctx, feature_set(2));

        let svg =
            layer_to_svg_string(ctx.layer().unwrap(), ctx.legend(), 800, 10).unwrap();
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(!svg.contains("class=\"legend\""));
    }

    #[test]
    fn empty_layer_is_refused() {
        let sync = Synchronizer::new();
        let mut ctx = RenderContext::new();
        sync.attach(&mut ctx, feature_set(0));

        assert!(
            layer_to_svg_string(ctx.layer().unwrap(), ctx.legend(), 800, 10).is_err()
        );
    }
}
