//! Style synchronizer: applies resolved colors to the layer, manages
//! the highlight, and rebuilds the legend.

use serde_json::Value;

use crate::color::LabelColorMap;
use crate::error::StyleError;
use crate::feature::{Feature, FeatureSet};
use crate::query::Label;

use super::layer::{HIGHLIGHT_FILL_OPACITY, LayerState, StyledLayer};
use super::legend::Legend;

/// Monotonic token identifying one generation of an asynchronous
/// operation. A response whose token is no longer current is stale and
/// must be discarded, never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Allocation-free substitute for request cancellation: advancing the
/// counter invalidates every outstanding token.
#[derive(Debug, Default)]
pub struct GenerationCounter(u64);

impl GenerationCounter {
    /// Invalidate outstanding tokens and return the new current one.
    pub fn advance(&mut self) -> Generation {
        self.0 += 1;
        Generation(self.0)
    }

    #[inline]
    pub fn is_current(&self, token: Generation) -> bool {
        token.0 == self.0
    }
}

/// Explicit render state threaded through every styling operation: the
/// attached layer, its legend, and the staleness tokens. Nothing here
/// is ambient; operations that mutate rendering take `&mut` to it.
#[derive(Debug, Default)]
pub struct RenderContext {
    layer: Option<StyledLayer>,
    legend: Legend,
    loads: GenerationCounter,
    fetches: GenerationCounter,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn layer(&self) -> Option<&StyledLayer> {
        self.layer.as_ref()
    }

    #[inline]
    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Detach the current layer before a new load begins, so two layers
    /// never render at once, and invalidate all outstanding responses.
    /// Returns the token for the upcoming load.
    pub fn detach(&mut self) -> Generation {
        self.layer = None;
        self.legend.clear();
        self.fetches.advance();
        self.loads.advance()
    }

    /// Token for a fetch issued now.
    pub fn begin_fetch(&mut self) -> Generation {
        self.fetches.advance()
    }

    #[inline]
    pub fn load_is_current(&self, token: Generation) -> bool {
        self.loads.is_current(token)
    }

    #[inline]
    pub fn fetch_is_current(&self, token: Generation) -> bool {
        self.fetches.is_current(token)
    }
}

/// The central orchestrator for styling: attaches loaded features,
/// applies per-feature style updates, manages selection state, and
/// rebuilds the legend to match the current color mapping.
#[derive(Debug, Default)]
pub struct Synchronizer {
    /// Property keys rendered into each tooltip after the label.
    pub tooltip_fields: Vec<String>,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tooltip_fields(fields: Vec<String>) -> Self {
        Self { tooltip_fields: fields }
    }

    /// Attach a loaded feature set in the neutral style, replacing any
    /// previous layer and legend.
    pub fn attach(&self, ctx: &mut RenderContext, features: FeatureSet) {
        ctx.layer = Some(StyledLayer::new(features));
        ctx.legend.clear();
    }

    /// Apply a resolved color mapping: fill each feature from the map,
    /// rebuild its tooltip, and replace the legend. Requires exactly
    /// one label per feature; a mismatch is refused outright.
    pub fn apply(
        &self,
        ctx: &mut RenderContext,
        labels: &[Label],
        colors: &LabelColorMap,
    ) -> Result<(), StyleError> {
        let layer = ctx.layer.as_mut().ok_or(StyleError::NoLayer)?;

        if labels.len() != layer.len() {
            return Err(StyleError::LengthMismatch {
                features: layer.len(),
                labels: labels.len(),
            });
        }

        for (index, label) in labels.iter().enumerate() {
            let fill = colors
                .get(&label.text)
                .ok_or_else(|| StyleError::UnmappedLabel(label.text.clone()))?;
            let tooltip = match layer.features().get(index) {
                Some(feature) => self.tooltip_text(feature, label),
                None => label.to_string(),
            };

            let style = layer.style_mut(index);
            style.fill = fill;
            style.tooltip = tooltip;
        }

        layer.set_state(LayerState::Styled);
        ctx.legend.rebuild(colors);
        Ok(())
    }

    /// Highlight feature `index`: reset the full layer to the default
    /// fill opacity first, then raise the clicked feature, overwriting
    /// any prior highlight. The color mapping stays valid.
    pub fn click(&self, ctx: &mut RenderContext, index: usize) -> Result<(), StyleError> {
        let layer = ctx.layer.as_mut().ok_or(StyleError::NoLayer)?;

        if index >= layer.len() {
            return Err(StyleError::NoSuchFeature { index, len: layer.len() });
        }

        layer.reset_opacity();
        layer.style_mut(index).fill_opacity = HIGHLIGHT_FILL_OPACITY;
        layer.set_state(LayerState::Highlighted(index));
        Ok(())
    }

    fn tooltip_text(&self, feature: &Feature, label: &Label) -> String {
        let mut text = label.to_string();
        for key in &self.tooltip_fields {
            if let Some(value) = feature.property(key) {
                text.push_str(&format!(", {key}: {}", display_value(value)));
            }
        }
        text
    }
}

/// Property values render without JSON quoting.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::color::{LabelColorMap, RandomHex};
    use crate::error::StyleError;
    use crate::feature::fixtures::feature_set;
    use crate::query::Label;
    use crate::style::layer::{DEFAULT_FILL_OPACITY, HIGHLIGHT_FILL_OPACITY, LayerState};

    use super::{RenderContext, Synchronizer};

    fn styled_context(texts: &[&str]) -> (RenderContext, Vec<Label>, LabelColorMap) {
        let sync = Synchronizer::new();
        let mut ctx = RenderContext::new();
        sync.attach(&mut ctx, feature_set(texts.len()));

        let labels: Vec<Label> = texts.iter().map(|&t| Label::text(t)).collect();
        let mut strategy = RandomHex::with_rng(StdRng::seed_from_u64(3));
        let colors = LabelColorMap::resolve(&labels, &mut strategy);
        sync.apply(&mut ctx, &labels, &colors).unwrap();
        (ctx, labels, colors)
    }

    #[test]
    fn applied_colors_are_label_pure() {
        let (ctx, labels, colors) = styled_context(&["x", "y", "x"]);
        let layer = ctx.layer().unwrap();

        assert_eq!(layer.state(), LayerState::Styled);
        for (i, label) in labels.iter().enumerate() {
            assert_eq!(layer.style(i).unwrap().fill, colors.get(&label.text).unwrap());
        }
        assert_eq!(layer.style(0).unwrap().fill, layer.style(2).unwrap().fill);
        assert_ne!(layer.style(0).unwrap().fill, layer.style(1).unwrap().fill);
    }

    #[test]
    fn legend_matches_distinct_labels_in_order() {
        let (ctx, _, colors) = styled_context(&["x", "y", "x"]);
        assert_eq!(colors.len(), 2);
        assert_eq!(ctx.legend().len(), 2);
        assert_eq!(ctx.legend().entries()[0].text, "x");
        assert_eq!(ctx.legend().entries()[1].text, "y");
    }

    #[test]
    fn tooltips_carry_label_and_configured_fields() {
        let sync =
            Synchronizer::with_tooltip_fields(vec!["TRACTCE10".into(), "POP".into()]);
        let mut ctx = RenderContext::new();
        sync.attach(&mut ctx, feature_set(1));

        let labels = vec![Label::text("x")];
        let colors = LabelColorMap::resolve(
            &labels,
            &mut RandomHex::with_rng(StdRng::seed_from_u64(0)),
        );
        sync.apply(&mut ctx, &labels, &colors).unwrap();

        let tooltip = &ctx.layer().unwrap().style(0).unwrap().tooltip;
        assert_eq!(tooltip, "x, TRACTCE10: 000100, POP: 1000");
    }

    #[test]
    fn length_mismatch_is_refused() {
        let sync = Synchronizer::new();
        let mut ctx = RenderContext::new();
        sync.attach(&mut ctx, feature_set(3));

        let labels = vec![Label::text("x"), Label::text("y")];
        let colors = LabelColorMap::resolve(
            &labels,
            &mut RandomHex::with_rng(StdRng::seed_from_u64(0)),
        );

        let err = sync.apply(&mut ctx, &labels, &colors).unwrap_err();
        assert_eq!(err, StyleError::LengthMismatch { features: 3, labels: 2 });
        // Layer is untouched.
        assert_eq!(ctx.layer().unwrap().state(), LayerState::Loaded);
        assert!(ctx.legend().is_empty());
    }

    #[test]
    fn apply_without_layer_is_refused() {
        let sync = Synchronizer::new();
        let mut ctx = RenderContext::new();
        let colors = LabelColorMap::default();
        assert_eq!(sync.apply(&mut ctx, &[], &colors).unwrap_err(), StyleError::NoLayer);
    }

    #[test]
    fn exactly_one_feature_is_highlighted() {
        let (mut ctx, ..) = styled_context(&["x", "y", "z"]);
        let sync = Synchronizer::new();

        for &click in &[0usize, 2, 1, 1, 2] {
            sync.click(&mut ctx, click).unwrap();
            let layer = ctx.layer().unwrap();
            assert_eq!(layer.state(), LayerState::Highlighted(click));
            for (i, style) in layer.styles().iter().enumerate() {
                let expected =
                    if i == click { HIGHLIGHT_FILL_OPACITY } else { DEFAULT_FILL_OPACITY };
                assert_eq!(style.fill_opacity, expected, "feature {i} after clicking {click}");
            }
        }
    }

    #[test]
    fn click_out_of_bounds_is_refused() {
        let (mut ctx, ..) = styled_context(&["x"]);
        let sync = Synchronizer::new();
        assert_eq!(
            sync.click(&mut ctx, 5).unwrap_err(),
            StyleError::NoSuchFeature { index: 5, len: 1 }
        );
    }

    #[test]
    fn detach_clears_layer_and_legend() {
        let (mut ctx, ..) = styled_context(&["x", "y"]);
        assert!(ctx.layer().is_some());

        ctx.detach();
        assert!(ctx.layer().is_none());
        assert!(ctx.legend().is_empty());
    }

    #[test]
    fn detach_invalidates_outstanding_tokens() {
        let mut ctx = RenderContext::new();
        let load = ctx.detach();
        let fetch = ctx.begin_fetch();
        assert!(ctx.load_is_current(load));
        assert!(ctx.fetch_is_current(fetch));

        let newer = ctx.detach();
        assert!(!ctx.load_is_current(load));
        assert!(!ctx.fetch_is_current(fetch));
        assert!(ctx.load_is_current(newer));
    }
}
