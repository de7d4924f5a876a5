//! A feature set plus its current per-feature display styles.

use crate::color::Color;
use crate::feature::FeatureSet;

/// Fill opacity for non-highlighted features.
pub const DEFAULT_FILL_OPACITY: f64 = 0.5;
/// Fill opacity for the one highlighted feature.
pub const HIGHLIGHT_FILL_OPACITY: f64 = 1.0;

const NEUTRAL_FILL: Color = Color::new(0xE5, 0xE7, 0xEB);
const STROKE: Color = Color::new(0x00, 0x00, 0x00);

/// Display state of one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStyle {
    pub fill: Color,
    pub fill_opacity: f64,
    pub stroke: Color,
    pub tooltip: String,
}

impl FeatureStyle {
    fn neutral() -> Self {
        Self {
            fill: NEUTRAL_FILL,
            fill_opacity: DEFAULT_FILL_OPACITY,
            stroke: STROKE,
            tooltip: String::new(),
        }
    }
}

/// Lifecycle of an attached layer. The unloaded state is the absence
/// of a layer (`RenderContext::layer() == None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    /// Freshly loaded, neutral styling.
    Loaded,
    /// Colored and tooltipped from a fetch+resolve cycle.
    Styled,
    /// One feature raised to full opacity; colors stay valid.
    Highlighted(usize),
}

/// The rendered feature layer: geometry plus one style per feature.
#[derive(Debug, Clone)]
pub struct StyledLayer {
    features: FeatureSet,
    styles: Vec<FeatureStyle>,
    state: LayerState,
}

impl StyledLayer {
    /// Wrap a freshly loaded feature set in the neutral style.
    pub fn new(features: FeatureSet) -> Self {
        let styles = vec![FeatureStyle::neutral(); features.len()];
        Self { features, styles, state: LayerState::Loaded }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[inline]
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    #[inline]
    pub fn state(&self) -> LayerState {
        self.state
    }

    pub fn style(&self, index: usize) -> Option<&FeatureStyle> {
        self.styles.get(index)
    }

    pub fn styles(&self) -> &[FeatureStyle] {
        &self.styles
    }

    pub(crate) fn style_mut(&mut self, index: usize) -> &mut FeatureStyle {
        &mut self.styles[index]
    }

    pub(crate) fn set_state(&mut self, state: LayerState) {
        self.state = state;
    }

    /// Reset every feature to the default fill opacity.
    pub(crate) fn reset_opacity(&mut self) {
        for style in &mut self.styles {
            style.fill_opacity = DEFAULT_FILL_OPACITY;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::feature::fixtures::feature_set;

    use super::{DEFAULT_FILL_OPACITY, LayerState, StyledLayer};

    #[test]
    fn new_layer_is_neutral_and_loaded() {
        let layer = StyledLayer::new(feature_set(3));
        assert_eq!(layer.state(), LayerState::Loaded);
        assert_eq!(layer.len(), 3);
        for style in layer.styles() {
            assert_eq!(style.fill_opacity, DEFAULT_FILL_OPACITY);
            assert!(style.tooltip.is_empty());
        }
    }
}
