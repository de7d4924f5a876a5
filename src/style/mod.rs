mod layer;
mod legend;
mod sync;

pub use layer::{
    DEFAULT_FILL_OPACITY, FeatureStyle, HIGHLIGHT_FILL_OPACITY, LayerState, StyledLayer,
};
pub use legend::{Legend, LegendEntry};
pub use sync::{Generation, GenerationCounter, RenderContext, Synchronizer};
