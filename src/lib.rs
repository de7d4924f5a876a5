//! Feature-attribute binding and choropleth styling.
//!
//! Loads ordered polygon features from a dataset, fetches one label per
//! feature from an aggregation service, binds the two positionally, and
//! keeps layer styling, tooltips, legend, and highlight state consistent
//! as responses arrive out of order.

mod color;
mod engine;
mod error;
mod feature;
mod io;
mod query;
mod source;
mod style;

#[doc(inline)]
pub use color::{Color, ColorStrategy, LabelColorMap, RandomHex, ThresholdScale};

#[doc(inline)]
pub use engine::Engine;

#[doc(inline)]
pub use error::{ListError, LoadError, QueryError, StyleError};

#[doc(inline)]
pub use feature::{Feature, FeatureSet};

#[doc(inline)]
pub use io::svg::{layer_to_svg_string, write_layer_svg};

#[doc(inline)]
pub use query::{
    AggregateClient, FieldRange, Label, OfflineClient, QueryParams, Range, synthetic_labels,
};

#[cfg(feature = "remote")]
#[doc(inline)]
pub use query::HttpAggregateClient;

#[doc(inline)]
pub use source::{DatasetSource, DirSource, MemSource};

#[cfg(feature = "remote")]
#[doc(inline)]
pub use source::HttpSource;

#[doc(inline)]
pub use style::{
    DEFAULT_FILL_OPACITY, FeatureStyle, Generation, HIGHLIGHT_FILL_OPACITY, LayerState, Legend,
    LegendEntry, RenderContext, StyledLayer, Synchronizer,
};
