mod client;
mod params;

pub use client::{AggregateClient, Label, OfflineClient, synthetic_labels};

#[cfg(feature = "remote")]
pub use client::HttpAggregateClient;

pub use params::{FieldRange, QueryParams, Range};
