//! Error taxonomy for the binding pipeline.
//!
//! All three network-facing errors (`LoadError`, `ListError`,
//! `QueryError`) are caught at the asynchronous call site and logged;
//! none of them crash the rendering pipeline. `StyleError` is the
//! synchronizer refusing to apply an inconsistent update.

use thiserror::Error;

/// Feature dataset could not be loaded or decoded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("failed to read dataset bytes")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "remote")]
    #[error("dataset request failed")]
    Http(#[from] reqwest::Error),

    #[error("malformed dataset: {0}")]
    Malformed(String),
}

/// Dataset listing could not be produced.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to read dataset directory")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "remote")]
    #[error("listing request failed")]
    Http(#[from] reqwest::Error),

    #[error("listing unavailable: {0}")]
    Unreachable(String),

    #[error("malformed listing: {0}")]
    Malformed(String),
}

/// Aggregate fetch failed or returned an unusable payload.
#[derive(Debug, Error)]
pub enum QueryError {
    #[cfg(feature = "remote")]
    #[error("aggregate request failed")]
    Http(#[from] reqwest::Error),

    #[error("aggregate service unreachable: {0}")]
    Unreachable(String),

    #[error("malformed aggregate response: {0}")]
    Malformed(String),
}

/// The synchronizer refused a style update.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    /// Positional binding requires exactly one label per feature.
    #[error("label count {labels} does not match feature count {features}")]
    LengthMismatch { features: usize, labels: usize },

    #[error("no color mapped for label: {0}")]
    UnmappedLabel(String),

    #[error("no such feature: index {index} of {len}")]
    NoSuchFeature { index: usize, len: usize },

    #[error("no feature layer attached")]
    NoLayer,
}
