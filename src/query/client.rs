//! Aggregate statistics client: one label per feature, positional.

use std::fmt;

use rand::Rng;
use serde_json::Value;

use crate::error::QueryError;

use super::params::QueryParams;

/// A single label returned by the aggregate service: display text plus
/// an optional numeric reading for threshold-based coloring.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub value: Option<f64>,
}

impl Label {
    /// Text label; numeric text doubles as its own reading.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = text.trim().parse().ok();
        Self { text, value }
    }

    pub fn number(value: f64) -> Self {
        Self { text: format!("{value}"), value: Some(value) }
    }
}

impl fmt::Display for Label {
    /// Tooltip form: `text` alone, or `text: value` when the reading
    /// is separate from the text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) if self.text != format!("{value}") => {
                write!(f, "{}: {}", self.text, value)
            }
            _ => write!(f, "{}", self.text),
        }
    }
}

/// Issues a parameterized statistics request. The server contract is
/// positional: exactly one label per feature, in the order the feature
/// store enumerated them. No client-side key reconciliation happens.
pub trait AggregateClient {
    fn fetch(&self, params: &QueryParams) -> Result<Vec<Label>, QueryError>;
}

/// Client for configurations without a stats service; every fetch
/// fails, which (with the fallback enabled) exercises the synthetic
/// pipeline end to end.
pub struct OfflineClient;

impl AggregateClient for OfflineClient {
    fn fetch(&self, _params: &QueryParams) -> Result<Vec<Label>, QueryError> {
        Err(QueryError::Unreachable("no stats service configured".into()))
    }
}

/// HTTP client for the stats service `api/endpoint` route.
#[cfg(feature = "remote")]
pub struct HttpAggregateClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

#[cfg(feature = "remote")]
impl HttpAggregateClient {
    pub fn new(stats_base: impl Into<String>) -> Self {
        let mut base = stats_base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: format!("{base}/api/endpoint"),
        }
    }
}

#[cfg(feature = "remote")]
impl AggregateClient for HttpAggregateClient {
    fn fetch(&self, params: &QueryParams) -> Result<Vec<Label>, QueryError> {
        #[derive(serde::Deserialize)]
        struct LabelsResponse {
            labels: Vec<Value>,
        }

        let response: LabelsResponse = self
            .client
            .get(&self.endpoint)
            .query(&params.to_query_pairs())
            .send()?
            .error_for_status()?
            .json()?;

        labels_from_values(response.labels)
    }
}

/// Convert raw JSON label values; strings and numbers are accepted.
fn labels_from_values(values: Vec<Value>) -> Result<Vec<Label>, QueryError> {
    values
        .into_iter()
        .map(|value| match value {
            Value::String(s) => Ok(Label::text(s)),
            Value::Number(n) => {
                let n = n.as_f64().ok_or_else(|| {
                    QueryError::Malformed("label number out of f64 range".into())
                })?;
                Ok(Label::number(n))
            }
            other => Err(QueryError::Malformed(format!(
                "unsupported label value: {other}"
            ))),
        })
        .collect()
}

/// Synthetic stand-in labels (`"Feature 1"`.. with uniform values in
/// [0, 100)) so the rendering pipeline stays exercisable without a live
/// backend. Strictly opt-in; never substituted implicitly.
pub fn synthetic_labels(rng: &mut impl Rng, count: usize) -> Vec<Label> {
    (1..=count)
        .map(|k| Label {
            text: format!("Feature {k}"),
            value: Some(rng.random_range(0..100) as f64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use serde_json::json;

    use super::{Label, labels_from_values, synthetic_labels};

    #[test]
    fn string_and_number_labels_are_accepted() {
        let labels = labels_from_values(vec![json!("x"), json!(42), json!(2.5)]).unwrap();
        assert_eq!(labels[0], Label { text: "x".into(), value: None });
        assert_eq!(labels[1], Label { text: "42".into(), value: Some(42.0) });
        assert_eq!(labels[2], Label { text: "2.5".into(), value: Some(2.5) });
    }

    #[test]
    fn numeric_text_parses_its_own_reading() {
        assert_eq!(Label::text(" 17 ").value, Some(17.0));
        assert_eq!(Label::text("downtown").value, None);
    }

    #[test]
    fn structured_label_values_are_rejected() {
        assert!(labels_from_values(vec![json!({ "v": 1 })]).is_err());
        assert!(labels_from_values(vec![json!(null)]).is_err());
    }

    #[test]
    fn display_matches_tooltip_form() {
        assert_eq!(Label::text("x").to_string(), "x");
        assert_eq!(Label::number(42.0).to_string(), "42");
        let synthetic = Label { text: "Feature 3".into(), value: Some(17.0) };
        assert_eq!(synthetic.to_string(), "Feature 3: 17");
    }

    #[test]
    fn synthetic_labels_cover_the_requested_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let labels = synthetic_labels(&mut rng, 5);

        assert_eq!(labels.len(), 5);
        for (k, label) in labels.iter().enumerate() {
            assert_eq!(label.text, format!("Feature {}", k + 1));
            let value = label.value.unwrap();
            assert!((0.0..100.0).contains(&value));
            assert_eq!(value.fract(), 0.0);
        }
    }

    #[test]
    fn synthetic_labels_zero_is_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(synthetic_labels(&mut rng, 0).is_empty());
    }
}
