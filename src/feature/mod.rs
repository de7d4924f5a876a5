mod io;

use geo::{BoundingRect, Coord, MultiPolygon, Rect};
use serde_json::{Map, Value};

use crate::{error::LoadError, source::DatasetSource};

/// One geometric record from a dataset: polygon geometry plus its
/// opaque property bag (e.g. `TRACTCE10`, `POP`).
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: MultiPolygon<f64>,
    pub properties: Map<String, Value>,
}

impl Feature {
    #[inline]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Ordered, immutable sequence of features loaded from one dataset.
/// Replaced wholesale on dataset change; feature positions are stable
/// for the lifetime of the set and are the binding key for labels.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    name: String,
    features: Vec<Feature>,
}

impl FeatureSet {
    /// Load and decode the named dataset from `source`.
    pub fn load(source: &dyn DatasetSource, name: &str) -> Result<Self, LoadError> {
        let features = io::read_features(source, name)?;
        Ok(Self { name: name.to_string(), features })
    }

    /// Build a set directly from features (in-memory pipelines, tests).
    pub fn from_features(name: impl Into<String>, features: Vec<Feature>) -> Self {
        Self { name: name.into(), features }
    }

    /// Dataset name this set was loaded from.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
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
    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Bounding box over all geometries (lon/lat), or `None` if the set
    /// has no coordinates.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let mut bounds: Option<Rect<f64>> = None;
        for feature in &self.features {
            let Some(rect) = feature.geometry.bounding_rect() else { continue };
            bounds = Some(match bounds {
                None => rect,
                Some(prev) => Rect::new(
                    Coord {
                        x: prev.min().x.min(rect.min().x),
                        y: prev.min().y.min(rect.min().y),
                    },
                    Coord {
                        x: prev.max().x.max(rect.max().x),
                        y: prev.max().y.max(rect.max().y),
                    },
                ),
            });
        }
        bounds
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use geo::{Coord, LineString, MultiPolygon, Polygon};
    use serde_json::{Map, json};

    use super::{Feature, FeatureSet};

    /// Unit square with its lower-left corner at (x, y).
    pub(crate) fn square(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Polygon::new(
            LineString(vec![
                Coord { x, y },
                Coord { x: x + 1.0, y },
                Coord { x: x + 1.0, y: y + 1.0 },
                Coord { x, y: y + 1.0 },
                Coord { x, y },
            ]),
            vec![],
        )])
    }

    pub(crate) fn feature(x: f64, y: f64, tract: &str, pop: u64) -> Feature {
        let mut properties = Map::new();
        properties.insert("TRACTCE10".into(), json!(tract));
        properties.insert("POP".into(), json!(pop));
        Feature { geometry: square(x, y), properties }
    }

    /// A small set of `n` adjacent unit squares.
    pub(crate) fn feature_set(n: usize) -> FeatureSet {
        let features = (0..n)
            .map(|i| feature(i as f64, 0.0, &format!("{:06}", 100 + i), 1000 + i as u64))
            .collect();
        FeatureSet::from_features("fixture", features)
    }
}
