//! Label-to-color mapping for one fetch response.

use ahash::AHashMap;

use crate::query::Label;

use super::{Color, ColorStrategy};

/// Mapping from label text to display color, in first-seen order.
/// Scoped to one fetch response; superseded entirely by the next.
#[derive(Debug, Clone, Default)]
pub struct LabelColorMap {
    index: AHashMap<String, usize>,
    entries: Vec<(String, Color)>,
}

impl LabelColorMap {
    /// Build the map for a label sequence: each unseen label gets a
    /// fresh color from the strategy, each seen label reuses its
    /// cached one.
    pub fn resolve(labels: &[Label], strategy: &mut dyn ColorStrategy) -> Self {
        let mut map = Self::default();
        for label in labels {
            if !map.index.contains_key(&label.text) {
                let color = strategy.color_for(label);
                map.index.insert(label.text.clone(), map.entries.len());
                map.entries.push((label.text.clone(), color));
            }
        }
        map
    }

    pub fn get(&self, label: &str) -> Option<Color> {
        self.index.get(label).map(|&i| self.entries[i].1)
    }

    /// Number of distinct labels.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct labels with their colors, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> {
        self.entries.iter().map(|(text, color)| (text.as_str(), *color))
    }
}
