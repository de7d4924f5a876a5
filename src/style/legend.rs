//! Legend: derived view over the current label-color map.

use crate::color::{Color, LabelColorMap};

/// One legend row: a color swatch plus its label text.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub color: Color,
    pub text: String,
}

/// Rebuilt in place from each resolved color map; legends never stack
/// across fetches and are never persisted independently.
#[derive(Debug, Clone, Default)]
pub struct Legend {
    entries: Vec<LegendEntry>,
}

impl Legend {
    /// Replace all entries with the map's distinct labels, in
    /// first-seen order.
    pub fn rebuild(&mut self, colors: &LabelColorMap) {
        self.entries.clear();
        self.entries.extend(
            colors.iter().map(|(text, color)| LegendEntry { color, text: text.to_string() }),
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::color::{LabelColorMap, ThresholdScale};
    use crate::query::Label;

    use super::Legend;

    fn resolved(texts: &[&str]) -> LabelColorMap {
        let labels: Vec<Label> = texts.iter().map(|&t| Label::text(t)).collect();
        LabelColorMap::resolve(&labels, &mut ThresholdScale::default())
    }

    #[test]
    fn one_entry_per_distinct_label() {
        let mut legend = Legend::default();
        legend.rebuild(&resolved(&["x", "y", "x", "y", "x"]));

        assert_eq!(legend.len(), 2);
        let texts: Vec<&str> = legend.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "y"]);
    }

    #[test]
    fn rebuild_replaces_previous_entries() {
        let mut legend = Legend::default();
        legend.rebuild(&resolved(&["a", "b", "c"]));
        assert_eq!(legend.len(), 3);

        legend.rebuild(&resolved(&["z"]));
        assert_eq!(legend.len(), 1);
        assert_eq!(legend.entries()[0].text, "z");
    }
}
