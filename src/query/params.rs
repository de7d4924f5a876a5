//! Aggregation-query configuration.

/// Inclusive numeric range filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// A named field with its range filter, for one aggregation kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRange {
    pub name: String,
    pub range: Range,
}

/// Snapshot of the current aggregation-query configuration. Mutated
/// only by explicit user edits; passed by value to the aggregate
/// client, so an in-flight request never sees later edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    /// Active dataset file name.
    pub file_name: String,
    /// Display-name field reported back as the label.
    pub disname: String,
    pub min: FieldRange,
    pub max: FieldRange,
    pub avg: FieldRange,
    pub sum: FieldRange,
    /// Count aggregation has no field name, only a range.
    pub count: Range,
}

impl QueryParams {
    /// Encode the snapshot as query pairs, in the wire order the stats
    /// service expects.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("file_name", self.file_name.clone()),
            ("disname", self.disname.clone()),
            ("minName", self.min.name.clone()),
            ("minLow", fmt_num(self.min.range.low)),
            ("minHigh", fmt_num(self.min.range.high)),
            ("maxName", self.max.name.clone()),
            ("maxLow", fmt_num(self.max.range.low)),
            ("maxHigh", fmt_num(self.max.range.high)),
            ("avgName", self.avg.name.clone()),
            ("avgLow", fmt_num(self.avg.range.low)),
            ("avgHigh", fmt_num(self.avg.range.high)),
            ("sumName", self.sum.name.clone()),
            ("sumLow", fmt_num(self.sum.range.low)),
            ("sumHigh", fmt_num(self.sum.range.high)),
            ("countLow", fmt_num(self.count.low)),
            ("countHigh", fmt_num(self.count.high)),
        ]
    }
}

fn fmt_num(n: f64) -> String {
    format!("{n}")
}
