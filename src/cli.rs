use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;
use std::str::FromStr;

/// Choropleth rendering CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "chorobind", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List datasets available from a source
    List(ListArgs),

    /// Load a dataset, fetch statistics, and write a styled SVG
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Dataset directory, or dataset-store base URL
    pub source: String,

    /// Stats service base URL (remote listing endpoint)
    #[arg(long)]
    pub stats: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
pub enum Strategy {
    /// Fresh random hex color per distinct label
    Random,
    /// Fixed monotonic scale over numeric labels
    Threshold,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Dataset directory, or dataset-store base URL
    pub source: String,

    /// Dataset name, e.g. LACity or tracts.geojson
    pub dataset: String,

    /// Output SVG file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Stats service base URL; without it, only --fallback can color
    #[arg(long)]
    pub stats: Option<String>,

    /// Color strategy
    #[arg(long, value_enum, default_value_t = Strategy::Random)]
    pub strategy: Strategy,

    /// Seed the random strategy for reproducible colors
    #[arg(long)]
    pub seed: Option<u64>,

    /// Substitute N synthetic labels when the fetch fails
    #[arg(long, value_name = "N")]
    pub fallback: Option<usize>,

    /// Display-name field for the aggregation query
    #[arg(long)]
    pub disname: Option<String>,

    /// Min aggregation filter
    #[arg(long, value_name = "FIELD:LOW:HIGH")]
    pub min: Option<FilterSpec>,

    /// Max aggregation filter
    #[arg(long, value_name = "FIELD:LOW:HIGH")]
    pub max: Option<FilterSpec>,

    /// Avg aggregation filter
    #[arg(long, value_name = "FIELD:LOW:HIGH")]
    pub avg: Option<FilterSpec>,

    /// Sum aggregation filter
    #[arg(long, value_name = "FIELD:LOW:HIGH")]
    pub sum: Option<FilterSpec>,

    /// Count filter
    #[arg(long, value_name = "LOW:HIGH")]
    pub count: Option<RangeSpec>,

    /// Property field appended to each tooltip (repeatable)
    #[arg(long = "tooltip-field", value_name = "FIELD")]
    pub tooltip_fields: Vec<String>,

    /// Rendered width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Margin in pixels
    #[arg(long, default_value_t = 10)]
    pub margin: u32,
}

/// Named aggregation filter parsed from `FIELD:LOW:HIGH`.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSpec {
    pub field: String,
    pub low: f64,
    pub high: f64,
}

impl FromStr for FilterSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [field, low, high] = parts[..] else {
            return Err(format!("expected FIELD:LOW:HIGH, got `{s}`"));
        };
        Ok(Self {
            field: field.to_string(),
            low: parse_bound(low)?,
            high: parse_bound(high)?,
        })
    }
}

/// Numeric range parsed from `LOW:HIGH`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSpec {
    pub low: f64,
    pub high: f64,
}

impl FromStr for RangeSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [low, high] = parts[..] else {
            return Err(format!("expected LOW:HIGH, got `{s}`"));
        };
        Ok(Self { low: parse_bound(low)?, high: parse_bound(high)? })
    }
}

fn parse_bound(s: &str) -> Result<f64, String> {
    s.parse().map_err(|_| format!("invalid numeric bound: `{s}`"))
}

#[cfg(test)]
mod tests {
    use super::{FilterSpec, RangeSpec};

    #[test]
    fn filter_spec_parses_field_and_bounds() {
        let spec: FilterSpec = "POP:10:5000".parse().unwrap();
        assert_eq!(spec.field, "POP");
        assert_eq!(spec.low, 10.0);
        assert_eq!(spec.high, 5000.0);

        assert!("POP:10".parse::<FilterSpec>().is_err());
        assert!("POP:x:5000".parse::<FilterSpec>().is_err());
    }

    #[test]
    fn range_spec_parses_bounds() {
        let spec: RangeSpec = "1:99".parse().unwrap();
        assert_eq!(spec.low, 1.0);
        assert_eq!(spec.high, 99.0);
        assert!("1".parse::<RangeSpec>().is_err());
    }
}
