mod map;
mod strategy;

use std::fmt;

pub use map::LabelColorMap;
pub use strategy::{ColorStrategy, RandomHex, ThresholdScale};

/// Simple RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    /// Format as CSS hex: #RRGGBB
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
