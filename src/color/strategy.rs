//! Pluggable label-to-color strategies.

use rand::Rng;
use rand::rngs::ThreadRng;

use crate::query::Label;

use super::Color;

/// Picks a display color for a label not yet present in the map.
/// Implementations may be randomized; substitute a seeded rng for
/// deterministic output.
pub trait ColorStrategy {
    fn color_for(&mut self, label: &Label) -> Color;
}

/// Six independent uniform hex digits per unseen label: 16^6 possible
/// colors, collisions possible and not corrected.
pub struct RandomHex<R: Rng = ThreadRng> {
    rng: R,
}

impl RandomHex {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomHex {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomHex<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ColorStrategy for RandomHex<R> {
    fn color_for(&mut self, _label: &Label) -> Color {
        let mut digits = [0u8; 6];
        for digit in &mut digits {
            *digit = self.rng.random_range(0..16) as u8;
        }
        Color::new(
            digits[0] << 4 | digits[1],
            digits[2] << 4 | digits[3],
            digits[4] << 4 | digits[5],
        )
    }
}

/// Fixed monotonic scale over numeric labels: inclusive lower bound per
/// bucket, higher values map to more saturated colors. Non-numeric
/// labels (and values below every bucket) get the background color.
pub struct ThresholdScale {
    background: Color,
}

/// (lower bound, color), darkest first.
const BREAKS: &[(f64, Color)] = &[
    (100.0, Color::new(0x80, 0x00, 0x26)),
    (50.0, Color::new(0xBD, 0x00, 0x26)),
    (20.0, Color::new(0xE3, 0x1A, 0x1C)),
    (10.0, Color::new(0xFC, 0x4E, 0x2A)),
    (5.0, Color::new(0xFD, 0x8D, 0x3C)),
    (2.0, Color::new(0xFE, 0xB2, 0x4C)),
    (0.0, Color::new(0xFE, 0xD9, 0x76)),
];

impl ThresholdScale {
    pub fn new(background: Color) -> Self {
        Self { background }
    }
}

impl Default for ThresholdScale {
    fn default() -> Self {
        Self::new(Color::new(0xFF, 0xFF, 0xFF))
    }
}

impl ColorStrategy for ThresholdScale {
    fn color_for(&mut self, label: &Label) -> Color {
        let Some(value) = label.value.filter(|value| value.is_finite()) else {
            return self.background;
        };
        for &(low, color) in BREAKS {
            if value >= low {
                return color;
            }
        }
        self.background
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::query::Label;

    use super::{Color, ColorStrategy, RandomHex, ThresholdScale};

    #[test]
    fn seeded_random_hex_is_reproducible() {
        let label = Label::text("x");
        let mut first = RandomHex::with_rng(StdRng::seed_from_u64(42));
        let mut second = RandomHex::with_rng(StdRng::seed_from_u64(42));

        for _ in 0..16 {
            assert_eq!(first.color_for(&label), second.color_for(&label));
        }
    }

    #[test]
    fn threshold_scale_is_monotonic() {
        let mut scale = ThresholdScale::default();
        let colors: Vec<_> = [150.0, 60.0, 30.0, 15.0, 7.0, 3.0, 1.0]
            .iter()
            .map(|&v| scale.color_for(&Label::number(v)))
            .collect();

        // All buckets distinct, darkest at the top.
        for pair in colors.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(colors[0], Color::new(0x80, 0x00, 0x26));
        assert_eq!(colors[6], Color::new(0xFE, 0xD9, 0x76));
    }

    #[test]
    fn threshold_lower_bounds_are_inclusive() {
        let mut scale = ThresholdScale::default();
        assert_eq!(scale.color_for(&Label::number(100.0)), Color::new(0x80, 0x00, 0x26));
        assert_eq!(scale.color_for(&Label::number(50.0)), Color::new(0xBD, 0x00, 0x26));
        assert_eq!(scale.color_for(&Label::number(0.0)), Color::new(0xFE, 0xD9, 0x76));
    }

    #[test]
    fn non_numeric_and_negative_labels_get_background() {
        let mut scale = ThresholdScale::default();
        let background = Color::new(0xFF, 0xFF, 0xFF);
        assert_eq!(scale.color_for(&Label::text("downtown")), background);
        assert_eq!(scale.color_for(&Label::number(-3.0)), background);
        assert_eq!(scale.color_for(&Label::number(f64::NAN)), background);
    }
}
