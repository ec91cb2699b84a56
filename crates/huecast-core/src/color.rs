//! The RGB color triple produced by the predict pipeline.

use serde::{Deserialize, Serialize};

/// An RGB color with 8-bit channels.
///
/// Serialized on the wire as a 3-element array `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8, u8)", into = "(u8, u8, u8)")]
pub struct Rgb {
    /// Red channel intensity.
    pub r: u8,
    /// Green channel intensity.
    pub g: u8,
    /// Blue channel intensity.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from explicit channel values.
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts a raw model prediction into a color.
    ///
    /// Each channel is rounded to the nearest integer (ties round away
    /// from zero) and clamped to [0, 255]. NaN maps to 0; infinities
    /// clamp like any other out-of-range value.
    #[must_use]
    pub fn from_prediction(channels: [f64; 3]) -> Self {
        let clamp = |v: f64| -> u8 {
            if v.is_nan() {
                return 0;
            }
            v.round().clamp(0.0, 255.0) as u8
        };

        Self {
            r: clamp(channels[0]),
            g: clamp(channels[1]),
            b: clamp(channels[2]),
        }
    }

    /// Renders the color as a lowercase `#rrggbb` hex string.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.r, c.g, c.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}
