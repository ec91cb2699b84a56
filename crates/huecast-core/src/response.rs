//! Response types for the predict pipeline.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::types::ModelKind;

/// A completed color prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// The input text, as received (before preprocessing).
    pub input: String,

    /// The predicted color.
    pub rgb: Rgb,

    /// The predicted color as a `#rrggbb` hex string.
    pub hex: String,

    /// The model kind that produced the prediction.
    pub model: ModelKind,
}

impl Prediction {
    /// Creates a prediction, deriving the hex form from the color.
    #[must_use]
    pub fn new(input: impl Into<String>, rgb: Rgb, model: ModelKind) -> Self {
        Self {
            input: input.into(),
            hex: rgb.to_hex(),
            rgb,
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let p = Prediction::new("calm ocean", Rgb::new(30, 144, 255), ModelKind::Svm);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "input": "calm ocean",
                "rgb": [30, 144, 255],
                "hex": "#1e90ff",
                "model": "svm",
            })
        );
    }
}
