//! TF-IDF vectorizer over an exported vocabulary.
//!
//! The artifact carries the trained vocabulary (token to column index) and
//! the per-column IDF weights. `transform` reproduces the training-time
//! featurization: count term frequencies, scale by IDF, L2-normalize.

use serde::Deserialize;

use huecast_core::{Error, Result};

/// A pre-trained TF-IDF vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    /// Token to feature-column mapping.
    vocabulary: std::collections::HashMap<String, usize>,
    /// Per-column inverse document frequency weights.
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Validates internal consistency after deserialization.
    ///
    /// # Errors
    ///
    /// Returns an error if any vocabulary entry points outside the IDF
    /// table.
    pub fn validate(&self) -> Result<()> {
        for (token, &column) in &self.vocabulary {
            if column >= self.idf.len() {
                return Err(Error::internal(format!(
                    "vocabulary entry '{}' maps to column {} but idf has {} entries",
                    token,
                    column,
                    self.idf.len()
                )));
            }
        }
        Ok(())
    }

    /// Returns the dimensionality of the feature space.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    /// Transforms cleaned text into a dense TF-IDF feature vector.
    ///
    /// Tokens are whitespace-separated runs of at least two characters
    /// (shorter tokens were discarded at training time). Tokens outside the
    /// vocabulary are ignored. Text with no known tokens maps to the zero
    /// vector.
    #[must_use]
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0f64; self.idf.len()];

        for token in text.split_whitespace().filter(|t| t.len() >= 2) {
            if let Some(&column) = self.vocabulary.get(token) {
                features[column] += 1.0;
            }
        }

        for (column, value) in features.iter_mut().enumerate() {
            *value *= self.idf[column];
        }

        let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        features
    }
}
