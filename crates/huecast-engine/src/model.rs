//! Regression models over TF-IDF feature vectors.
//!
//! Two artifact families cover the trained estimators: a linear family
//! (ridge regression and linear-kernel SVR both export coefficients and
//! intercepts) and a random-forest family (binary regression trees with
//! 3-value leaves, averaged).

use serde::Deserialize;

/// A regression model mapping a feature vector to three color channels.
pub trait RegressionModel: Send + Sync {
    /// Predicts the raw (unclamped) channel values for a feature vector.
    fn predict(&self, features: &[f64]) -> [f64; 3];

    /// The feature dimensionality this model was trained on.
    fn num_features(&self) -> usize;
}

/// On-disk model artifact, tagged by family.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// Linear regression family (ridge, linear SVR).
    Linear {
        /// One coefficient row per output channel.
        coefficients: Vec<Vec<f64>>,
        /// One intercept per output channel.
        intercepts: Vec<f64>,
    },
    /// Random forest of regression trees.
    Forest {
        /// Feature dimensionality the forest was trained on.
        num_features: usize,
        /// The trees; predictions are averaged.
        trees: Vec<Tree>,
    },
}

impl ModelArtifact {
    /// Validates the artifact and converts it into a runnable model.
    ///
    /// # Errors
    ///
    /// Returns a description of the structural problem if the artifact is
    /// malformed.
    pub fn into_model(self) -> Result<Box<dyn RegressionModel>, String> {
        match self {
            Self::Linear {
                coefficients,
                intercepts,
            } => {
                let model = LinearModel::new(coefficients, intercepts)?;
                Ok(Box::new(model))
            }
            Self::Forest {
                num_features,
                trees,
            } => {
                let model = ForestModel::new(num_features, trees)?;
                Ok(Box::new(model))
            }
        }
    }
}

/// Linear regression: `y = coefficients * x + intercepts`.
#[derive(Debug, Clone)]
pub struct LinearModel {
    coefficients: [Vec<f64>; 3],
    intercepts: [f64; 3],
}

impl LinearModel {
    /// Builds a linear model, checking channel count and row widths.
    pub fn new(coefficients: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Result<Self, String> {
        let coefficients: [Vec<f64>; 3] = coefficients
            .try_into()
            .map_err(|rows: Vec<Vec<f64>>| {
                format!("expected 3 coefficient rows, found {}", rows.len())
            })?;
        let intercepts: [f64; 3] = intercepts
            .try_into()
            .map_err(|v: Vec<f64>| format!("expected 3 intercepts, found {}", v.len()))?;

        let width = coefficients[0].len();
        if coefficients.iter().any(|row| row.len() != width) {
            return Err("coefficient rows have differing widths".to_string());
        }

        Ok(Self {
            coefficients,
            intercepts,
        })
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, features: &[f64]) -> [f64; 3] {
        let mut out = self.intercepts;
        for channel in 0..3 {
            out[channel] += self.coefficients[channel]
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        }
        out
    }

    fn num_features(&self) -> usize {
        self.coefficients[0].len()
    }
}

/// A node in a binary regression tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Internal split node.
    Split {
        /// Feature column to test.
        feature: usize,
        /// Split threshold; `feature <= threshold` goes left.
        threshold: f64,
        /// Index of the left child.
        left: usize,
        /// Index of the right child.
        right: usize,
    },
    /// Leaf node holding the predicted channel values.
    Leaf {
        /// Predicted channel values.
        values: [f64; 3],
    },
}

/// A single regression tree, stored as a node array rooted at index 0.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    /// The node array.
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, num_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= num_features {
                    return Err(format!(
                        "node {} tests feature {} but the forest declares {} features",
                        index, feature, num_features
                    ));
                }
                // Children must point forward so traversal terminates.
                if *left <= index || *right <= index || *left >= self.nodes.len() || *right >= self.nodes.len()
                {
                    return Err(format!("node {} has out-of-order child indices", index));
                }
            }
        }
        Ok(())
    }

    fn predict(&self, features: &[f64]) -> [f64; 3] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { values } => return *values,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// Random forest regression: the mean of the per-tree predictions.
#[derive(Debug, Clone)]
pub struct ForestModel {
    num_features: usize,
    trees: Vec<Tree>,
}

impl ForestModel {
    /// Builds a forest model, validating every tree.
    pub fn new(num_features: usize, trees: Vec<Tree>) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (index, tree) in trees.iter().enumerate() {
            tree.validate(num_features)
                .map_err(|e| format!("tree {}: {}", index, e))?;
        }
        Ok(Self {
            num_features,
            trees,
        })
    }
}

impl RegressionModel for ForestModel {
    fn predict(&self, features: &[f64]) -> [f64; 3] {
        let mut out = [0.0f64; 3];
        for tree in &self.trees {
            let values = tree.predict(features);
            for channel in 0..3 {
                out[channel] += values[channel];
            }
        }
        let count = self.trees.len() as f64;
        for value in &mut out {
            *value /= count;
        }
        out
    }

    fn num_features(&self) -> usize {
        self.num_features
    }
}
