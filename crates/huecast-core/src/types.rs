//! Common types used across the huecast service.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// The family of regression model backing a prediction.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Support vector regression (linear kernel).
    Svm,
    /// Ridge regression.
    Ridge,
    /// Random forest regression.
    RandomForest,
}

impl ModelKind {
    /// All kinds the service knows how to load, in preference order.
    pub const ALL: [Self; 3] = [Self::Svm, Self::Ridge, Self::RandomForest];

    /// Returns the artifact filename for this kind.
    #[must_use]
    pub fn artifact_name(self) -> &'static str {
        match self {
            Self::Svm => "svm.json",
            Self::Ridge => "ridge.json",
            Self::RandomForest => "random_forest.json",
        }
    }

    /// Returns the wire name for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svm => "svm",
            Self::Ridge => "ridge",
            Self::RandomForest => "random_forest",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svm" => Ok(Self::Svm),
            "ridge" => Ok(Self::Ridge),
            "random_forest" | "randomforest" => Ok(Self::RandomForest),
            other => Err(Error::unknown_model(other)),
        }
    }
}

/// Unique identifier for a request.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Creates a new random `RequestId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
