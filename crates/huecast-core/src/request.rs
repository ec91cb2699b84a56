//! Request types for the predict pipeline.

use serde::{Deserialize, Serialize};

use crate::types::{ModelKind, RequestId};

/// Request for a color prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Unique request identifier.
    #[serde(default, skip_serializing)]
    pub request_id: RequestId,

    /// Free-text input describing a mood, scene, or color.
    pub text: String,

    /// Model kind to use. `None` selects the engine's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelKind>,
}

impl PredictRequest {
    /// Creates a new predict request for the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            text: text.into(),
            model: None,
        }
    }

    /// Sets the model kind to use.
    #[must_use]
    pub fn with_model(mut self, kind: ModelKind) -> Self {
        self.model = Some(kind);
        self
    }
}
