//! The inference engine: preprocess, vectorize, predict, clamp.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info};

use huecast_core::{Error, ModelKind, PredictRequest, Prediction, Result, Rgb};

use crate::config::EngineConfig;
use crate::loader::ArtifactLoader;
use crate::model::RegressionModel;
use crate::preprocess::preprocess;
use crate::vectorizer::TfidfVectorizer;

/// The color prediction engine.
///
/// Immutable after construction; all state is loaded up front from the
/// artifacts directory.
pub struct Engine {
    config: EngineConfig,
    vectorizer: TfidfVectorizer,
    models: BTreeMap<ModelKind, Box<dyn RegressionModel>>,
}

impl Engine {
    /// Creates an engine by loading artifacts per the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectorizer is missing, no model artifact is
    /// present, or any present artifact is malformed.
    pub fn new(config: EngineConfig) -> Result<Self> {
        info!(dir = %config.artifacts_dir.display(), "Loading artifacts");
        let start = Instant::now();

        let loaded = ArtifactLoader::new(&config.artifacts_dir).load()?;

        info!(
            models = loaded.models.len(),
            features = loaded.vectorizer.num_features(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Engine ready"
        );

        Ok(Self {
            config,
            vectorizer: loaded.vectorizer,
            models: loaded.models,
        })
    }

    /// Returns the kinds of all loaded models.
    #[must_use]
    pub fn loaded_kinds(&self) -> Vec<ModelKind> {
        self.models.keys().copied().collect()
    }

    /// Returns the kind used when a request does not name a model.
    ///
    /// Prefers the configured default, then `svm`, then whichever model
    /// loaded first.
    #[must_use]
    pub fn default_kind(&self) -> ModelKind {
        if let Some(kind) = self.config.default_model {
            if self.models.contains_key(&kind) {
                return kind;
            }
        }
        if self.models.contains_key(&ModelKind::Svm) {
            return ModelKind::Svm;
        }
        // Construction guarantees at least one model.
        *self.models.keys().next().expect("engine has no models")
    }

    /// Runs the full predict pipeline for a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] for blank text and
    /// [`Error::UnknownModel`] when the request names a kind that is not
    /// loaded.
    pub fn predict(&self, request: &PredictRequest) -> Result<Prediction> {
        let input = request.text.trim();
        if input.is_empty() {
            return Err(Error::EmptyInput);
        }

        let kind = self.resolve_kind(request.model)?;
        let model = self
            .models
            .get(&kind)
            .ok_or_else(|| Error::unknown_model(kind.as_str()))?;

        let cleaned = preprocess(input);
        let features = self.vectorizer.transform(&cleaned);
        let channels = model.predict(&features);
        let rgb = Rgb::from_prediction(channels);

        debug!(
            request_id = %request.request_id,
            kind = %kind,
            cleaned = %cleaned,
            hex = %rgb.to_hex(),
            "Prediction complete"
        );

        Ok(Prediction::new(input, rgb, kind))
    }

    fn resolve_kind(&self, requested: Option<ModelKind>) -> Result<ModelKind> {
        match requested {
            Some(kind) if self.models.contains_key(&kind) => Ok(kind),
            Some(kind) => Err(Error::unknown_model(kind.as_str())),
            None => Ok(self.default_kind()),
        }
    }
}
