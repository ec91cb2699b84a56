//! Artifact loading.
//!
//! An artifacts directory holds `vectorizer.json` plus any of the known
//! model files (`svm.json`, `ridge.json`, `random_forest.json`). The
//! vectorizer is required; models are loaded opportunistically, but at
//! least one must be present.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use huecast_core::{Error, ModelKind, Result};

use crate::model::{ModelArtifact, RegressionModel};
use crate::vectorizer::TfidfVectorizer;

/// Filename of the vectorizer artifact.
pub const VECTORIZER_FILE: &str = "vectorizer.json";

/// Loads artifacts from a directory.
pub struct ArtifactLoader {
    dir: PathBuf,
}

impl ArtifactLoader {
    /// Creates a loader for the given artifacts directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the default artifacts directory.
    #[must_use]
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("huecast")
            .join("artifacts")
    }

    /// Returns the directory this loader reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads the vectorizer and every model artifact present.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectorizer is missing or unreadable, if any
    /// present model file is malformed, if a model's feature dimension
    /// disagrees with the vectorizer, or if no model files exist at all.
    pub fn load(&self) -> Result<LoadedArtifacts> {
        let vectorizer = self.load_vectorizer()?;
        debug!(
            features = vectorizer.num_features(),
            "Vectorizer loaded"
        );

        let mut models: BTreeMap<ModelKind, Box<dyn RegressionModel>> = BTreeMap::new();
        for kind in ModelKind::ALL {
            let path = self.dir.join(kind.artifact_name());
            if !path.exists() {
                continue;
            }
            let model = self.load_model(&path)?;
            if model.num_features() != vectorizer.num_features() {
                return Err(Error::invalid_artifact(
                    &path,
                    format!(
                        "model expects {} features but the vectorizer produces {}",
                        model.num_features(),
                        vectorizer.num_features()
                    ),
                ));
            }
            info!(kind = %kind, path = %path.display(), "Model artifact loaded");
            models.insert(kind, model);
        }

        if models.is_empty() {
            return Err(Error::NoModels {
                dir: self.dir.clone(),
            });
        }

        Ok(LoadedArtifacts { vectorizer, models })
    }

    /// Reports which artifact files exist without loading them.
    #[must_use]
    pub fn scan(&self) -> ArtifactInventory {
        ArtifactInventory {
            dir: self.dir.clone(),
            vectorizer: self.dir.join(VECTORIZER_FILE).exists(),
            models: ModelKind::ALL
                .into_iter()
                .filter(|kind| self.dir.join(kind.artifact_name()).exists())
                .collect(),
        }
    }

    fn load_vectorizer(&self) -> Result<TfidfVectorizer> {
        let path = self.dir.join(VECTORIZER_FILE);
        if !path.exists() {
            return Err(Error::ArtifactNotFound { path });
        }

        let content = fs::read_to_string(&path)?;
        let vectorizer: TfidfVectorizer = serde_json::from_str(&content)
            .map_err(|e| Error::invalid_artifact(&path, e.to_string()))?;
        vectorizer
            .validate()
            .map_err(|e| Error::invalid_artifact(&path, e.to_string()))?;
        Ok(vectorizer)
    }

    fn load_model(&self, path: &Path) -> Result<Box<dyn RegressionModel>> {
        let content = fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&content)
            .map_err(|e| Error::invalid_artifact(path, e.to_string()))?;
        artifact
            .into_model()
            .map_err(|e| Error::invalid_artifact(path, e))
    }
}

/// Everything needed to run predictions.
pub struct LoadedArtifacts {
    /// The trained vectorizer.
    pub vectorizer: TfidfVectorizer,
    /// Loaded models by kind.
    pub models: BTreeMap<ModelKind, Box<dyn RegressionModel>>,
}

impl std::fmt::Debug for LoadedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedArtifacts")
            .field("vectorizer", &self.vectorizer)
            .field("models", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// What an artifacts directory contains, without loading it.
#[derive(Debug, Clone)]
pub struct ArtifactInventory {
    /// The scanned directory.
    pub dir: PathBuf,
    /// Whether the vectorizer file exists.
    pub vectorizer: bool,
    /// Model kinds whose artifact files exist.
    pub models: Vec<ModelKind>,
}

impl ArtifactInventory {
    /// Returns `true` if the directory could produce a working engine.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.vectorizer && !self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_vectorizer(dir: &Path) {
        fs::write(
            dir.join(VECTORIZER_FILE),
            serde_json::json!({
                "vocabulary": {"calm": 0, "ocean": 1},
                "idf": [1.0, 1.5],
            })
            .to_string(),
        )
        .unwrap();
    }

    fn write_linear(dir: &Path, name: &str) {
        fs::write(
            dir.join(name),
            serde_json::json!({
                "type": "linear",
                "coefficients": [[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
                "intercepts": [0.0, 0.0, 0.0],
            })
            .to_string(),
        )
        .unwrap();
    }

    #[test]
    fn test_load_requires_vectorizer() {
        let dir = tempdir().unwrap();
        write_linear(dir.path(), "svm.json");

        let err = ArtifactLoader::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound { .. }));
    }

    #[test]
    fn test_load_requires_at_least_one_model() {
        let dir = tempdir().unwrap();
        write_vectorizer(dir.path());

        let err = ArtifactLoader::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, Error::NoModels { .. }));
    }

    #[test]
    fn test_load_picks_up_present_models() {
        let dir = tempdir().unwrap();
        write_vectorizer(dir.path());
        write_linear(dir.path(), "svm.json");
        write_linear(dir.path(), "ridge.json");

        let loaded = ArtifactLoader::new(dir.path()).load().unwrap();
        assert_eq!(
            loaded.models.keys().copied().collect::<Vec<_>>(),
            vec![ModelKind::Svm, ModelKind::Ridge]
        );
    }

    #[test]
    fn test_load_rejects_dimension_mismatch() {
        let dir = tempdir().unwrap();
        write_vectorizer(dir.path());
        fs::write(
            dir.path().join("svm.json"),
            serde_json::json!({
                "type": "linear",
                "coefficients": [[1.0], [1.0], [1.0]],
                "intercepts": [0.0, 0.0, 0.0],
            })
            .to_string(),
        )
        .unwrap();

        let err = ArtifactLoader::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, Error::InvalidArtifact { .. }));
    }

    #[test]
    fn test_load_rejects_corrupt_model() {
        let dir = tempdir().unwrap();
        write_vectorizer(dir.path());
        fs::write(dir.path().join("ridge.json"), "not json").unwrap();

        let err = ArtifactLoader::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, Error::InvalidArtifact { .. }));
    }

    #[test]
    fn test_scan_reports_inventory() {
        let dir = tempdir().unwrap();
        write_vectorizer(dir.path());
        write_linear(dir.path(), "random_forest.json");

        let inventory = ArtifactLoader::new(dir.path()).scan();
        assert!(inventory.vectorizer);
        assert_eq!(inventory.models, vec![ModelKind::RandomForest]);
        assert!(inventory.is_complete());
    }
}
