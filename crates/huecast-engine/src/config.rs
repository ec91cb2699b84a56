//! Configuration types for the huecast engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use huecast_core::ModelKind;

use crate::loader::ArtifactLoader;

/// Configuration for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory containing the artifact files.
    pub artifacts_dir: PathBuf,

    /// Preferred model kind when a request does not specify one.
    pub default_model: Option<ModelKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: ArtifactLoader::default_dir(),
            default_model: None,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for `EngineConfig`.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    artifacts_dir: Option<PathBuf>,
    default_model: Option<ModelKind>,
}

impl EngineConfigBuilder {
    /// Sets the artifacts directory.
    #[must_use]
    pub fn artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    /// Sets the preferred default model kind.
    #[must_use]
    pub fn default_model(mut self, kind: ModelKind) -> Self {
        self.default_model = Some(kind);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> EngineConfig {
        EngineConfig {
            artifacts_dir: self
                .artifacts_dir
                .unwrap_or_else(ArtifactLoader::default_dir),
            default_model: self.default_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = EngineConfig::builder().build();
        assert_eq!(config.artifacts_dir, ArtifactLoader::default_dir());
        assert_eq!(config.default_model, None);
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfig::builder()
            .artifacts_dir("/srv/artifacts")
            .default_model(ModelKind::Ridge)
            .build();
        assert_eq!(config.artifacts_dir, PathBuf::from("/srv/artifacts"));
        assert_eq!(config.default_model, Some(ModelKind::Ridge));
    }
}
