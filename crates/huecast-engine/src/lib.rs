//! # Huecast Engine
//!
//! Loads pre-trained text-to-color artifacts and runs the predict pipeline:
//! preprocess the input text, vectorize it, run a regression model, and
//! clamp the result into an RGB triple.
//!
//! Artifacts are JSON exports of the trained parameters (see
//! [`loader::ArtifactLoader`] for the expected directory layout).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod loader;
pub mod model;
pub mod preprocess;
pub mod vectorizer;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::Engine;
pub use loader::{ArtifactInventory, ArtifactLoader, LoadedArtifacts};
pub use model::RegressionModel;
pub use vectorizer::TfidfVectorizer;
