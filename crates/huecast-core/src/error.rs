//! Error types for the huecast service.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the huecast service.
#[derive(Error, Debug)]
pub enum Error {
    /// A required artifact file was not found on disk.
    #[error("Missing artifact file: {}", path.display())]
    ArtifactNotFound {
        /// Path that was expected to exist.
        path: PathBuf,
    },

    /// An artifact file could not be parsed.
    #[error("Invalid artifact {}: {message}", path.display())]
    InvalidArtifact {
        /// Path of the offending file.
        path: PathBuf,
        /// Description of the parse or validation failure.
        message: String,
    },

    /// The requested model kind is not loaded.
    #[error("Unsupported model '{kind}'")]
    UnknownModel {
        /// The requested model kind.
        kind: String,
    },

    /// No model artifacts were found in the artifacts directory.
    #[error("No model artifacts found in {}", dir.display())]
    NoModels {
        /// The directory that was scanned.
        dir: PathBuf,
    },

    /// The input text was empty or reduced to nothing.
    #[error("Missing 'text'")]
    EmptyInput,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Returns `true` if this error is caused by the client's request
    /// rather than the server's state.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownModel { .. } | Self::EmptyInput)
    }

    /// Creates an invalid-artifact error for the given path.
    #[must_use]
    pub fn invalid_artifact(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown-model error.
    #[must_use]
    pub fn unknown_model(kind: impl Into<String>) -> Self {
        Self::UnknownModel { kind: kind.into() }
    }

    /// Creates an internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
