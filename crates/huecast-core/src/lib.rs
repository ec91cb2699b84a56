//! # Huecast Core
//!
//! Core types shared across the huecast color prediction service:
//! - Common error types
//! - The [`Rgb`] color triple and its formatting
//! - Request/response structures for the predict pipeline
//! - Model kind identifiers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod color;
pub mod error;
pub mod request;
pub mod response;
pub mod types;

pub use color::Rgb;
pub use error::{Error, Result};
pub use request::PredictRequest;
pub use response::Prediction;
pub use types::{ModelKind, RequestId};
