//! # Huecast Server
//!
//! HTTP server exposing the color prediction engine over a small JSON API.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod server;

pub use server::{AppState, Server, ServerConfig, ServerConfigBuilder};
