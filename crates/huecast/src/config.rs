//! Configuration management for the huecast CLI.
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Command-line arguments
//! 2. Environment variables (HUECAST_*)
//! 3. Config file (~/.config/huecast/config.toml)
//! 4. Default values

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default artifacts directory when --artifacts is not specified.
    #[serde(default)]
    pub artifacts_dir: Option<String>,

    /// Default model kind when --model is not specified.
    #[serde(default)]
    pub default_model: Option<String>,

    /// Server host.
    #[serde(default = "default_host")]
    pub server_host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub server_port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifacts_dir: None,
            default_model: None,
            server_host: default_host(),
            server_port: default_port(),
        }
    }
}

impl Config {
    /// Loads configuration from all sources.
    ///
    /// Reports warnings for configuration errors but falls back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("HUECAST_"));

        match figment.extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("\x1b[33mWarning:\x1b[0m Configuration error, using defaults");
                eprintln!("  Config file: {}", config_path.display());
                eprintln!("  Error: {}", e);
                eprintln!();
                eprintln!("  To fix, edit or delete the config file:");
                eprintln!("    rm {}", config_path.display());
                eprintln!();
                Config::default()
            }
        }
    }

    /// Returns the path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("huecast")
            .join("config.toml")
    }

    /// Returns the path to the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("huecast")
    }

    /// Saves the current configuration to the config file.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_dir = Self::config_dir();
        std::fs::create_dir_all(&config_dir)?;

        let config_path = Self::config_path();
        let toml_str = toml::to_string_pretty(self).map_err(std::io::Error::other)?;

        std::fs::write(&config_path, toml_str)?;
        Ok(())
    }

    /// Sets the artifacts directory and saves.
    pub fn set_artifacts_dir(&mut self, dir: &str) -> Result<(), std::io::Error> {
        self.artifacts_dir = Some(dir.to_string());
        self.save()
    }

    /// Clears the artifacts directory and saves.
    pub fn clear_artifacts_dir(&mut self) -> Result<(), std::io::Error> {
        self.artifacts_dir = None;
        self.save()
    }
}

/// Prints the current configuration and its sources.
pub fn show_config() {
    let config = Config::load();
    let config_path = Config::config_path();

    println!("Huecast Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());
    if config_path.exists() {
        println!("Status: Found\n");
    } else {
        println!("Status: Not found (using defaults)\n");
    }

    println!("Current settings:");
    println!(
        "  artifacts_dir: {}",
        config.artifacts_dir.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  default_model: {}",
        config.default_model.as_deref().unwrap_or("(not set)")
    );
    println!("  server_host: {}", config.server_host);
    println!("  server_port: {}", config.server_port);

    println!("\nEnvironment variables:");
    println!("  HUECAST_ARTIFACTS_DIR");
    println!("  HUECAST_DEFAULT_MODEL");
    println!("  HUECAST_SERVER_HOST");
    println!("  HUECAST_SERVER_PORT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.artifacts_dir, None);
        assert_eq!(config.default_model, None);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = Config {
            artifacts_dir: Some("/srv/huecast".to_string()),
            default_model: Some("ridge".to_string()),
            ..Config::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.artifacts_dir.as_deref(), Some("/srv/huecast"));
        assert_eq!(back.default_model.as_deref(), Some("ridge"));
    }
}
