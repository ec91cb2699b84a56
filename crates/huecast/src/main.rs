//! # Huecast CLI
//!
//! The command-line interface for the huecast color prediction service.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod config;
mod telemetry;

#[derive(Parser)]
#[command(name = "huecast")]
#[command(version)]
#[command(about = "Predict an RGB color from free text", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the prediction server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Artifacts directory (vectorizer.json plus model files)
        #[arg(short, long)]
        artifacts: Option<String>,

        /// Model to use when requests do not specify one
        #[arg(short = 'm', long)]
        default_model: Option<String>,
    },

    /// Predict a color from a text prompt
    Predict {
        /// Words describing the color; prompts interactively when empty
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,

        /// Model to use (svm, ridge, random_forest)
        #[arg(short, long)]
        model: Option<String>,

        /// Artifacts directory
        #[arg(short, long)]
        artifacts: Option<String>,
    },

    /// Manage artifacts
    Artifacts {
        #[command(subcommand)]
        action: ArtifactsAction,
    },

    /// Display version and build info
    Version,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ArtifactsAction {
    /// List artifact files in the configured directory
    List {
        /// Artifacts directory to inspect
        #[arg(short, long)]
        artifacts: Option<String>,
    },

    /// Show details of the loaded artifacts
    Info {
        /// Artifacts directory to inspect
        #[arg(short, long)]
        artifacts: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set the default artifacts directory
    SetArtifacts {
        /// Directory containing vectorizer.json and model files
        dir: String,
    },

    /// Clear the default artifacts directory
    ClearArtifacts,

    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let telemetry_config = telemetry::TelemetryConfig::new("huecast")
        .with_log_level(&cli.log_level);

    let telemetry_config = if cli.json_logs {
        telemetry_config.with_json_logs()
    } else {
        telemetry_config
    };

    telemetry::init_logging(&telemetry_config);

    // Load configuration for default values
    let cfg = config::Config::load();

    match cli.command {
        Commands::Serve {
            host,
            port,
            artifacts,
            default_model,
        } => {
            let artifacts = artifacts.or(cfg.artifacts_dir.clone());
            let default_model = default_model.or(cfg.default_model.clone());
            commands::serve(host, port, artifacts, default_model).await?;
        }

        Commands::Predict {
            text,
            model,
            artifacts,
        } => {
            let artifacts = artifacts.or(cfg.artifacts_dir.clone());
            let model = model.or(cfg.default_model.clone());
            commands::predict(text, model, artifacts)?;
        }

        Commands::Artifacts { action } => match action {
            ArtifactsAction::List { artifacts } => {
                commands::artifacts_list(artifacts.or(cfg.artifacts_dir.clone()));
            }
            ArtifactsAction::Info { artifacts } => {
                commands::artifacts_info(artifacts.or(cfg.artifacts_dir.clone()))?;
            }
        },

        Commands::Version => {
            commands::version();
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config::show_config();
            }
            ConfigAction::SetArtifacts { dir } => {
                let mut cfg = config::Config::load();
                match cfg.set_artifacts_dir(&dir) {
                    Ok(()) => {
                        println!("Artifacts directory set to: {}", dir);
                        println!("Config saved to: {}", config::Config::config_path().display());
                    }
                    Err(e) => {
                        eprintln!("Failed to save config: {}", e);
                    }
                }
            }
            ConfigAction::ClearArtifacts => {
                let mut cfg = config::Config::load();
                match cfg.clear_artifacts_dir() {
                    Ok(()) => {
                        println!("Artifacts directory cleared.");
                    }
                    Err(e) => {
                        eprintln!("Failed to save config: {}", e);
                    }
                }
            }
            ConfigAction::Path => {
                println!("{}", config::Config::config_path().display());
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_accepts_default_model_flag() {
        let cli = Cli::try_parse_from([
            "huecast",
            "serve",
            "--artifacts",
            "/srv/huecast",
            "--default-model",
            "ridge",
        ])
        .unwrap();

        match cli.command {
            Commands::Serve {
                artifacts,
                default_model,
                ..
            } => {
                assert_eq!(artifacts.as_deref(), Some("/srv/huecast"));
                assert_eq!(default_model.as_deref(), Some("ridge"));
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_predict_joins_trailing_words() {
        let cli = Cli::try_parse_from(["huecast", "predict", "calm", "blue", "ocean"]).unwrap();

        match cli.command {
            Commands::Predict { text, model, .. } => {
                assert_eq!(text, vec!["calm", "blue", "ocean"]);
                assert_eq!(model, None);
            }
            _ => panic!("expected predict command"),
        }
    }
}
