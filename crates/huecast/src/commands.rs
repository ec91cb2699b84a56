//! CLI command implementations.

use std::io::{self, Write};

use color_eyre::eyre::{eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};

use huecast_core::{ModelKind, PredictRequest};
use huecast_engine::{ArtifactLoader, Engine, EngineConfig};

/// Start the prediction server.
pub async fn serve(
    host: String,
    port: u16,
    artifacts: Option<String>,
    default_model: Option<String>,
) -> Result<()> {
    use huecast_server::{Server, ServerConfig};

    tracing::info!("Starting huecast server...");

    let addr = format!("{}:{}", host, port).parse()?;
    let mut builder = ServerConfig::builder().addr(addr).cors(true);
    if let Some(dir) = artifacts {
        builder = builder.artifacts_dir(dir);
    }
    if let Some(name) = default_model {
        builder = builder.default_model(name.parse::<ModelKind>()?);
    }

    let server = Server::new(builder.build());
    server.run().await?;

    Ok(())
}

/// Predict a color from a text prompt and print the result as JSON.
pub fn predict(text: Vec<String>, model: Option<String>, artifacts: Option<String>) -> Result<()> {
    let mut user_text = text.join(" ").trim().to_string();

    // If nothing was provided on the CLI, ask interactively instead of
    // erroring.
    if user_text.is_empty() {
        print!("Enter how you feel right now: ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        user_text = line.trim().to_string();
    }

    if user_text.is_empty() {
        return Err(eyre!(
            "Please provide a text prompt, e.g. huecast predict \"calm ocean\""
        ));
    }

    let kind = model.map(|name| name.parse::<ModelKind>()).transpose()?;

    // Show loading indicator
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("Loading artifacts...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut builder = EngineConfig::builder();
    if let Some(dir) = artifacts {
        builder = builder.artifacts_dir(dir);
    }
    if let Some(kind) = kind {
        builder = builder.default_model(kind);
    }

    let engine = Engine::new(builder.build())?;
    spinner.finish_and_clear();

    let mut request = PredictRequest::new(user_text);
    request.model = kind;

    let prediction = engine.predict(&request)?;
    println!("{}", serde_json::to_string_pretty(&prediction)?);

    Ok(())
}

/// List artifact files in the artifacts directory.
pub fn artifacts_list(artifacts: Option<String>) {
    let loader = match artifacts {
        Some(dir) => ArtifactLoader::new(dir),
        None => ArtifactLoader::new(ArtifactLoader::default_dir()),
    };

    let inventory = loader.scan();

    println!("Artifacts in {}:\n", inventory.dir.display());

    if inventory.vectorizer {
        println!("  vectorizer.json");
    }
    for kind in &inventory.models {
        println!("  {}", kind.artifact_name());
    }

    if !inventory.vectorizer && inventory.models.is_empty() {
        println!("  (No artifacts found)");
    }

    if !inventory.is_complete() {
        println!("\nA working setup needs vectorizer.json and at least one model file");
        println!("(svm.json, ridge.json, or random_forest.json).");
    }
}

/// Show details of the loaded artifacts.
pub fn artifacts_info(artifacts: Option<String>) -> Result<()> {
    let mut builder = EngineConfig::builder();
    if let Some(dir) = &artifacts {
        builder = builder.artifacts_dir(dir);
    }
    let config = builder.build();

    println!("Artifacts directory: {}\n", config.artifacts_dir.display());

    let engine = Engine::new(config)?;

    println!("Models:");
    for kind in engine.loaded_kinds() {
        if kind == engine.default_kind() {
            println!("  {} (default)", kind);
        } else {
            println!("  {}", kind);
        }
    }

    Ok(())
}

/// Display version information.
pub fn version() {
    println!("huecast {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Components:");
    println!("  huecast-core    - Shared types and colors");
    println!("  huecast-engine  - Artifact loading and inference");
    println!("  huecast-server  - HTTP API");
}
