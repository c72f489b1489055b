// Quill AI Coding Assistant
// Main entry point for the quill binary

use clap::Parser;
use quill_engine::cli::{Cli, Command};
use quill_engine::config::Config;
use quill_engine::handlers::{handle_ask, handle_chat, handle_key, handle_structure};
use quill_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // CLI flag wins over config-driven log level
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    tracing::info!("Quill v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Ask { message, project } => {
            tracing::info!("Sending one-shot message");
            handle_ask(message, project, &config).await
        }

        Command::Chat { project } => {
            tracing::info!("Starting chat session");
            handle_chat(project, &config).await
        }

        Command::Structure { project } => handle_structure(project, &config),

        Command::Key { action } => handle_key(action),
    }
}
