//! Stock dashboard CLI application.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;
use std::path::Path;
use stockscope_config::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config);

    // Setup logging
    let settings = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let log_level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or(settings.level);
    let json = cli.json_logs || settings.format == "json";
    let _guard = setup_logging(&log_level, json, settings.file.as_deref().map(Path::new))?;

    // Execute command
    match cli.command {
        Commands::Analyze(args) => {
            let config = config.with_context(|| format!("Failed to load {:?}", cli.config))?;
            cli::commands::analyze::run(args, config).await
        }
        Commands::Popular => {
            let config = config.with_context(|| format!("Failed to load {:?}", cli.config))?;
            cli::commands::popular::run(&config).await
        }
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, config).await,
    }
}
