//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use stockscope_config::{AppConfig, ConfigError};

pub async fn run(config_path: &Path, config: Result<AppConfig, ConfigError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match config {
        Ok(config) => {
            let d = &config.dashboard;
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Default range: {} to {}", d.default_start, d.default_end);
            println!("RSI bounds: {} / {}", d.rsi_oversold, d.rsi_overbought);
            println!("Sentiment threshold: {}", d.sentiment_threshold);
            println!("News limit: {}", d.news_limit);
            println!();
            println!("Effective configuration:");
            println!("{}", config.to_toml()?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
