//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use stockscope_core::types::IndicatorKind;

#[derive(Parser)]
#[command(name = "stockscope")]
#[command(author, version, about = "Stock analysis dashboard: indicators, fundamentals and news sentiment")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (defaults to logging.level from the configuration)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the dashboard report for a ticker
    Analyze(AnalyzeArgs),
    /// List the popular ticker shortcuts
    Popular,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Ticker symbol to analyze
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Popular ticker shortcut; takes precedence over --ticker
    #[arg(short, long)]
    pub popular: Option<String>,

    /// Start date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Indicators to compute (comma-separated: sma20, ema20, rsi, macd)
    #[arg(short, long, value_delimiter = ',')]
    pub indicators: Vec<IndicatorKind>,

    /// Price data file (CSV) instead of the network provider
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Skip the network entirely; fundamentals and news are unavailable
    #[arg(long, requires = "data")]
    pub offline: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Save the raw data table as CSV
    #[arg(long)]
    pub save_raw: Option<PathBuf>,
}
