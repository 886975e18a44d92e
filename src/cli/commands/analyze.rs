//! Analyze command implementation.

use anyhow::{Context, Result};
use std::sync::Arc;
use stockscope_analysis::{DashboardService, LexiconScorer, PipelineOptions, RsiThresholds};
use stockscope_config::{AppConfig, DashboardSettings, ProviderSettings};
use stockscope_core::traits::MarketDataProvider;
use stockscope_core::types::DashboardRequest;
use stockscope_data::{CsvDataSource, YahooClient, YahooConfig};
use tracing::{debug, info, warn};

use crate::cli::{AnalyzeArgs, OutputFormat};

pub async fn run(args: AnalyzeArgs, config: AppConfig) -> Result<()> {
    let request = build_request(&args, &config.dashboard)?;
    info!("Analyzing {} from {} to {}", request.ticker, request.start, request.end);

    let options = pipeline_options(&config.dashboard);
    let scorer = Arc::new(LexiconScorer::new());

    let mut service = if args.offline {
        let source = csv_source(&args)?;
        DashboardService::new(source, scorer, options)
    } else {
        let yahoo = Arc::new(YahooClient::new(yahoo_config(&config.provider))?);
        let market: Arc<dyn MarketDataProvider> = match &args.data {
            Some(_) => csv_source(&args)?,
            None => yahoo.clone(),
        };
        DashboardService::new(market, scorer, options)
            .with_fundamentals(yahoo.clone())
            .with_news(yahoo)
    };

    let report = service.build(&request).await?;
    debug!(
        hits = service.cache().hits(),
        misses = service.cache().misses(),
        "Price cache"
    );
    for warning in &report.warnings {
        warn!("{}", warning);
    }

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        let json = report.to_json()?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    if let Some(raw_path) = &args.save_raw {
        let file = std::fs::File::create(raw_path)
            .with_context(|| format!("Failed to create {}", raw_path.display()))?;
        report.write_raw_csv(file)?;
        info!("Raw data saved to {:?}", raw_path);
    }

    Ok(())
}

/// Resolve the ticker and fill unset options from the dashboard defaults.
fn build_request(args: &AnalyzeArgs, dashboard: &DashboardSettings) -> Result<DashboardRequest> {
    let ticker = match &args.popular {
        Some(choice) => dashboard
            .popular_tickers
            .iter()
            .find(|t| t.eq_ignore_ascii_case(choice.trim()))
            .cloned()
            .with_context(|| {
                format!(
                    "'{}' is not a popular ticker (choose from {})",
                    choice,
                    dashboard.popular_tickers.join(", ")
                )
            })?,
        None => args.ticker.clone().unwrap_or_default(),
    };

    let indicators = if args.indicators.is_empty() {
        dashboard.default_indicators.clone()
    } else {
        args.indicators.clone()
    };

    Ok(DashboardRequest::new(
        &ticker,
        args.start.unwrap_or(dashboard.default_start),
        args.end.unwrap_or(dashboard.default_end),
        indicators,
    )?)
}

fn pipeline_options(dashboard: &DashboardSettings) -> PipelineOptions {
    PipelineOptions {
        rsi: RsiThresholds {
            overbought: dashboard.rsi_overbought,
            oversold: dashboard.rsi_oversold,
        },
        sentiment_threshold: dashboard.sentiment_threshold,
        news_limit: dashboard.news_limit,
        raw_rows: dashboard.raw_rows,
    }
}

fn yahoo_config(provider: &ProviderSettings) -> YahooConfig {
    YahooConfig {
        chart_url: provider.chart_url.clone(),
        summary_url: provider.summary_url.clone(),
        search_url: provider.search_url.clone(),
        cookie_url: provider.cookie_url.clone(),
        crumb_url: provider.crumb_url.clone(),
        user_agent: provider.user_agent.clone(),
        timeout_secs: provider.timeout_secs,
        news_count: provider.news_count,
    }
}

fn csv_source(args: &AnalyzeArgs) -> Result<Arc<dyn MarketDataProvider>> {
    let Some(data_path) = &args.data else {
        anyhow::bail!("Please provide a data file with --data (e.g. --data ./data/AAPL.csv)");
    };
    let source = CsvDataSource::new(data_path)
        .with_context(|| format!("Cannot read data file '{}'", data_path.display()))?;
    Ok(Arc::new(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use chrono::NaiveDate;
    use clap::Parser;
    use stockscope_core::types::IndicatorKind;

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        let cli = Cli::parse_from(
            ["stockscope", "analyze"]
                .iter()
                .chain(argv.iter())
                .copied(),
        );
        match cli.command {
            Commands::Analyze(args) => args,
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_defaults_fill_request() {
        let args = analyze_args(&["--ticker", " msft "]);
        let request = build_request(&args, &DashboardSettings::default()).unwrap();

        assert_eq!(request.ticker, "MSFT");
        assert_eq!(request.start, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(request.end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(request.indicators, IndicatorKind::defaults());
    }

    #[test]
    fn test_popular_takes_precedence() {
        let args = analyze_args(&["--ticker", "IBM", "--popular", "infy.ns", "-i", "macd,ema"]);
        let request = build_request(&args, &DashboardSettings::default()).unwrap();

        assert_eq!(request.ticker, "INFY.NS");
        assert!(request.wants(IndicatorKind::Macd));
        assert!(request.wants(IndicatorKind::Ema20));
        assert!(!request.wants(IndicatorKind::Sma20));
    }

    #[test]
    fn test_unknown_popular_rejected() {
        let args = analyze_args(&["--popular", "IBM"]);
        assert!(build_request(&args, &DashboardSettings::default()).is_err());
    }

    #[test]
    fn test_missing_ticker_rejected() {
        let args = analyze_args(&[]);
        assert!(build_request(&args, &DashboardSettings::default()).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let args = analyze_args(&["-t", "AAPL", "--start", "2024-02-01", "--end", "2024-01-01"]);
        assert!(build_request(&args, &DashboardSettings::default()).is_err());
    }
}
