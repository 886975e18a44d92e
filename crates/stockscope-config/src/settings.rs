//! Configuration structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stockscope_core::types::IndicatorKind;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

impl AppConfig {
    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.dashboard;
        if d.rsi_overbought <= d.rsi_oversold {
            return Err(ConfigError::Invalid(
                "rsi_overbought must be greater than rsi_oversold".into(),
            ));
        }
        if d.rsi_overbought > 100.0 || d.rsi_oversold < 0.0 {
            return Err(ConfigError::Invalid(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        if !(0.0..1.0).contains(&d.sentiment_threshold) {
            return Err(ConfigError::Invalid(
                "sentiment_threshold must be in [0, 1)".into(),
            ));
        }
        if d.news_limit == 0 {
            return Err(ConfigError::Invalid("news_limit must be at least 1".into()));
        }
        if d.default_start > d.default_end {
            return Err(ConfigError::Invalid(
                "default_start must not be after default_end".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "unknown log format '{}', expected pretty or json",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "stockscope".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Also write logs to this file
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Market data / fundamentals / news endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub chart_url: String,
    pub summary_url: String,
    pub search_url: String,
    /// Visited once to obtain the session cookie
    pub cookie_url: String,
    /// Returns the crumb quote-summary requests must carry
    pub crumb_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub news_count: usize,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            summary_url: "https://query2.finance.yahoo.com/v10/finance/quoteSummary".to_string(),
            search_url: "https://query1.finance.yahoo.com/v1/finance/search".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            crumb_url: "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string(),
            user_agent: "Mozilla/5.0 (compatible; stockscope/0.1)".to_string(),
            timeout_secs: 30,
            news_count: 10,
        }
    }
}

/// Dashboard defaults and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
    pub default_indicators: Vec<IndicatorKind>,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub sentiment_threshold: f64,
    pub news_limit: usize,
    pub raw_rows: usize,
    pub popular_tickers: Vec<String>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            default_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            default_indicators: IndicatorKind::defaults().into_iter().collect(),
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            sentiment_threshold: 0.1,
            news_limit: 5,
            raw_rows: 100,
            popular_tickers: ["AAPL", "MSFT", "GOOGL", "TSLA", "INFY.NS", "TCS.NS"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dashboard.news_limit, 5);
        assert_eq!(
            config.dashboard.default_indicators,
            vec![IndicatorKind::Sma20, IndicatorKind::Rsi14]
        );
    }

    #[test]
    fn test_inverted_rsi_thresholds_rejected() {
        let mut config = AppConfig::default();
        config.dashboard.rsi_overbought = 30.0;
        config.dashboard.rsi_oversold = 70.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rsi_thresholds_outside_range_rejected() {
        let mut config = AppConfig::default();
        config.dashboard.rsi_overbought = 120.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.dashboard.rsi_oversold = -5.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_sentiment_threshold_outside_unit_interval_rejected() {
        let mut config = AppConfig::default();
        config.dashboard.sentiment_threshold = -0.1;
        assert!(config.validate().is_err());

        config.dashboard.sentiment_threshold = 1.0;
        assert!(config.validate().is_err());

        config.dashboard.sentiment_threshold = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_news_limit_rejected() {
        let mut config = AppConfig::default();
        config.dashboard.news_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [dashboard]
            rsi_overbought = 80.0
            default_indicators = ["macd", "ema20"]
            "#,
        )
        .unwrap();

        assert_eq!(config.dashboard.rsi_overbought, 80.0);
        assert_eq!(config.dashboard.rsi_oversold, 30.0);
        assert_eq!(
            config.dashboard.default_indicators,
            vec![IndicatorKind::Macd, IndicatorKind::Ema20]
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.dashboard.popular_tickers, config.dashboard.popular_tickers);
        assert_eq!(parsed.dashboard.default_start, config.dashboard.default_start);
    }
}
