//! Dashboard request: ticker, date range and indicator selection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Indicator the user can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// 20-period simple moving average
    Sma20,
    /// 20-period exponential moving average
    Ema20,
    /// 14-period relative strength index
    Rsi14,
    /// MACD (12, 26, 9) with signal line
    Macd,
}

impl IndicatorKind {
    /// Selection label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorKind::Sma20 => "SMA (20)",
            IndicatorKind::Ema20 => "EMA (20)",
            IndicatorKind::Rsi14 => "RSI",
            IndicatorKind::Macd => "MACD",
        }
    }

    /// Selection used when the user picks nothing.
    pub fn defaults() -> BTreeSet<IndicatorKind> {
        [IndicatorKind::Sma20, IndicatorKind::Rsi14].into_iter().collect()
    }

    /// Get all selectable indicators.
    pub fn all() -> &'static [IndicatorKind] {
        &[
            IndicatorKind::Sma20,
            IndicatorKind::Ema20,
            IndicatorKind::Rsi14,
            IndicatorKind::Macd,
        ]
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "sma" | "sma20" => Ok(IndicatorKind::Sma20),
            "ema" | "ema20" => Ok(IndicatorKind::Ema20),
            "rsi" | "rsi14" => Ok(IndicatorKind::Rsi14),
            "macd" => Ok(IndicatorKind::Macd),
            _ => Err(format!("Unknown indicator: {}", s)),
        }
    }
}

/// Cache key for a fetched price series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceKey {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Everything a dashboard render depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    /// Uppercased ticker symbol
    pub ticker: String,
    /// First day of the range (inclusive)
    pub start: NaiveDate,
    /// Last day of the range (inclusive)
    pub end: NaiveDate,
    /// Requested indicators
    pub indicators: BTreeSet<IndicatorKind>,
}

impl DashboardRequest {
    /// Create a validated request.
    ///
    /// The ticker is trimmed and uppercased. An empty ticker or a start date
    /// after the end date is rejected.
    pub fn new(
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        indicators: impl IntoIterator<Item = IndicatorKind>,
    ) -> Result<Self, DashboardError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(DashboardError::InvalidRequest(
                "Please select or enter a ticker symbol".into(),
            ));
        }
        if start > end {
            return Err(DashboardError::InvalidRequest(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        Ok(Self {
            ticker,
            start,
            end,
            indicators: indicators.into_iter().collect(),
        })
    }

    /// Check whether an indicator was requested.
    pub fn wants(&self, kind: IndicatorKind) -> bool {
        self.indicators.contains(&kind)
    }

    /// Key under which the price series is cached.
    pub fn price_key(&self) -> PriceKey {
        PriceKey {
            ticker: self.ticker.clone(),
            start: self.start,
            end: self.end,
        }
    }
}
