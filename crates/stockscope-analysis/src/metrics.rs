//! Headline price metrics.

use serde::{Deserialize, Serialize};
use stockscope_core::types::PriceSeries;

/// Latest close and the period's extremes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub latest_close: f64,
    pub period_high: f64,
    pub period_low: f64,
}

impl KeyMetrics {
    /// Compute metrics for a non-empty series.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        Some(Self {
            latest_close: series.last()?.close,
            period_high: series.period_high()?,
            period_low: series.period_low()?,
        })
    }

    /// Label/value pairs formatted as dollars.
    pub fn rows(&self) -> [(&'static str, String); 3] {
        [
            ("Latest Close", format_price(self.latest_close)),
            ("Period High", format_price(self.period_high)),
            ("Period Low", format_price(self.period_low)),
        ]
    }
}

/// Format a price as `$x.xx`.
pub fn format_price(value: f64) -> String {
    format!("${:.2}", value)
}
