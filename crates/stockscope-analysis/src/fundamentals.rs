//! Fundamental ratio formatting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockscope_core::types::FundamentalsSnapshot;

/// Shown in place of a missing field.
pub const PLACEHOLDER: &str = "N/A";

/// Six display-ready fundamental fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundamentalsSummary {
    pub pe_ratio: String,
    pub eps: String,
    pub roe: String,
    pub debt_to_equity: String,
    pub pb_ratio: String,
    pub market_cap: String,
}

impl FundamentalsSummary {
    /// Format a snapshot. Never fails; absent fields get the placeholder and
    /// an absent market cap counts as zero.
    pub fn from_snapshot(snapshot: &FundamentalsSnapshot) -> Self {
        Self {
            pe_ratio: format_ratio(snapshot.trailing_pe),
            eps: format_ratio(snapshot.trailing_eps),
            roe: format_roe(snapshot.return_on_equity),
            debt_to_equity: format_ratio(snapshot.debt_to_equity),
            pb_ratio: format_ratio(snapshot.price_to_book),
            market_cap: format_currency(snapshot.market_cap.unwrap_or(0.0)),
        }
    }

    /// Label/value pairs in display order, three per row.
    pub fn rows(&self) -> [(&'static str, &str); 6] {
        [
            ("P/E Ratio", self.pe_ratio.as_str()),
            ("EPS (TTM)", self.eps.as_str()),
            ("ROE", self.roe.as_str()),
            ("Debt/Equity", self.debt_to_equity.as_str()),
            ("P/B Ratio", self.pb_ratio.as_str()),
            ("Market Cap", self.market_cap.as_str()),
        ]
    }
}

/// Fundamentals block of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FundamentalsSection {
    Available(FundamentalsSummary),
    Unavailable { reason: String },
}

/// Render a ratio as-is. Whole numbers keep one decimal place.
fn format_ratio(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e16 => format!("{:.1}", v),
        Some(v) => v.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Render a return-on-equity fraction as a percentage. Zero reads as absent.
fn format_roe(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite() && *v != 0.0) {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => PLACEHOLDER.to_string(),
    }
}

/// Render an amount as whole dollars with thousands separators.
///
/// Halves round to even.
pub fn format_currency(value: f64) -> String {
    let digits = match Decimal::from_f64_retain(value) {
        Some(d) => d.round_dp(0).abs().trunc().to_string(),
        None if value.is_finite() => format!("{:.0}", value.abs()),
        None => return PLACEHOLDER.to_string(),
    };

    if digits.chars().all(|c| c == '0') {
        return "$0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("${}{}", sign, group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
