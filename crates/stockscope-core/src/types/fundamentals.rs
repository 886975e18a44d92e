//! Fundamental ratio snapshot.

use serde::{Deserialize, Serialize};

/// Fundamental fields reported for a ticker.
///
/// Providers omit fields freely, so every value is optional. Field names
/// serialize in the provider's camelCase spelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalsSnapshot {
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub price_to_book: Option<f64>,
    pub market_cap: Option<f64>,
}

impl FundamentalsSnapshot {
    /// Check if no field is present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
