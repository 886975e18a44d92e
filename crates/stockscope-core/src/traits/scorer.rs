//! Sentiment scorer trait.

use crate::error::NewsError;

/// Assigns a polarity in `[-1, 1]` to a piece of text.
///
/// Negative values read as bearish, positive as bullish.
pub trait PolarityScorer: Send + Sync {
    /// Score a single text.
    fn score(&self, text: &str) -> Result<f64, NewsError>;

    /// Get the scorer name.
    fn name(&self) -> &str;
}
