//! Core traits for the dashboard.

mod indicator;
mod provider;
mod scorer;

pub use indicator::{Indicator, MultiOutputIndicator};
pub use provider::{FundamentalsProvider, MarketDataProvider, NewsProvider};
pub use scorer::PolarityScorer;
