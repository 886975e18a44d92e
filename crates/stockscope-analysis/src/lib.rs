//! Dashboard pipeline.
//!
//! Turns a [`DashboardRequest`](stockscope_core::DashboardRequest) into a
//! [`DashboardReport`]: validated prices, aligned indicators, signal
//! insights, key metrics, formatted fundamentals and scored headlines.
//! Rendering the report is left to the caller.

pub mod fundamentals;
pub mod metrics;
pub mod news;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod signals;

pub use fundamentals::{format_currency, FundamentalsSection, FundamentalsSummary};
pub use metrics::KeyMetrics;
pub use news::{NewsAnalyzer, NewsSection, ScoredHeadline};
pub use pipeline::{DashboardService, PipelineOptions};
pub use report::{DashboardReport, RawRow};
pub use sentiment::{LexiconScorer, SentimentLabel};
pub use signals::{Insight, MacdSignal, RsiSignal, RsiThresholds, SignalInterpreter, Tone};
