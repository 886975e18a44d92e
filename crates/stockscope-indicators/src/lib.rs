//! Technical indicators for the stock dashboard.
//!
//! This crate provides:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD with signal line)
//! - The indicator engine, which runs the requested indicators over a
//!   price series and aligns every output to the series' date index

pub mod engine;
pub mod momentum;
pub mod moving_average;

pub use engine::{IndicatorEngine, IndicatorSet, IndicatorWarning, SeriesKey};
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma};
