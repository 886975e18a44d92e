//! Core types and traits for the stock dashboard.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PriceTable, PriceBar, PriceSeries)
//! - The dashboard request and indicator selection
//! - Fundamentals and news headline types
//! - Core traits for indicators, data providers and sentiment scorers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DashboardError, DashboardResult};
pub use traits::*;
pub use types::*;
