//! Core data types for the dashboard.

mod fundamentals;
mod news;
mod price;
mod request;

pub use fundamentals::FundamentalsSnapshot;
pub use news::NewsHeadline;
pub use price::{coerce_numeric, PriceBar, PriceField, PriceSeries, PriceTable};
pub use request::{DashboardRequest, IndicatorKind, PriceKey};
