//! Data providers for the stock dashboard.
//!
//! - [`CsvDataSource`]: offline daily prices from a CSV export
//! - [`YahooClient`]: prices, fundamentals and news over HTTP
//! - [`PriceCache`]: in-process cache of fetched price tables

mod cache;
mod csv_source;
mod yahoo;

pub use cache::PriceCache;
pub use csv_source::CsvDataSource;
pub use yahoo::{YahooClient, YahooConfig};
