//! Data provider trait definitions.

use crate::error::DataError;
use crate::types::{FundamentalsSnapshot, NewsHeadline, PriceTable};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for historical daily price sources.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch daily bars.
    ///
    /// # Arguments
    /// * `ticker` - The symbol to fetch
    /// * `start` - First day of the range (inclusive)
    /// * `end` - Last day of the range (inclusive)
    ///
    /// # Returns
    /// The raw table as the provider sent it. Columns may be missing and
    /// cells may be empty; validation happens downstream.
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Trait for fundamental ratio sources.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    /// Fetch the current fundamentals snapshot. Any field may be absent.
    async fn fetch_info(&self, ticker: &str) -> Result<FundamentalsSnapshot, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Trait for news headline sources.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetch recent headlines, newest first.
    async fn fetch_news(&self, ticker: &str) -> Result<Vec<NewsHeadline>, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
