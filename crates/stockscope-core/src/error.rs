//! Error types for the dashboard pipeline.

use thiserror::Error;

/// Top-level dashboard error.
///
/// `MissingData`, `InvalidData`, `NoDataInRange` and `InvalidRequest` halt a
/// render. The remaining variants are contained by the section that raised
/// them.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("'{column}' column not found in data")]
    MissingData { column: String },

    #[error("Invalid or missing {column} price data: {reason}")]
    InvalidData { column: String, reason: String },

    #[error("No price data for {ticker} in the requested range")]
    NoDataInRange { ticker: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("News error: {0}")]
    News(#[from] NewsError),
}

/// Data provider errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// News block errors. Either cause degrades the whole block.
#[derive(Error, Debug)]
pub enum NewsError {
    #[error("news provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("sentiment scoring failed: {0}")]
    ScoringFailed(String),
}

impl From<DataError> for NewsError {
    fn from(err: DataError) -> Self {
        NewsError::ProviderUnavailable(err.to_string())
    }
}

/// Result type alias for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;
