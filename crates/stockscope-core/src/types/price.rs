//! Daily price data: the raw provider table and the validated bar series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Named numeric column of a price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    /// Column header as providers spell it.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::Volume => "Volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            "volume" => Ok(PriceField::Volume),
            _ => Err(format!("Unknown price column: {}", s)),
        }
    }
}

/// Coerce a raw cell to a number.
///
/// Anything that does not parse to a finite float becomes `None`.
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Raw provider response before validation.
///
/// Every column is optional and every cell may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceTable {
    /// Ticker the table was fetched for
    pub ticker: String,
    dates: Vec<NaiveDate>,
    columns: BTreeMap<PriceField, Vec<Option<f64>>>,
}

impl PriceTable {
    /// Create a table with a date index and no columns.
    pub fn new(ticker: impl Into<String>, dates: Vec<NaiveDate>) -> Self {
        Self {
            ticker: ticker.into(),
            dates,
            columns: BTreeMap::new(),
        }
    }

    /// Attach a column. Its length must match the date index.
    pub fn insert_column(
        &mut self,
        field: PriceField,
        values: Vec<Option<f64>>,
    ) -> Result<(), DashboardError> {
        if values.len() != self.dates.len() {
            return Err(DashboardError::InvalidData {
                column: field.to_string(),
                reason: format!(
                    "column has {} rows but the date index has {}",
                    values.len(),
                    self.dates.len()
                ),
            });
        }
        self.columns.insert(field, values);
        Ok(())
    }

    /// Builder form of [`insert_column`](Self::insert_column).
    pub fn with_column(
        mut self,
        field: PriceField,
        values: Vec<Option<f64>>,
    ) -> Result<Self, DashboardError> {
        self.insert_column(field, values)?;
        Ok(self)
    }

    /// Get a column if the provider supplied it.
    pub fn column(&self, field: PriceField) -> Option<&[Option<f64>]> {
        self.columns.get(&field).map(|v| v.as_slice())
    }

    /// Check whether a column is present.
    pub fn has_column(&self, field: PriceField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Date index.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    fn cell(&self, field: PriceField, row: usize) -> Option<f64> {
        self.columns
            .get(&field)
            .and_then(|col| col.get(row).copied().flatten())
    }
}

/// One validated trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: Option<f64>,
    /// Highest price
    pub high: Option<f64>,
    /// Lowest price
    pub low: Option<f64>,
    /// Closing price, always finite
    pub close: f64,
    /// Trading volume
    pub volume: Option<f64>,
}

impl PriceBar {
    /// Create a bar with a full OHLCV row.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close,
            volume: Some(volume),
        }
    }

    /// Create a bar that only carries a close.
    pub fn close_only(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// High of the bar, falling back to the close.
    #[inline]
    pub fn high_or_close(&self) -> f64 {
        self.high.unwrap_or(self.close)
    }

    /// Low of the bar, falling back to the close.
    #[inline]
    pub fn low_or_close(&self) -> f64 {
        self.low.unwrap_or(self.close)
    }
}

/// Validated daily series: dates strictly increasing, closes finite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Ticker symbol
    pub ticker: String,
    bars: Vec<PriceBar>,
    /// Rows dropped because their close was empty or non-numeric
    skipped_rows: usize,
    /// Rows dropped because a later row carried the same date
    duplicate_rows: usize,
}

impl PriceSeries {
    /// Validate a provider table into a series.
    ///
    /// Fails with `MissingData` when there is no Close column,
    /// `NoDataInRange` when the table has no rows and `InvalidData` when no
    /// close coerces to a number. Rows with an empty close are dropped and
    /// duplicate dates keep the last row.
    pub fn from_table(table: &PriceTable) -> Result<Self, DashboardError> {
        let Some(closes) = table.column(PriceField::Close) else {
            return Err(DashboardError::MissingData {
                column: PriceField::Close.to_string(),
            });
        };

        if table.is_empty() {
            return Err(DashboardError::NoDataInRange {
                ticker: table.ticker.clone(),
            });
        }

        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());

        let mut bars: Vec<PriceBar> = table
            .dates()
            .iter()
            .zip(closes.iter())
            .enumerate()
            .filter_map(|(row, (&date, &close))| {
                finite(close).map(|close| PriceBar {
                    date,
                    open: finite(table.cell(PriceField::Open, row)),
                    high: finite(table.cell(PriceField::High, row)),
                    low: finite(table.cell(PriceField::Low, row)),
                    close,
                    volume: finite(table.cell(PriceField::Volume, row)),
                })
            })
            .collect();

        if bars.is_empty() {
            return Err(DashboardError::InvalidData {
                column: PriceField::Close.to_string(),
                reason: "all closing prices are empty or non-numeric".into(),
            });
        }

        let skipped_rows = table.len() - bars.len();

        // Stable sort keeps provider order within a date, so the last
        // duplicate wins after dedup.
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        let mut duplicate_rows = 0;
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => {
                    *last = bar;
                    duplicate_rows += 1;
                }
                _ => deduped.push(bar),
            }
        }

        Ok(Self {
            ticker: table.ticker.clone(),
            bars: deduped,
            skipped_rows,
            duplicate_rows,
        })
    }

    /// Build a series from bars already in date order.
    pub fn from_bars(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            ticker: ticker.into(),
            bars,
            skipped_rows: 0,
            duplicate_rows: 0,
        }
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Rows dropped for an empty or non-numeric close.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Rows dropped because their date repeated.
    pub fn duplicate_rows(&self) -> usize {
        self.duplicate_rows
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Index of the first of the last `n` bars.
    pub fn tail_start(&self, n: usize) -> usize {
        self.bars.len().saturating_sub(n)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract dates as a vector.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Highest high over the whole series.
    pub fn period_high(&self) -> Option<f64> {
        self.bars
            .iter()
            .map(PriceBar::high_or_close)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }

    /// Lowest low over the whole series.
    pub fn period_low(&self) -> Option<f64> {
        self.bars
            .iter()
            .map(PriceBar::low_or_close)
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
    }
}
