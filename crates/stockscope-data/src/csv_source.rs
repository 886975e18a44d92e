//! CSV data source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::{Path, PathBuf};
use stockscope_core::error::DataError;
use stockscope_core::traits::MarketDataProvider;
use stockscope_core::types::{coerce_numeric, PriceField, PriceTable};
use tracing::debug;

const DATE_HEADERS: &[&str] = &["date", "datetime", "timestamp"];

/// CSV data source for historical daily prices.
///
/// Expects a header row with a date column and any of
/// Open/High/Low/Close/Volume. `Adj Close` stands in for `Close` when the
/// latter is absent. Cells that do not parse as numbers become empty.
#[derive(Debug)]
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a readable file", path.display()),
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Parse a whole CSV document, keeping rows between `start` and `end`
    /// inclusive.
    fn parse<R: Read>(
        reader: R,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| DataError::ParseError(e.to_string()))?
            .clone();

        let date_idx = headers
            .iter()
            .position(|h| DATE_HEADERS.contains(&h.to_lowercase().as_str()))
            .ok_or_else(|| DataError::ParseError("no Date column in CSV header".into()))?;

        let mut fields: Vec<(PriceField, usize)> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.parse::<PriceField>().ok().map(|f| (f, i)))
            .collect();
        if !fields.iter().any(|(f, _)| *f == PriceField::Close) {
            if let Some(i) = headers.iter().position(|h| h.eq_ignore_ascii_case("adj close")) {
                fields.push((PriceField::Close, i));
            }
        }

        let mut dates = Vec::new();
        let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); fields.len()];

        for result in reader.records() {
            let record = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let date = parse_date(record.get(date_idx).unwrap_or_default())?;
            if date < start || date > end {
                continue;
            }

            dates.push(date);
            for (column, (_, idx)) in columns.iter_mut().zip(fields.iter()) {
                column.push(record.get(*idx).and_then(coerce_numeric));
            }
        }

        debug!(ticker, rows = dates.len(), columns = fields.len(), "Parsed CSV prices");

        let mut table = PriceTable::new(ticker, dates);
        for ((field, _), values) in fields.into_iter().zip(columns) {
            table
                .insert_column(field, values)
                .map_err(|e| DataError::ParseError(e.to_string()))?;
        }
        Ok(table)
    }
}

#[async_trait]
impl MarketDataProvider for CsvDataSource {
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError> {
        let file = std::fs::File::open(&self.path)?;
        Self::parse(file, ticker, start, end)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.date_naive());
    }

    // Unix timestamp, milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let secs = if ts > 10_000_000_000 { ts / 1000 } else { ts };
        if let Some(dt) = DateTime::from_timestamp(secs, 0) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
