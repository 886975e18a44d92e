//! Dashboard report generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use stockscope_core::types::{DashboardRequest, PriceSeries};
use stockscope_indicators::{IndicatorSet, SeriesKey};

use crate::fundamentals::FundamentalsSection;
use crate::metrics::KeyMetrics;
use crate::news::NewsSection;
use crate::signals::Insight;

const RULE: &str = "───────────────────────────────────────────────────────────\n";
const BORDER: &str = "═══════════════════════════════════════════════════════════\n";

/// Rows of the raw table shown in the text summary.
const SUMMARY_TAIL: usize = 10;

/// One row of the raw data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
    /// Requested indicator columns
    pub indicators: BTreeMap<SeriesKey, Option<f64>>,
}

impl RawRow {
    /// Build the rows for the last `n` bars.
    pub fn tail(series: &PriceSeries, indicators: &IndicatorSet, n: usize) -> Vec<Self> {
        let start = series.tail_start(n);
        series.bars()[start..]
            .iter()
            .enumerate()
            .map(|(offset, bar)| {
                let index = start + offset;
                RawRow {
                    date: bar.date,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                    indicators: indicators
                        .keys()
                        .map(|key| (key, indicators.value_at(key, index)))
                        .collect(),
                }
            })
            .collect()
    }
}

/// Complete dashboard output for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Request that produced the report
    pub request: DashboardRequest,
    /// Validated prices
    pub series: PriceSeries,
    /// Requested indicator series
    pub indicators: IndicatorSet,
    /// Latest close and period extremes
    pub key_metrics: KeyMetrics,
    /// Formatted fundamentals, or why they are missing
    pub fundamentals: FundamentalsSection,
    /// Classified RSI/MACD readings
    pub insights: Vec<Insight>,
    /// Scored headlines, or a notice
    pub news: NewsSection,
    /// Non-fatal problems encountered while building
    pub warnings: Vec<String>,
    /// Tail of the price table with indicator columns
    pub raw: Vec<RawRow>,
}

impl DashboardReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str(BORDER);
        s.push_str(&format!("{:^59}\n", format!("STOCK DASHBOARD: {}", self.request.ticker)));
        s.push_str(BORDER);
        s.push('\n');

        s.push_str(&format!(
            "  Period:              {} to {}\n",
            self.request.start, self.request.end
        ));
        s.push_str(&format!("  Trading Days:        {}\n", self.series.len()));
        let labels: Vec<&str> = self.request.indicators.iter().map(|k| k.label()).collect();
        s.push_str(&format!("  Indicators:          {}\n", labels.join(", ")));
        s.push('\n');

        s.push_str("KEY METRICS\n");
        s.push_str(RULE);
        for (label, value) in self.key_metrics.rows() {
            s.push_str(&format!("  {:<21}{}\n", format!("{}:", label), value));
        }
        s.push('\n');

        if self.indicators.keys().next().is_some() {
            s.push_str("LATEST INDICATORS\n");
            s.push_str(RULE);
            for key in self.indicators.keys() {
                let value = self
                    .indicators
                    .latest(key)
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "N/A".to_string());
                s.push_str(&format!("  {:<21}{}\n", format!("{}:", key), value));
            }
            s.push('\n');
        }

        if !self.insights.is_empty() {
            s.push_str("INSIGHTS\n");
            s.push_str(RULE);
            for insight in &self.insights {
                s.push_str(&format!("  {}\n", insight.message()));
            }
            s.push('\n');
        }

        if !self.warnings.is_empty() {
            s.push_str("WARNINGS\n");
            s.push_str(RULE);
            for warning in &self.warnings {
                s.push_str(&format!("  ! {}\n", warning));
            }
            s.push('\n');
        }

        s.push_str("FUNDAMENTALS\n");
        s.push_str(RULE);
        match &self.fundamentals {
            FundamentalsSection::Available(summary) => {
                for (label, value) in summary.rows() {
                    s.push_str(&format!("  {:<21}{}\n", format!("{}:", label), value));
                }
            }
            FundamentalsSection::Unavailable { .. } => {
                s.push_str("  Fundamentals not available.\n");
            }
        }
        s.push('\n');

        s.push_str("NEWS SENTIMENT\n");
        s.push_str(RULE);
        match &self.news {
            NewsSection::Headlines { items } => {
                for item in items {
                    s.push_str(&format!("  {}\n", item.display()));
                }
            }
            other => {
                if let Some(notice) = other.notice() {
                    s.push_str(&format!("  {}\n", notice));
                }
            }
        }
        s.push('\n');

        s.push_str("RECENT PRICES\n");
        s.push_str(RULE);
        let tail = &self.raw[self.raw.len().saturating_sub(SUMMARY_TAIL)..];
        s.push_str(&format!("  {:<12}{:>12}", "Date", "Close"));
        for key in self.indicators.keys() {
            s.push_str(&format!("{:>12}", key.column()));
        }
        s.push('\n');
        for row in tail {
            s.push_str(&format!("  {:<12}{:>12.2}", row.date.to_string(), row.close));
            for value in row.indicators.values() {
                match value {
                    Some(v) => s.push_str(&format!("{:>12.2}", v)),
                    None => s.push_str(&format!("{:>12}", "-")),
                }
            }
            s.push('\n');
        }

        s.push_str(BORDER);

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the raw table as CSV.
    ///
    /// Columns are Date, Open, High, Low, Close, Volume followed by the
    /// requested indicator columns. Absent cells are left empty.
    pub fn write_raw_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header: Vec<String> = ["Date", "Open", "High", "Low", "Close", "Volume"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        header.extend(self.indicators.keys().map(|k| k.column().to_string()));
        wtr.write_record(&header)?;

        let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        for row in &self.raw {
            let mut record = vec![
                row.date.to_string(),
                cell(row.open),
                cell(row.high),
                cell(row.low),
                row.close.to_string(),
                cell(row.volume),
            ];
            record.extend(row.indicators.values().map(|v| cell(*v)));
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fundamentals::FundamentalsSummary;
    use crate::signals::{RsiSignal, SignalInterpreter};
    use chrono::Duration;
    use std::collections::BTreeSet;
    use stockscope_core::types::{FundamentalsSnapshot, IndicatorKind, PriceBar};
    use stockscope_indicators::IndicatorEngine;

    fn sample_report() -> DashboardReport {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<PriceBar> = (0..40)
            .map(|i| {
                let close = 100.0 + i as f64;
                PriceBar::new(start + Duration::days(i), close, close + 1.0, close - 1.0, close, 1000.0)
            })
            .collect();
        let series = PriceSeries::from_bars("AAPL", bars);

        let kinds: BTreeSet<IndicatorKind> = [IndicatorKind::Sma20, IndicatorKind::Rsi14].into();
        let request =
            DashboardRequest::new("aapl", start, start + Duration::days(39), kinds.clone()).unwrap();
        let indicators = IndicatorEngine::new().compute(&series, &kinds).unwrap();
        let insights = SignalInterpreter::default().interpret(&indicators);

        DashboardReport {
            key_metrics: KeyMetrics::from_series(&series).unwrap(),
            raw: RawRow::tail(&series, &indicators, 100),
            request,
            series,
            indicators,
            fundamentals: FundamentalsSection::Available(FundamentalsSummary::from_snapshot(
                &FundamentalsSnapshot::default(),
            )),
            insights,
            news: NewsSection::NoNews,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_report_summary() {
        let report = sample_report();
        let summary = report.summary();

        assert!(summary.contains("STOCK DASHBOARD: AAPL"));
        assert!(summary.contains("Latest Close:        $139.00"));
        assert!(summary.contains("RSI indicates the stock is overbought"));
        assert!(summary.contains("No recent news available."));
        assert!(summary.contains("Market Cap:          $0"));
        assert!(report.insights.iter().any(|i| matches!(
            i,
            Insight::Rsi {
                signal: RsiSignal::Overbought,
                ..
            }
        )));
    }

    #[test]
    fn test_raw_tail_is_bounded() {
        let report = sample_report();
        let rows = RawRow::tail(&report.series, &report.indicators, 5);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4].close, 139.0);
        assert_eq!(rows[4].indicators.len(), 2);
        assert!(rows[4].indicators[&SeriesKey::Sma20].is_some());

        assert_eq!(report.raw.len(), 40);
        assert_eq!(report.raw[0].indicators[&SeriesKey::Sma20], None);
    }

    #[test]
    fn test_raw_csv_export() {
        let report = sample_report();
        let mut buf = Vec::new();
        report.write_raw_csv(&mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Date,Open,High,Low,Close,Volume,SMA20,RSI"));
        assert_eq!(lines.next(), Some("2024-01-01,100,101,99,100,1000,,"));
        assert_eq!(text.lines().count(), 41);
    }

    #[test]
    fn test_to_json() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["request"]["ticker"], "AAPL");
        assert_eq!(value["news"]["status"], "no_news");
        assert_eq!(value["fundamentals"]["status"], "available");
        assert_eq!(value["raw"].as_array().unwrap().len(), 40);
    }
}
