//! Indicator engine.
//!
//! Runs the requested indicators over a validated price series and returns
//! every output index-aligned to the series. A failing MACD computation is
//! reported as a warning and leaves both MACD series empty; nothing else in
//! the set is affected.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use stockscope_core::error::{DashboardError, IndicatorError};
use stockscope_core::traits::{Indicator, MultiOutputIndicator};
use stockscope_core::types::{IndicatorKind, PriceSeries};
use tracing::{debug, warn};

use crate::momentum::{Macd, Rsi};
use crate::moving_average::{Ema, Sma};

/// Name of a derived series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeriesKey {
    #[serde(rename = "SMA20")]
    Sma20,
    #[serde(rename = "EMA20")]
    Ema20,
    #[serde(rename = "RSI")]
    Rsi14,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "Signal_Line")]
    MacdSignal,
}

impl SeriesKey {
    /// Column name used in tables and exports.
    pub fn column(&self) -> &'static str {
        match self {
            SeriesKey::Sma20 => "SMA20",
            SeriesKey::Ema20 => "EMA20",
            SeriesKey::Rsi14 => "RSI",
            SeriesKey::Macd => "MACD",
            SeriesKey::MacdSignal => "Signal_Line",
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// An indicator that could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorWarning {
    pub indicator: IndicatorKind,
    pub message: String,
}

impl fmt::Display for IndicatorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.indicator, self.message)
    }
}

/// Derived series aligned to a price series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    len: usize,
    series: BTreeMap<SeriesKey, Vec<Option<f64>>>,
    warnings: Vec<IndicatorWarning>,
}

impl IndicatorSet {
    fn new(len: usize) -> Self {
        Self {
            len,
            series: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    fn insert(&mut self, key: SeriesKey, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.len);
        self.series.insert(key, values);
    }

    /// Length shared by every series.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the set covers no bars.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get a series if it was requested.
    pub fn get(&self, key: SeriesKey) -> Option<&[Option<f64>]> {
        self.series.get(&key).map(|v| v.as_slice())
    }

    /// Check whether a series is present.
    pub fn contains(&self, key: SeriesKey) -> bool {
        self.series.contains_key(&key)
    }

    /// Value of a series at a bar index.
    pub fn value_at(&self, key: SeriesKey, index: usize) -> Option<f64> {
        self.series
            .get(&key)
            .and_then(|v| v.get(index).copied().flatten())
    }

    /// Most recent defined value of a series.
    pub fn latest(&self, key: SeriesKey) -> Option<f64> {
        self.series
            .get(&key)
            .and_then(|v| v.iter().rev().find_map(|x| *x))
    }

    /// Most recent index where both series are defined.
    pub fn latest_pair(&self, a: SeriesKey, b: SeriesKey) -> Option<(f64, f64)> {
        let (xs, ys) = (self.series.get(&a)?, self.series.get(&b)?);
        xs.iter()
            .zip(ys.iter())
            .rev()
            .find_map(|(x, y)| Some(((*x)?, (*y)?)))
    }

    /// Present series keys in column order.
    pub fn keys(&self) -> impl Iterator<Item = SeriesKey> + '_ {
        self.series.keys().copied()
    }

    /// Indicators that failed to compute.
    pub fn warnings(&self) -> &[IndicatorWarning] {
        &self.warnings
    }
}

/// Computes the dashboard's indicator family.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    sma: Sma,
    ema: Ema,
    rsi: Rsi,
    macd: Macd,
}

impl IndicatorEngine {
    /// Create an engine with the dashboard periods: SMA 20, EMA 20, RSI 14,
    /// MACD (12, 26, 9).
    pub fn new() -> Self {
        Self {
            sma: Sma::new(20),
            ema: Ema::new(20),
            rsi: Rsi::new(14),
            macd: Macd::new(),
        }
    }

    /// Compute the requested indicators over `series`.
    ///
    /// Fails only when the series has no closes; the price validation
    /// upstream normally guarantees it does.
    pub fn compute(
        &self,
        series: &PriceSeries,
        requested: &BTreeSet<IndicatorKind>,
    ) -> Result<IndicatorSet, DashboardError> {
        let closes = series.closes();
        if closes.is_empty() {
            return Err(DashboardError::InvalidData {
                column: "Close".into(),
                reason: "no closing prices to compute indicators from".into(),
            });
        }

        let mut set = IndicatorSet::new(closes.len());

        for kind in requested {
            match kind {
                IndicatorKind::Sma20 => {
                    set.insert(SeriesKey::Sma20, self.sma.calculate_aligned(&closes));
                }
                IndicatorKind::Ema20 => {
                    set.insert(SeriesKey::Ema20, self.ema.calculate_aligned(&closes));
                }
                IndicatorKind::Rsi14 => {
                    set.insert(SeriesKey::Rsi14, self.rsi.calculate_aligned(&closes));
                }
                IndicatorKind::Macd => match self.compute_macd(&closes) {
                    Ok((macd, signal)) => {
                        set.insert(SeriesKey::Macd, macd);
                        set.insert(SeriesKey::MacdSignal, signal);
                    }
                    Err(e) => {
                        warn!(ticker = %series.ticker, error = %e, "MACD unavailable");
                        set.insert(SeriesKey::Macd, vec![None; closes.len()]);
                        set.insert(SeriesKey::MacdSignal, vec![None; closes.len()]);
                        set.warnings.push(IndicatorWarning {
                            indicator: IndicatorKind::Macd,
                            message: e.to_string(),
                        });
                    }
                },
            }
        }

        debug!(
            ticker = %series.ticker,
            bars = closes.len(),
            series = set.series.len(),
            "Indicators computed"
        );

        Ok(set)
    }

    #[allow(clippy::type_complexity)]
    fn compute_macd(
        &self,
        closes: &[f64],
    ) -> Result<(Vec<Option<f64>>, Vec<Option<f64>>), IndicatorError> {
        self.macd.validate_data(closes)?;
        if let Some(pos) = closes.iter().position(|c| !c.is_finite()) {
            return Err(IndicatorError::CalculationError(format!(
                "non-finite close at index {}",
                pos
            )));
        }

        let outputs = self.macd.calculate_aligned(closes);
        let macd = outputs.iter().map(|o| o.map(|o| o.macd)).collect();
        let signal = outputs.iter().map(|o| o.and_then(|o| o.signal)).collect();
        Ok((macd, signal))
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use stockscope_core::types::PriceBar;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::close_only(start + Duration::days(i as i64), c))
            .collect();
        PriceSeries::from_bars("TEST", bars)
    }

    fn all() -> BTreeSet<IndicatorKind> {
        IndicatorKind::all().iter().copied().collect()
    }

    #[test]
    fn test_only_requested_series() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let requested: BTreeSet<_> = [IndicatorKind::Sma20].into_iter().collect();
        let set = IndicatorEngine::new().compute(&series(&closes), &requested).unwrap();

        assert!(set.contains(SeriesKey::Sma20));
        assert!(!set.contains(SeriesKey::Rsi14));
        assert!(!set.contains(SeriesKey::Macd));
        assert!(set.warnings().is_empty());
    }

    #[test]
    fn test_ascending_closes_scenario() {
        let closes: Vec<f64> = (10..=30).map(|v| v as f64).collect();
        let set = IndicatorEngine::new()
            .compute(&series(&closes), &IndicatorKind::defaults())
            .unwrap();

        assert_eq!(set.len(), closes.len());
        assert!((set.latest(SeriesKey::Sma20).unwrap() - 20.5).abs() < 1e-10);
        assert!(set.value_at(SeriesKey::Sma20, 18).is_none());
        assert!((set.latest(SeriesKey::Rsi14).unwrap() - 100.0).abs() < 1e-10);
        assert!(set.value_at(SeriesKey::Rsi14, 13).is_none());
    }

    #[test]
    fn test_every_series_is_aligned() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.4).sin() * 6.0).collect();
        let set = IndicatorEngine::new().compute(&series(&closes), &all()).unwrap();

        for key in set.keys() {
            assert_eq!(set.get(key).unwrap().len(), closes.len(), "{}", key);
        }
        for value in set.get(SeriesKey::Rsi14).unwrap().iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
        assert!(set.latest_pair(SeriesKey::Macd, SeriesKey::MacdSignal).is_some());
    }

    #[test]
    fn test_macd_insufficient_data_is_a_warning() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorEngine::new().compute(&series(&closes), &all()).unwrap();

        assert_eq!(set.warnings().len(), 1);
        assert_eq!(set.warnings()[0].indicator, IndicatorKind::Macd);
        assert!(set.warnings()[0].to_string().starts_with("MACD error:"));
        assert!(set.get(SeriesKey::Macd).unwrap().iter().all(Option::is_none));
        assert!(set.latest_pair(SeriesKey::Macd, SeriesKey::MacdSignal).is_none());
        // The rest of the set is unaffected
        assert!(set.latest(SeriesKey::Sma20).is_some());
    }

    #[test]
    fn test_empty_series_fails_fast() {
        let result = IndicatorEngine::new().compute(&series(&[]), &all());
        assert!(matches!(result, Err(DashboardError::InvalidData { .. })));
    }

    #[test]
    fn test_latest_pair_skips_partial_rows() {
        let mut set = IndicatorSet::new(3);
        set.insert(SeriesKey::Macd, vec![Some(1.0), Some(2.0), Some(3.0)]);
        set.insert(SeriesKey::MacdSignal, vec![Some(0.5), Some(1.5), None]);

        assert_eq!(set.latest_pair(SeriesKey::Macd, SeriesKey::MacdSignal), Some((2.0, 1.5)));
    }
}
