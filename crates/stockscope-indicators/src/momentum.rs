//! Momentum indicators.

use serde::{Deserialize, Serialize};
use stockscope_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::seeded_ema;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// The dashboard uses 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Calculate using Wilder's smoothing method.
    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }

        let mut result = Vec::with_capacity(values.len() - period + 1);
        let period_f64 = period as f64;

        // Initial average
        let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
        result.push(avg);

        // Wilder's smoothing: avg = (prev_avg * (period-1) + value) / period
        for &value in &values[period..] {
            avg = (avg * (period_f64 - 1.0) + value) / period_f64;
            result.push(avg);
        }

        result
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = data
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                if change > 0.0 {
                    (change, 0.0)
                } else {
                    (0.0, -change)
                }
            })
            .unzip();

        let avg_gains = Self::wilder_smooth(&gains, self.period);
        let avg_losses = Self::wilder_smooth(&losses, self.period);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| {
                if loss == 0.0 && gain == 0.0 {
                    // No movement at all
                    50.0
                } else if loss == 0.0 {
                    100.0
                } else {
                    100.0 - (100.0 / (1.0 + gain / loss))
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD), absent until it has warmed up
    pub signal: Option<f64>,
}

impl MacdOutput {
    /// Histogram (MACD - Signal).
    pub fn histogram(&self) -> Option<f64> {
        self.signal.map(|s| self.macd - s)
    }
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    /// Returns one output per input from the first defined MACD value on.
    /// The signal line fills in `signal_period - 1` values later.
    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        if data.len() < self.slow_period {
            return vec![];
        }

        let fast_ema = seeded_ema(data, self.fast_period);
        let slow_ema = seeded_ema(data, self.slow_period);

        // Align the EMAs (fast has more values)
        let offset = self.slow_period - self.fast_period;
        let macd_line: Vec<f64> = fast_ema[offset..]
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = seeded_ema(&macd_line, self.signal_period);
        let lead = macd_line.len() - signal_line.len();

        macd_line
            .iter()
            .enumerate()
            .map(|(i, &macd)| MacdOutput {
                macd,
                signal: i.checked_sub(lead).map(|j| signal_line[j]),
            })
            .collect()
    }

    /// Points needed for the first signal value.
    fn period(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_basic() {
        let rsi = Rsi::new(14);
        // Generate test data with alternating up/down moves
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), 30 - 14);

        // All RSI values should be between 0 and 100
        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi14_first_defined_at_index_14() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..20).map(|i| 50.0 + (i % 3) as f64).collect();
        let aligned = rsi.calculate_aligned(&data);

        assert!(aligned[13].is_none());
        assert!(aligned[14].is_some());
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data);

        assert!(!result.is_empty());
        // All gains = RSI should be 100
        assert!((result[0] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);

        assert!(!result.is_empty());
        // All losses = RSI should be 0
        assert!(result[0].abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_is_midpoint() {
        let rsi = Rsi::new(5);
        let result = rsi.calculate(&[10.0; 8]);
        assert!(result.iter().all(|v| (*v - 50.0).abs() < 1e-10));
    }

    #[test]
    fn test_macd_basic() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), 50 - 25);
        // In an uptrend, MACD should be positive
        assert!(result.last().unwrap().macd > 0.0);
    }

    #[test]
    fn test_macd_alignment() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.3).cos() * 4.0).collect();
        let aligned = macd.calculate_aligned(&data);

        assert_eq!(aligned.len(), 40);
        assert!(aligned[24].is_none());
        let first = aligned[25].unwrap();
        assert!(first.signal.is_none());
        assert!(aligned[32].unwrap().signal.is_none());
        assert!(aligned[33].unwrap().signal.is_some());
        assert_eq!(macd.period(), 34);
    }

    #[test]
    fn test_macd_line_is_fast_minus_slow() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.2).sin() * 2.0).collect();
        let result = macd.calculate_aligned(&data);

        let fast = seeded_ema(&data, 12);
        let slow = seeded_ema(&data, 26);
        let last = result.last().unwrap().unwrap();
        let expected = fast.last().unwrap() - slow.last().unwrap();
        assert!((last.macd - expected).abs() < 1e-10);
        assert!((last.histogram().unwrap() - (last.macd - last.signal.unwrap())).abs() < 1e-12);
    }

    #[test]
    fn test_macd_custom_periods() {
        let macd = Macd::with_periods(5, 10, 3);
        let data: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert!(!result.is_empty());
        assert!(macd.validate_data(&data).is_ok());
        assert!(macd.validate_data(&data[..10]).is_err());
    }
}
