//! Signal interpretation.
//!
//! Classifies the latest RSI and MACD readings into discrete labels and the
//! narrative insight shown next to the charts.

use serde::{Deserialize, Serialize};
use stockscope_indicators::{IndicatorSet, SeriesKey};

/// RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Neutral,
}

/// MACD against its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdSignal {
    Bullish,
    Bearish,
    Neutral,
}

/// Visual treatment hint for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Info,
}

/// RSI classification bounds. Values strictly beyond a bound trigger it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiThresholds {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

/// A classified reading with its narrative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "indicator", rename_all = "lowercase")]
pub enum Insight {
    Rsi {
        value: f64,
        signal: RsiSignal,
    },
    Macd {
        macd: f64,
        signal_line: f64,
        signal: MacdSignal,
    },
}

impl Insight {
    /// Sentence shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Insight::Rsi { signal, .. } => match signal {
                RsiSignal::Overbought => "RSI indicates the stock is overbought – Consider waiting.",
                RsiSignal::Oversold => "RSI indicates oversold – Possible buying opportunity.",
                RsiSignal::Neutral => "RSI is neutral.",
            },
            Insight::Macd { signal, .. } => match signal {
                MacdSignal::Bullish => "MACD crossover: Bullish signal.",
                MacdSignal::Bearish => "MACD crossover: Bearish signal.",
                MacdSignal::Neutral => "MACD is neutral.",
            },
        }
    }

    /// How the presentation layer should style the insight.
    pub fn tone(&self) -> Tone {
        match self {
            Insight::Rsi { signal, .. } => match signal {
                RsiSignal::Overbought => Tone::Warning,
                RsiSignal::Oversold => Tone::Success,
                RsiSignal::Neutral => Tone::Info,
            },
            Insight::Macd { signal, .. } => match signal {
                MacdSignal::Bullish => Tone::Success,
                MacdSignal::Bearish => Tone::Warning,
                MacdSignal::Neutral => Tone::Info,
            },
        }
    }
}

/// Maps indicator readings to labels.
#[derive(Debug, Clone, Default)]
pub struct SignalInterpreter {
    thresholds: RsiThresholds,
}

impl SignalInterpreter {
    /// Create an interpreter with custom RSI bounds.
    pub fn new(thresholds: RsiThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify an RSI value. The bounds themselves are neutral.
    pub fn classify_rsi(&self, value: f64) -> RsiSignal {
        if value > self.thresholds.overbought {
            RsiSignal::Overbought
        } else if value < self.thresholds.oversold {
            RsiSignal::Oversold
        } else {
            RsiSignal::Neutral
        }
    }

    /// Classify MACD against its signal line.
    pub fn classify_macd(&self, macd: f64, signal: f64) -> MacdSignal {
        if macd > signal {
            MacdSignal::Bullish
        } else if macd < signal {
            MacdSignal::Bearish
        } else {
            MacdSignal::Neutral
        }
    }

    /// Insights for whichever of RSI and MACD have a latest reading.
    pub fn interpret(&self, set: &IndicatorSet) -> Vec<Insight> {
        let mut insights = Vec::with_capacity(2);

        if let Some(value) = set.latest(SeriesKey::Rsi14) {
            insights.push(Insight::Rsi {
                value,
                signal: self.classify_rsi(value),
            });
        }

        if let Some((macd, signal_line)) = set.latest_pair(SeriesKey::Macd, SeriesKey::MacdSignal) {
            insights.push(Insight::Macd {
                macd,
                signal_line,
                signal: self.classify_macd(macd, signal_line),
            });
        }

        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_boundaries_are_neutral() {
        let interpreter = SignalInterpreter::default();

        assert_eq!(interpreter.classify_rsi(70.0), RsiSignal::Neutral);
        assert_eq!(interpreter.classify_rsi(30.0), RsiSignal::Neutral);
        assert_eq!(interpreter.classify_rsi(70.01), RsiSignal::Overbought);
        assert_eq!(interpreter.classify_rsi(29.99), RsiSignal::Oversold);
        assert_eq!(interpreter.classify_rsi(50.0), RsiSignal::Neutral);
    }

    #[test]
    fn test_macd_sign_determines_label() {
        let interpreter = SignalInterpreter::default();

        assert_eq!(interpreter.classify_macd(0.5, 0.2), MacdSignal::Bullish);
        assert_eq!(interpreter.classify_macd(-0.5, -0.2), MacdSignal::Bearish);
        assert_eq!(interpreter.classify_macd(0.3, 0.3), MacdSignal::Neutral);

        for (macd, signal) in [(1.0, -1.0), (-2.0, 3.0), (0.0, 0.0), (1e-9, 0.0)] {
            let expected = match (macd - signal).partial_cmp(&0.0).unwrap() {
                std::cmp::Ordering::Greater => MacdSignal::Bullish,
                std::cmp::Ordering::Less => MacdSignal::Bearish,
                std::cmp::Ordering::Equal => MacdSignal::Neutral,
            };
            assert_eq!(interpreter.classify_macd(macd, signal), expected);
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let interpreter = SignalInterpreter::new(RsiThresholds {
            overbought: 80.0,
            oversold: 20.0,
        });
        assert_eq!(interpreter.classify_rsi(75.0), RsiSignal::Neutral);
        assert_eq!(interpreter.classify_rsi(81.0), RsiSignal::Overbought);
    }

    #[test]
    fn test_insight_messages_and_tones() {
        let overbought = Insight::Rsi {
            value: 75.0,
            signal: RsiSignal::Overbought,
        };
        assert_eq!(
            overbought.message(),
            "RSI indicates the stock is overbought – Consider waiting."
        );
        assert_eq!(overbought.tone(), Tone::Warning);

        let bullish = Insight::Macd {
            macd: 1.0,
            signal_line: 0.5,
            signal: MacdSignal::Bullish,
        };
        assert_eq!(bullish.message(), "MACD crossover: Bullish signal.");
        assert_eq!(bullish.tone(), Tone::Success);
    }

    #[test]
    fn test_interpret_empty_set() {
        let insights = SignalInterpreter::default().interpret(&IndicatorSet::default());
        assert!(insights.is_empty());
    }
}
