//! Headline sentiment: labels and a built-in lexicon scorer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stockscope_core::error::NewsError;
use stockscope_core::traits::PolarityScorer;

/// Direction of a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classify a polarity. Values exactly at `±threshold` are neutral.
    pub fn from_polarity(polarity: f64, threshold: f64) -> Self {
        if polarity > threshold {
            SentimentLabel::Positive
        } else if polarity < -threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Marker shown before the headline.
    pub fn marker(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "🔼",
            SentimentLabel::Negative => "🔻",
            SentimentLabel::Neutral => "➖",
        }
    }
}

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("bullish", 0.8),
    ("surge", 0.7),
    ("surges", 0.7),
    ("rally", 0.7),
    ("rallies", 0.7),
    ("soar", 0.8),
    ("soars", 0.8),
    ("gain", 0.5),
    ("gains", 0.5),
    ("profit", 0.6),
    ("profits", 0.6),
    ("growth", 0.6),
    ("rise", 0.5),
    ("rises", 0.5),
    ("jump", 0.6),
    ("jumps", 0.6),
    ("record", 0.6),
    ("beat", 0.6),
    ("beats", 0.6),
    ("exceed", 0.6),
    ("exceeds", 0.6),
    ("outperform", 0.7),
    ("upgrade", 0.6),
    ("upgrades", 0.6),
    ("strong", 0.5),
    ("positive", 0.5),
    ("optimistic", 0.6),
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("win", 0.6),
    ("wins", 0.6),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("boost", 0.5),
    ("boosts", 0.5),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("crashes", -0.9),
    ("plunge", -0.8),
    ("plunges", -0.8),
    ("drop", -0.6),
    ("drops", -0.6),
    ("fall", -0.5),
    ("falls", -0.5),
    ("decline", -0.6),
    ("declines", -0.6),
    ("loss", -0.6),
    ("losses", -0.6),
    ("slump", -0.7),
    ("slumps", -0.7),
    ("weak", -0.5),
    ("negative", -0.5),
    ("downgrade", -0.6),
    ("downgrades", -0.6),
    ("miss", -0.5),
    ("misses", -0.5),
    ("lawsuit", -0.5),
    ("fraud", -0.9),
    ("bad", -0.7),
    ("worst", -1.0),
    ("fear", -0.6),
    ("fears", -0.6),
    ("concern", -0.5),
    ("concerns", -0.5),
    ("cut", -0.4),
    ("cuts", -0.4),
    ("layoffs", -0.6),
    ("recall", -0.5),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "without", "isn't", "don't", "won't", "can't"];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("sharply", 1.4),
    ("massive", 1.4),
    ("huge", 1.3),
    ("slightly", 0.5),
];

/// Rule-based polarity scorer.
///
/// Averages the polarity of the sentiment-bearing words in a text. A
/// negation directly before a word flips it at half strength; an
/// intensifier scales it. The result is clamped to `[-1, 1]`.
pub struct LexiconScorer {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Create a scorer with the built-in financial lexicon.
    pub fn new() -> Self {
        Self {
            words: POSITIVE_WORDS
                .iter()
                .chain(NEGATIVE_WORDS.iter())
                .copied()
                .collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
            .filter(|t| !t.is_empty())
            .map(|t| t.replace('’', "'").to_lowercase())
            .collect()
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<f64, NewsError> {
        let tokens = Self::tokenize(text);

        let mut total = 0.0;
        let mut count = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token.as_str()) else {
                continue;
            };

            let mut polarity = base;
            if let Some(prev) = i.checked_sub(1).map(|j| tokens[j].as_str()) {
                if let Some(&factor) = self.intensifiers.get(prev) {
                    polarity *= factor;
                }
                let negated = NEGATIONS.contains(&prev)
                    || (i >= 2
                        && self.intensifiers.contains_key(prev)
                        && NEGATIONS.contains(&tokens[i - 2].as_str()));
                if negated {
                    polarity *= -0.5;
                }
            }

            total += polarity.clamp(-1.0, 1.0);
            count += 1;
        }

        if count == 0 {
            return Ok(0.0);
        }
        Ok((total / count as f64).clamp(-1.0, 1.0))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}
