//! News sentiment block.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockscope_core::error::NewsError;
use stockscope_core::traits::{NewsProvider, PolarityScorer};
use stockscope_core::types::NewsHeadline;
use tracing::{debug, warn};

use crate::sentiment::SentimentLabel;

/// Notice shown when the news source or the scorer failed.
pub const UNAVAILABLE_NOTICE: &str = "Sentiment analysis not available.";

/// Notice shown when the provider returned no headlines.
pub const NO_NEWS_NOTICE: &str = "No recent news available.";

/// A headline with its polarity and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub headline: NewsHeadline,
    pub polarity: f64,
    pub label: SentimentLabel,
}

impl ScoredHeadline {
    /// Display line: marker followed by the title.
    pub fn display(&self) -> String {
        format!("{} {}", self.label.marker(), self.headline.title)
    }
}

/// News block of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NewsSection {
    Headlines { items: Vec<ScoredHeadline> },
    NoNews,
    Unavailable { reason: String },
}

impl NewsSection {
    /// Notice to show instead of headlines, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            NewsSection::Headlines { .. } => None,
            NewsSection::NoNews => Some(NO_NEWS_NOTICE),
            NewsSection::Unavailable { .. } => Some(UNAVAILABLE_NOTICE),
        }
    }
}

impl From<Result<Vec<ScoredHeadline>, NewsError>> for NewsSection {
    fn from(result: Result<Vec<ScoredHeadline>, NewsError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => NewsSection::NoNews,
            Ok(items) => NewsSection::Headlines { items },
            Err(e) => NewsSection::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

/// Scores the most recent headlines for a ticker.
pub struct NewsAnalyzer {
    scorer: Arc<dyn PolarityScorer>,
    limit: usize,
    threshold: f64,
}

impl NewsAnalyzer {
    /// Create an analyzer.
    pub fn new(scorer: Arc<dyn PolarityScorer>, limit: usize, threshold: f64) -> Self {
        Self {
            scorer,
            limit,
            threshold,
        }
    }

    /// Score up to `limit` headlines. Any failure fails the whole batch.
    pub fn score_headlines(
        &self,
        headlines: Vec<NewsHeadline>,
    ) -> Result<Vec<ScoredHeadline>, NewsError> {
        headlines
            .into_iter()
            .take(self.limit)
            .map(|headline| {
                let polarity = self.scorer.score(&headline.title)?;
                if !(-1.0..=1.0).contains(&polarity) {
                    return Err(NewsError::ScoringFailed(format!(
                        "{} returned polarity {} for '{}'",
                        self.scorer.name(),
                        polarity,
                        headline.title
                    )));
                }
                Ok(ScoredHeadline {
                    label: SentimentLabel::from_polarity(polarity, self.threshold),
                    headline,
                    polarity,
                })
            })
            .collect()
    }

    /// Fetch and score headlines for `ticker`.
    pub async fn analyze(
        &self,
        provider: &dyn NewsProvider,
        ticker: &str,
    ) -> Result<Vec<ScoredHeadline>, NewsError> {
        let headlines = provider.fetch_news(ticker).await?;
        debug!(ticker, provider = provider.name(), count = headlines.len(), "Fetched headlines");

        let scored = self.score_headlines(headlines);
        if let Err(e) = &scored {
            warn!(ticker, error = %e, "Headline scoring failed");
        }
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use stockscope_core::error::DataError;

    struct FixedScorer(f64);

    impl PolarityScorer for FixedScorer {
        fn score(&self, _text: &str) -> Result<f64, NewsError> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingScorer;

    impl PolarityScorer for FailingScorer {
        fn score(&self, _text: &str) -> Result<f64, NewsError> {
            Err(NewsError::ScoringFailed("model not loaded".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct StaticNews(Vec<&'static str>);

    #[async_trait]
    impl NewsProvider for StaticNews {
        async fn fetch_news(&self, _ticker: &str) -> Result<Vec<NewsHeadline>, DataError> {
            Ok(self.0.iter().map(|t| NewsHeadline::new(*t)).collect())
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    struct OfflineNews;

    #[async_trait]
    impl NewsProvider for OfflineNews {
        async fn fetch_news(&self, _ticker: &str) -> Result<Vec<NewsHeadline>, DataError> {
            Err(DataError::ConnectionError("network unreachable".into()))
        }

        fn name(&self) -> &str {
            "offline"
        }
    }

    fn analyzer(scorer: impl PolarityScorer + 'static) -> NewsAnalyzer {
        NewsAnalyzer::new(Arc::new(scorer), 5, 0.1)
    }

    #[tokio::test]
    async fn test_only_first_five_are_scored() {
        let provider = StaticNews(vec!["a", "b", "c", "d", "e", "f", "g"]);
        let scored = analyzer(FixedScorer(0.5))
            .analyze(&provider, "AAPL")
            .await
            .unwrap();

        assert_eq!(scored.len(), 5);
        assert_eq!(scored[0].headline.title, "a");
        assert!(scored.iter().all(|s| s.label == SentimentLabel::Positive));
        assert_eq!(scored[0].display(), "🔼 a");
    }

    #[tokio::test]
    async fn test_provider_failure_is_unavailable() {
        let result = analyzer(FixedScorer(0.0)).analyze(&OfflineNews, "AAPL").await;
        assert!(matches!(result, Err(NewsError::ProviderUnavailable(_))));

        let section = NewsSection::from(result);
        assert_eq!(section.notice(), Some(UNAVAILABLE_NOTICE));
    }

    #[tokio::test]
    async fn test_scorer_failure_is_unavailable() {
        let provider = StaticNews(vec!["Apple beats estimates"]);
        let result = analyzer(FailingScorer).analyze(&provider, "AAPL").await;
        assert!(matches!(result, Err(NewsError::ScoringFailed(_))));
        assert_eq!(NewsSection::from(result).notice(), Some(UNAVAILABLE_NOTICE));
    }

    #[test]
    fn test_out_of_range_polarity_fails() {
        let result = analyzer(FixedScorer(1.5)).score_headlines(vec![NewsHeadline::new("x")]);
        assert!(matches!(result, Err(NewsError::ScoringFailed(_))));

        let result = analyzer(FixedScorer(f64::NAN)).score_headlines(vec![NewsHeadline::new("x")]);
        assert!(matches!(result, Err(NewsError::ScoringFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_news() {
        let result = analyzer(FixedScorer(0.0))
            .analyze(&StaticNews(vec![]), "AAPL")
            .await;
        let section = NewsSection::from(result);
        assert_eq!(section, NewsSection::NoNews);
        assert_eq!(section.notice(), Some(NO_NEWS_NOTICE));
    }
}
