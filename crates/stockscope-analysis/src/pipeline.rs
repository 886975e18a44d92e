//! Dashboard service.
//!
//! Fetches (or reuses) the price table for a request, validates it, runs
//! the indicator engine and signal interpreter, then fills the fundamentals
//! and news sections. Price validation errors end the build; fundamentals
//! and news failures only degrade their own section.

use std::sync::Arc;
use stockscope_core::error::DashboardError;
use stockscope_core::traits::{
    FundamentalsProvider, MarketDataProvider, NewsProvider, PolarityScorer,
};
use stockscope_core::types::{DashboardRequest, PriceSeries, PriceTable};
use stockscope_data::PriceCache;
use stockscope_indicators::IndicatorEngine;
use tracing::{debug, info, warn};

use crate::fundamentals::{FundamentalsSection, FundamentalsSummary};
use crate::metrics::KeyMetrics;
use crate::news::{NewsAnalyzer, NewsSection};
use crate::report::{DashboardReport, RawRow};
use crate::signals::{RsiThresholds, SignalInterpreter};

/// Tunables for a dashboard build.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub rsi: RsiThresholds,
    pub sentiment_threshold: f64,
    pub news_limit: usize,
    pub raw_rows: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            rsi: RsiThresholds::default(),
            sentiment_threshold: 0.1,
            news_limit: 5,
            raw_rows: 100,
        }
    }
}

/// Builds dashboard reports, one request at a time.
pub struct DashboardService {
    market: Arc<dyn MarketDataProvider>,
    fundamentals: Option<Arc<dyn FundamentalsProvider>>,
    news: Option<Arc<dyn NewsProvider>>,
    engine: IndicatorEngine,
    interpreter: SignalInterpreter,
    analyzer: NewsAnalyzer,
    options: PipelineOptions,
    cache: PriceCache,
}

impl DashboardService {
    /// Create a service with a price source and a headline scorer.
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        scorer: Arc<dyn PolarityScorer>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            market,
            fundamentals: None,
            news: None,
            engine: IndicatorEngine::new(),
            interpreter: SignalInterpreter::new(options.rsi),
            analyzer: NewsAnalyzer::new(scorer, options.news_limit, options.sentiment_threshold),
            options,
            cache: PriceCache::new(),
        }
    }

    /// Attach a fundamentals source.
    pub fn with_fundamentals(mut self, provider: Arc<dyn FundamentalsProvider>) -> Self {
        self.fundamentals = Some(provider);
        self
    }

    /// Attach a news source.
    pub fn with_news(mut self, provider: Arc<dyn NewsProvider>) -> Self {
        self.news = Some(provider);
        self
    }

    /// Price cache shared by every request on this service.
    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    /// Build the report for `request`.
    pub async fn build(
        &mut self,
        request: &DashboardRequest,
    ) -> Result<DashboardReport, DashboardError> {
        info!(
            ticker = %request.ticker,
            start = %request.start,
            end = %request.end,
            "Building dashboard"
        );

        let table = self.prices(request).await?;
        let series = PriceSeries::from_table(&table)?;

        let mut warnings = Vec::new();
        if series.skipped_rows() > 0 {
            warn!(
                ticker = %request.ticker,
                skipped = series.skipped_rows(),
                "Dropped rows without a closing price"
            );
            warnings.push(format!(
                "Skipped {} rows with missing closing prices",
                series.skipped_rows()
            ));
        }
        if series.duplicate_rows() > 0 {
            warn!(
                ticker = %request.ticker,
                duplicates = series.duplicate_rows(),
                "Dropped rows with a repeated date"
            );
            warnings.push(format!(
                "Dropped {} rows with duplicate dates (latest row kept)",
                series.duplicate_rows()
            ));
        }

        let indicators = self.engine.compute(&series, &request.indicators)?;
        warnings.extend(indicators.warnings().iter().map(|w| w.to_string()));

        let insights = self.interpreter.interpret(&indicators);
        let key_metrics =
            KeyMetrics::from_series(&series).ok_or_else(|| DashboardError::NoDataInRange {
                ticker: request.ticker.clone(),
            })?;

        let fundamentals = self.fundamentals_section(&request.ticker).await;
        let news = self.news_section(&request.ticker).await;
        let raw = RawRow::tail(&series, &indicators, self.options.raw_rows);

        info!(
            ticker = %request.ticker,
            bars = series.len(),
            insights = insights.len(),
            warnings = warnings.len(),
            "Dashboard built"
        );

        Ok(DashboardReport {
            request: request.clone(),
            series,
            indicators,
            key_metrics,
            fundamentals,
            insights,
            news,
            warnings,
            raw,
        })
    }

    async fn prices(&mut self, request: &DashboardRequest) -> Result<PriceTable, DashboardError> {
        let key = request.price_key();
        if let Some(table) = self.cache.get(&key).cloned() {
            debug!(ticker = %request.ticker, "Price cache hit");
            return Ok(table);
        }

        let table = self
            .market
            .fetch_prices(&request.ticker, request.start, request.end)
            .await?;
        debug!(
            ticker = %request.ticker,
            provider = self.market.name(),
            rows = table.len(),
            "Fetched prices"
        );
        self.cache.put(key, table.clone());
        Ok(table)
    }

    async fn fundamentals_section(&self, ticker: &str) -> FundamentalsSection {
        let Some(provider) = &self.fundamentals else {
            return FundamentalsSection::Unavailable {
                reason: "no fundamentals provider configured".into(),
            };
        };

        match provider.fetch_info(ticker).await {
            Ok(snapshot) => FundamentalsSection::Available(FundamentalsSummary::from_snapshot(&snapshot)),
            Err(e) => {
                warn!(ticker, provider = provider.name(), error = %e, "Fundamentals unavailable");
                FundamentalsSection::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn news_section(&self, ticker: &str) -> NewsSection {
        let Some(provider) = &self.news else {
            return NewsSection::Unavailable {
                reason: "no news provider configured".into(),
            };
        };

        let result = self.analyzer.analyze(provider.as_ref(), ticker).await;
        if let Err(e) = &result {
            warn!(ticker, provider = provider.name(), error = %e, "News sentiment unavailable");
        }
        NewsSection::from(result)
    }
}
