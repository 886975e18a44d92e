//! Yahoo Finance HTTP client.
//!
//! Implements all three provider traits against the public chart,
//! quote-summary and search endpoints. Responses are mapped onto the raw
//! [`PriceTable`] / [`FundamentalsSnapshot`] / [`NewsHeadline`] types without
//! validation; the dashboard pipeline decides what is fatal.
//!
//! Quote-summary requests need a session cookie plus the matching crumb.
//! The client keeps a cookie store and fetches the crumb once, on the first
//! fundamentals request.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration as StdDuration;
use stockscope_core::error::DataError;
use stockscope_core::traits::{FundamentalsProvider, MarketDataProvider, NewsProvider};
use stockscope_core::types::{FundamentalsSnapshot, NewsHeadline, PriceField, PriceTable};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Yahoo endpoint configuration.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub chart_url: String,
    pub summary_url: String,
    pub search_url: String,
    /// Visited once to obtain the session cookie
    pub cookie_url: String,
    /// Returns the crumb quote-summary requests must carry
    pub crumb_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Headlines requested per search
    pub news_count: usize,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            summary_url: "https://query2.finance.yahoo.com/v10/finance/quoteSummary".to_string(),
            search_url: "https://query1.finance.yahoo.com/v1/finance/search".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            crumb_url: "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string(),
            user_agent: "Mozilla/5.0 (compatible; stockscope/0.1)".to_string(),
            timeout_secs: 30,
            news_count: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNews {
    title: Option<String>,
    publisher: Option<String>,
    link: Option<String>,
    provider_publish_time: Option<i64>,
}

/// Yahoo Finance client.
pub struct YahooClient {
    config: YahooConfig,
    client: Client,
    crumb: OnceCell<String>,
}

impl YahooClient {
    /// Create a new client.
    pub fn new(config: YahooConfig) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| DataError::ConnectionError(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            config,
            client,
            crumb: OnceCell::new(),
        })
    }

    /// Session crumb, fetched after priming the cookie store.
    ///
    /// A failed fetch is not cached, so the next call tries again.
    async fn crumb(&self) -> Result<&str, DataError> {
        let crumb = self
            .crumb
            .get_or_try_init(|| async {
                // Only the Set-Cookie header matters; the page itself is usually a 404.
                if let Err(e) = self.client.get(&self.config.cookie_url).send().await {
                    debug!(error = %e, "Cookie request failed");
                }

                let resp = self
                    .client
                    .get(&self.config.crumb_url)
                    .send()
                    .await
                    .map_err(|e| DataError::ConnectionError(e.to_string()))?;
                let status = resp.status();
                let text = resp
                    .text()
                    .await
                    .map_err(|e| DataError::ConnectionError(e.to_string()))?;
                if !status.is_success() {
                    return Err(DataError::ApiError(format!("crumb {}: {}", status, text)));
                }

                let crumb = parse_crumb(&text)?;
                debug!("Obtained Yahoo crumb");
                Ok::<_, DataError>(crumb)
            })
            .await?;

        Ok(crumb.as_str())
    }

    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, DataError> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(url.to_string()));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::ApiError(format!("{}: {}", status, text)));
        }

        resp.json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))
    }
}

/// Map a chart response onto a price table.
fn chart_to_table(ticker: &str, body: Value) -> Result<PriceTable, DataError> {
    let envelope: ChartEnvelope =
        serde_json::from_value(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    if let Some(err) = envelope.chart.error {
        return Err(match err.code.as_str() {
            "Not Found" => DataError::SymbolNotFound(ticker.to_string()),
            _ => DataError::ApiError(format!(
                "{}: {}",
                err.code,
                err.description.unwrap_or_default()
            )),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))?;

    let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);
    let dates = result
        .timestamp
        .iter()
        .map(|&ts| {
            DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| DataError::ParseError(format!("bad timestamp {}", ts)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = PriceTable::new(ticker, dates);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    // An empty range comes back without any quote arrays; keep the columns so
    // the caller sees an empty table rather than a missing Close.
    let empty = table.is_empty();
    let columns = [
        (PriceField::Open, quote.open),
        (PriceField::High, quote.high),
        (PriceField::Low, quote.low),
        (PriceField::Close, quote.close),
        (PriceField::Volume, quote.volume),
    ];
    for (field, values) in columns {
        let values = match values {
            Some(v) => v,
            None if empty => Vec::new(),
            None => continue,
        };
        table
            .insert_column(field, values)
            .map_err(|e| DataError::ParseError(e.to_string()))?;
    }

    Ok(table)
}

/// Validate the body returned by the crumb endpoint.
fn parse_crumb(text: &str) -> Result<String, DataError> {
    let crumb = text.trim();
    if crumb.is_empty() || crumb.contains(char::is_whitespace) || crumb.contains('<') {
        return Err(DataError::ApiError(format!(
            "unexpected crumb response '{}'",
            crumb.chars().take(40).collect::<String>()
        )));
    }
    Ok(crumb.to_string())
}

/// Query parameters for a quote-summary request.
fn summary_params(crumb: &str) -> Vec<(&'static str, String)> {
    vec![
        (
            "modules",
            "summaryDetail,defaultKeyStatistics,financialData".to_string(),
        ),
        ("crumb", crumb.to_string()),
    ]
}

/// First numeric `raw` value of `field` across the quote-summary modules.
fn summary_field(modules: &Value, field: &str) -> Option<f64> {
    modules.as_object()?.values().find_map(|module| {
        let value = module.get(field)?;
        value
            .get("raw")
            .and_then(Value::as_f64)
            .or_else(|| value.as_f64())
    })
}

/// Map a quote-summary response onto a fundamentals snapshot.
fn summary_to_snapshot(ticker: &str, body: &Value) -> Result<FundamentalsSnapshot, DataError> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| DataError::ParseError("missing quoteSummary".into()))?;

    if let Some(err) = summary.get("error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(Value::as_str).unwrap_or("error");
        return Err(if code == "Not Found" {
            DataError::SymbolNotFound(ticker.to_string())
        } else {
            DataError::ApiError(err.to_string())
        });
    }

    let modules = summary
        .get("result")
        .and_then(|r| r.get(0))
        .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))?;

    Ok(FundamentalsSnapshot {
        trailing_pe: summary_field(modules, "trailingPE"),
        trailing_eps: summary_field(modules, "trailingEps"),
        return_on_equity: summary_field(modules, "returnOnEquity"),
        debt_to_equity: summary_field(modules, "debtToEquity"),
        price_to_book: summary_field(modules, "priceToBook"),
        market_cap: summary_field(modules, "marketCap"),
    })
}

/// Map a search response onto headlines, dropping items without a title.
fn search_to_headlines(body: Value) -> Result<Vec<NewsHeadline>, DataError> {
    let resp: SearchResponse =
        serde_json::from_value(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    Ok(resp
        .news
        .into_iter()
        .filter_map(|n| {
            let title = n.title.filter(|t| !t.trim().is_empty())?;
            Some(NewsHeadline {
                title,
                publisher: n.publisher,
                link: n.link,
                published_at: n
                    .provider_publish_time
                    .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            })
        })
        .collect())
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError> {
        let url = format!("{}/{}", self.config.chart_url, ticker);
        // period2 is exclusive
        let period1 = start.and_hms_opt(0, 0, 0).map(|d| d.and_utc().timestamp());
        let period2 = (end + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .map(|d| d.and_utc().timestamp());
        let (Some(period1), Some(period2)) = (period1, period2) else {
            return Err(DataError::ParseError("invalid date range".into()));
        };

        info!(ticker, %start, %end, "Fetching daily prices");
        let body = self
            .get_json(
                &url,
                &[
                    ("period1", period1.to_string()),
                    ("period2", period2.to_string()),
                    ("interval", "1d".to_string()),
                    ("events", "history".to_string()),
                ],
            )
            .await?;

        let table = chart_to_table(ticker, body)?;
        debug!(ticker, rows = table.len(), "Received daily prices");
        Ok(table)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[async_trait]
impl FundamentalsProvider for YahooClient {
    async fn fetch_info(&self, ticker: &str) -> Result<FundamentalsSnapshot, DataError> {
        let url = format!("{}/{}", self.config.summary_url, ticker);
        let crumb = self.crumb().await?;
        let body = self.get_json(&url, &summary_params(crumb)).await?;

        summary_to_snapshot(ticker, &body)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[async_trait]
impl NewsProvider for YahooClient {
    async fn fetch_news(&self, ticker: &str) -> Result<Vec<NewsHeadline>, DataError> {
        let body = self
            .get_json(
                &self.config.search_url,
                &[
                    ("q", ticker.to_string()),
                    ("quotesCount", "0".to_string()),
                    ("newsCount", self.config.news_count.to_string()),
                ],
            )
            .await?;

        search_to_headlines(body)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chart_to_table() {
        let body = json!({
            "chart": {
                "result": [{
                    "meta": {"gmtoffset": -18000},
                    "timestamp": [1704205800, 1704292200],
                    "indicators": {"quote": [{
                        "open": [187.15, 184.22],
                        "high": [188.44, 185.88],
                        "low": [183.89, 183.43],
                        "close": [185.64, null],
                        "volume": [82488700, 58414500]
                    }]}
                }],
                "error": null
            }
        });

        let table = chart_to_table("AAPL", body).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dates()[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(table.column(PriceField::Close).unwrap(), &[Some(185.64), None]);
        assert_eq!(table.column(PriceField::Volume).unwrap()[0], Some(82488700.0));
    }

    #[test]
    fn test_chart_empty_range_keeps_close_column() {
        let body = json!({
            "chart": {
                "result": [{"meta": {"gmtoffset": 0}, "indicators": {"quote": [{}]}}],
                "error": null
            }
        });

        let table = chart_to_table("AAPL", body).unwrap();
        assert!(table.is_empty());
        assert!(table.has_column(PriceField::Close));
    }

    #[test]
    fn test_chart_missing_close_array() {
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": [1704205800],
                    "indicators": {"quote": [{"open": [1.0]}]}
                }],
                "error": null
            }
        });

        let table = chart_to_table("AAPL", body).unwrap();
        assert!(!table.has_column(PriceField::Close));
    }

    #[test]
    fn test_chart_not_found() {
        let body = json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        });

        let err = chart_to_table("NOPE", body).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_summary_to_snapshot() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "summaryDetail": {
                        "trailingPE": {"raw": 31.2, "fmt": "31.20"},
                        "marketCap": {"raw": 2950000000000.0, "fmt": "2.95T"}
                    },
                    "defaultKeyStatistics": {
                        "trailingEps": {"raw": 6.13, "fmt": "6.13"},
                        "priceToBook": {}
                    },
                    "financialData": {
                        "returnOnEquity": {"raw": 1.5608, "fmt": "156.08%"}
                    }
                }],
                "error": null
            }
        });

        let snapshot = summary_to_snapshot("AAPL", &body).unwrap();
        assert_eq!(snapshot.trailing_pe, Some(31.2));
        assert_eq!(snapshot.trailing_eps, Some(6.13));
        assert_eq!(snapshot.return_on_equity, Some(1.5608));
        assert_eq!(snapshot.market_cap, Some(2.95e12));
        assert!(snapshot.price_to_book.is_none());
        assert!(snapshot.debt_to_equity.is_none());
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb("  aB3/x.Yz9\n").unwrap(), "aB3/x.Yz9");
        assert!(parse_crumb("").is_err());
        assert!(parse_crumb("Too Many Requests").is_err());
        assert!(parse_crumb("<html><body>consent</body></html>").is_err());
    }

    #[test]
    fn test_summary_params_carry_crumb() {
        let params = summary_params("aB3/x.Yz9");
        assert!(params.contains(&("crumb", "aB3/x.Yz9".to_string())));
        let modules = params
            .iter()
            .find(|(k, _)| *k == "modules")
            .map(|(_, v)| v.as_str())
            .unwrap();
        assert!(modules.contains("financialData"));
        assert!(modules.contains("defaultKeyStatistics"));
    }

    #[tokio::test]
    async fn test_crumb_failure_is_an_error() {
        // Nothing listens on port 9 locally.
        let client = YahooClient::new(YahooConfig {
            cookie_url: "http://127.0.0.1:9/cookie".to_string(),
            crumb_url: "http://127.0.0.1:9/crumb".to_string(),
            timeout_secs: 2,
            ..YahooConfig::default()
        })
        .unwrap();

        assert!(client.fetch_info("AAPL").await.is_err());
        assert!(client.crumb.get().is_none());
    }

    #[test]
    fn test_search_to_headlines() {
        let body = json!({
            "news": [
                {"title": "Apple beats estimates", "publisher": "Reuters", "providerPublishTime": 1704205800},
                {"title": "   "},
                {"publisher": "Nobody"}
            ]
        });

        let headlines = search_to_headlines(body).unwrap();
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "Apple beats estimates");
        assert!(headlines[0].published_at.is_some());
    }

    #[test]
    fn test_search_without_news_key() {
        let headlines = search_to_headlines(json!({"quotes": []})).unwrap();
        assert!(headlines.is_empty());
    }
}
