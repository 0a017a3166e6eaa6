use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use report_core::{Bar, Headline, HeadlineSentiment, NewsSource, PriceHistorySource, ReportError};
use reqwest::Client;
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://api.polygon.io";

/// Requests per minute on paid plans. The free tier allows 5.
pub const DEFAULT_RATE_LIMIT: usize = 500;

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Wait until the oldest request falls out of the window
            let Some(&oldest) = ts.front() else { continue };
            let sleep_dur = (oldest + self.window).saturating_duration_since(now)
                + Duration::from_millis(50);
            drop(ts);
            tracing::debug!("Rate limiter: waiting {:.1}s for Polygon API slot", sleep_dur.as_secs_f64());
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

#[derive(Clone)]
pub struct PolygonClient {
    api_key: String,
    base_url: String,
    client: Client,
    rate_limiter: RateLimiter,
}

impl PolygonClient {
    pub fn with_rate_limit(api_key: String, requests_per_minute: usize) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            client,
            rate_limiter: RateLimiter::new(requests_per_minute, Duration::from_secs(60)),
        }
    }

    /// Point the client at another host, e.g. a recording proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ReportError> {
        let request = builder.build().map_err(|e| ReportError::ApiError(e.to_string()))?;

        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let req_clone = request.try_clone()
                .ok_or_else(|| ReportError::ApiError("Cannot clone request".to_string()))?;
            let response = self.client.execute(req_clone).await
                .map_err(|e| ReportError::ApiError(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 15u64;
            tracing::warn!("Polygon 429 rate limited, waiting {}s before retry {}/3", wait_secs, attempt + 1);
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(ReportError::RateLimited("Rate limited by Polygon after 3 retries".to_string()))
    }

    /// Get aggregates (bars) for a symbol, oldest first
    pub async fn get_aggregates(
        &self,
        symbol: &str,
        multiplier: u32,
        timespan: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ReportError> {
        let url = format!(
            "{}/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
            self.base_url,
            symbol,
            multiplier,
            timespan,
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        );

        let response = self.send_request(
            self.client.get(&url).query(&[
                ("apiKey", self.api_key.as_str()),
                ("adjusted", "true"),
                ("sort", "asc"),
                ("limit", "50000"),
            ])
        ).await?;

        if !response.status().is_success() {
            return Err(ReportError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let agg_response: AggregateResponse = response
            .json()
            .await
            .map_err(|e| ReportError::ApiError(e.to_string()))?;

        Ok(agg_response.into_bars())
    }

    /// Get news headlines mentioning a symbol, newest first
    pub async fn get_news(&self, symbol: &str, limit: u32) -> Result<Vec<Headline>, ReportError> {
        let url = format!("{}/v2/reference/news", self.base_url);

        let response = self.send_request(
            self.client.get(&url).query(&[
                ("apiKey", self.api_key.clone()),
                ("ticker", symbol.to_string()),
                ("limit", limit.to_string()),
                ("order", "desc".to_string()),
            ])
        ).await?;

        if !response.status().is_success() {
            return Err(ReportError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let news_response: NewsResponse = response
            .json()
            .await
            .map_err(|e| ReportError::ApiError(e.to_string()))?;

        Ok(news_response
            .results
            .into_iter()
            .map(|r| r.into_headline(symbol))
            .collect())
    }
}

#[async_trait]
impl PriceHistorySource for PolygonClient {
    async fn daily_history(&self, symbol: &str, lookback_days: i64) -> Result<Vec<Bar>, ReportError> {
        let now = Utc::now();
        self.get_aggregates(symbol, 1, "day", now - ChronoDuration::days(lookback_days), now)
            .await
    }
}

#[async_trait]
impl NewsSource for PolygonClient {
    async fn headlines(&self, symbol: &str, limit: u32) -> Result<Vec<Headline>, ReportError> {
        self.get_news(symbol, limit).await
    }
}

// Response structures
#[derive(Debug, Deserialize)]
struct AggregateResponse {
    #[serde(default)]
    results: Vec<AggregateResult>,
}

#[derive(Debug, Deserialize)]
struct AggregateResult {
    t: i64, // timestamp (ms)
    o: f64, // open
    h: f64, // high
    l: f64, // low
    c: f64, // close
    #[serde(default)]
    v: f64, // volume
}

impl AggregateResponse {
    fn into_bars(self) -> Vec<Bar> {
        let mut bars: Vec<Bar> = self
            .results
            .into_iter()
            .filter_map(|r| {
                Some(Bar {
                    timestamp: DateTime::from_timestamp_millis(r.t)?,
                    open: r.o,
                    high: r.h,
                    low: r.l,
                    close: r.c,
                    volume: r.v,
                })
            })
            .collect();
        bars.sort_by_key(|b| b.timestamp);
        bars
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<NewsResult>,
}

#[derive(Debug, Deserialize)]
struct NewsResult {
    title: String,
    description: Option<String>,
    #[serde(default)]
    insights: Vec<NewsInsight>,
}

#[derive(Debug, Deserialize)]
struct NewsInsight {
    ticker: String,
    sentiment: Option<String>,
}

impl NewsResult {
    fn into_headline(self, symbol: &str) -> Headline {
        let sentiment = self
            .insights
            .iter()
            .find(|i| i.ticker.eq_ignore_ascii_case(symbol))
            .and_then(|i| i.sentiment.as_deref())
            .and_then(|s| match s.to_ascii_lowercase().as_str() {
                "positive" => Some(HeadlineSentiment::Positive),
                "negative" => Some(HeadlineSentiment::Negative),
                "neutral" => Some(HeadlineSentiment::Neutral),
                _ => None,
            });

        Headline {
            title: self.title,
            description: self.description,
            sentiment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregates_sorted_oldest_first() {
        let body = r#"{
            "ticker": "AAPL",
            "results": [
                {"t": 1700179200000, "o": 2.0, "h": 2.5, "l": 1.5, "c": 2.2, "v": 100.0},
                {"t": 1700092800000, "o": 1.0, "h": 1.5, "l": 0.5, "c": 1.2, "v": 90.0}
            ]
        }"#;
        let parsed: AggregateResponse = serde_json::from_str(body).unwrap();
        let bars = parsed.into_bars();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 1.2);
        assert_eq!(bars[1].close, 2.2);
    }

    #[test]
    fn test_aggregates_missing_results_is_empty() {
        let parsed: AggregateResponse =
            serde_json::from_str(r#"{"ticker": "AAPL", "resultsCount": 0}"#).unwrap();
        assert!(parsed.into_bars().is_empty());
    }

    #[test]
    fn test_news_sentiment_taken_from_matching_insight() {
        let body = r#"{
            "results": [{
                "title": "Chip demand keeps climbing",
                "description": "Datacenter orders beat estimates",
                "insights": [
                    {"ticker": "AMD", "sentiment": "negative"},
                    {"ticker": "NVDA", "sentiment": "positive"}
                ]
            }, {
                "title": "Sector roundup",
                "description": null
            }]
        }"#;
        let parsed: NewsResponse = serde_json::from_str(body).unwrap();
        let headlines: Vec<Headline> = parsed
            .results
            .into_iter()
            .map(|r| r.into_headline("nvda"))
            .collect();

        assert_eq!(headlines[0].sentiment, Some(HeadlineSentiment::Positive));
        assert_eq!(headlines[1].sentiment, None);
        assert_eq!(headlines[1].description, None);
    }

    #[tokio::test]
    async fn test_rate_limiter_admits_up_to_limit_without_waiting() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(limiter.timestamps.lock().await.len(), 3);
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let client = PolygonClient::with_rate_limit("key".to_string(), 5)
            .with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
