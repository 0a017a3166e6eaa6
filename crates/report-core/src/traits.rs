use async_trait::async_trait;
use crate::{Bar, Headline, ReportError};

/// Source of daily price history, oldest bar first.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    async fn daily_history(&self, symbol: &str, lookback_days: i64) -> Result<Vec<Bar>, ReportError>;
}

/// Source of recent news headlines for a ticker.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn headlines(&self, symbol: &str, limit: u32) -> Result<Vec<Headline>, ReportError>;
}
