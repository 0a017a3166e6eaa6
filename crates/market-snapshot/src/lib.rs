//! Latest close, day-over-day change and trailing returns for one ticker.
//!
//! The fetcher never fails: an empty or errored history collapses into
//! [`MarketSnapshot::unavailable`] so the caller only has to check one flag.

use report_core::{Bar, MarketSnapshot, PriceHistorySource, PriceSnapshot, ReturnSet, TrailingWindow};
use std::sync::Arc;

/// Calendar days of history requested per ticker.
pub const HISTORY_LOOKBACK_DAYS: i64 = 365;

/// Percent change from `from` to `to`. A zero base yields 0.
pub fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    (to - from) / from * 100.0
}

/// Latest close against the previous session. One bar compares against itself.
pub fn price_snapshot(bars: &[Bar]) -> Option<PriceSnapshot> {
    let latest = bars.last()?.close;
    let prior = if bars.len() > 1 {
        bars[bars.len() - 2].close
    } else {
        latest
    };

    Some(PriceSnapshot {
        latest_close: latest,
        prior_close: prior,
        daily_change_pct: pct_change(prior, latest),
    })
}

/// Return over `window`, or `None` when the history is shorter than the window.
///
/// The short windows compare against the close `window.sessions()` bars before
/// the latest one, falling back to the oldest bar for a history of exactly that
/// many bars. The one-year window always compares against the oldest bar of the
/// requested year.
pub fn trailing_return(bars: &[Bar], window: TrailingWindow) -> Option<f64> {
    let sessions = window.sessions();
    if bars.len() < sessions {
        return None;
    }
    let latest = bars.last()?.close;
    let reference = match window {
        TrailingWindow::OneYear => bars.first()?.close,
        _ => bars[bars.len().saturating_sub(sessions + 1)].close,
    };
    Some(pct_change(reference, latest))
}

pub fn trailing_returns(bars: &[Bar]) -> ReturnSet {
    TrailingWindow::ALL
        .iter()
        .filter_map(|w| trailing_return(bars, *w).map(|pct| (*w, pct)))
        .collect()
}

/// `5d +1.23%, 30d -0.40%` style summary for logs.
pub fn describe_returns(returns: &ReturnSet) -> String {
    returns
        .iter()
        .map(|(window, pct)| format!("{} {:+.2}%", window.label(), pct))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collapse a price history into a snapshot. Empty history is unavailable.
pub fn summarize(bars: &[Bar]) -> MarketSnapshot {
    match price_snapshot(bars) {
        Some(price) => MarketSnapshot {
            price,
            returns: trailing_returns(bars),
        },
        None => MarketSnapshot::unavailable(),
    }
}

/// Pulls a year of daily bars and summarizes them.
pub struct SnapshotFetcher {
    source: Arc<dyn PriceHistorySource>,
}

impl SnapshotFetcher {
    pub fn new(source: Arc<dyn PriceHistorySource>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, symbol: &str) -> MarketSnapshot {
        let bars = match self.source.daily_history(symbol, HISTORY_LOOKBACK_DAYS).await {
            Ok(bars) => bars,
            Err(e) => {
                tracing::error!("{}: price history request failed: {}", symbol, e);
                return MarketSnapshot::unavailable();
            }
        };

        if bars.is_empty() {
            tracing::warn!("{}: no price history returned", symbol);
            return MarketSnapshot::unavailable();
        }

        let snapshot = summarize(&bars);
        tracing::info!(
            "{}: ${:.2} ({:+.2}%), {} bars, returns [{}]",
            symbol,
            snapshot.price.latest_close,
            snapshot.price.daily_change_pct,
            bars.len(),
            describe_returns(&snapshot.returns)
        );
        snapshot
    }
}
