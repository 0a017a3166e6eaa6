use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// One report page and the equity it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub key: String,
    pub ticker: String,
    pub html_file: String,
    pub display_name: String,
    pub icon: String,
}

impl SymbolEntry {
    pub fn new(
        key: impl Into<String>,
        ticker: impl Into<String>,
        html_file: impl Into<String>,
        display_name: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            ticker: ticker.into(),
            html_file: html_file.into(),
            display_name: display_name.into(),
            icon: icon.into(),
        }
    }

    /// True when `name` is this entry's key or ticker (ticker compared case-insensitively).
    pub fn matches(&self, name: &str) -> bool {
        self.key == name || self.ticker.eq_ignore_ascii_case(name)
    }
}

/// Latest close against the prior session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub latest_close: f64,
    pub prior_close: f64,
    pub daily_change_pct: f64,
}

/// Trailing windows shown in the performance table, in row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrailingWindow {
    #[serde(rename = "5d")]
    FiveDay,
    #[serde(rename = "30d")]
    ThirtyDay,
    #[serde(rename = "1y")]
    OneYear,
}

impl TrailingWindow {
    /// Table row order: row 0 is 5d, row 1 is 30d, row 2 is 1y.
    pub const ALL: [TrailingWindow; 3] = [
        TrailingWindow::FiveDay,
        TrailingWindow::ThirtyDay,
        TrailingWindow::OneYear,
    ];

    /// Number of trading sessions the window spans.
    pub fn sessions(&self) -> usize {
        match self {
            TrailingWindow::FiveDay => 5,
            TrailingWindow::ThirtyDay => 30,
            TrailingWindow::OneYear => 250,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrailingWindow::FiveDay => "5d",
            TrailingWindow::ThirtyDay => "30d",
            TrailingWindow::OneYear => "1y",
        }
    }

    /// Window bound to a performance-table body row, if any.
    pub fn for_row(row: usize) -> Option<Self> {
        Self::ALL.get(row).copied()
    }
}

/// Percent returns keyed by window. Windows without enough history are absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReturnSet(BTreeMap<TrailingWindow, f64>);

impl ReturnSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, window: TrailingWindow, pct: f64) {
        self.0.insert(window, pct);
    }

    pub fn get(&self, window: TrailingWindow) -> Option<f64> {
        self.0.get(&window).copied()
    }

    pub fn contains(&self, window: TrailingWindow) -> bool {
        self.0.contains_key(&window)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrailingWindow, f64)> + '_ {
        self.0.iter().map(|(w, v)| (*w, *v))
    }
}

impl FromIterator<(TrailingWindow, f64)> for ReturnSet {
    fn from_iter<I: IntoIterator<Item = (TrailingWindow, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything the fetcher derives for one ticker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub price: PriceSnapshot,
    pub returns: ReturnSet,
}

impl MarketSnapshot {
    /// The (0, 0, {}) result used when no usable data came back.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_unavailable(&self) -> bool {
        self.price.latest_close == 0.0
    }
}

/// Bullish and bearish narrative lines, consumed positionally by the page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FactorLists {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

/// Sentiment a provider attached to a headline for the requested ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadlineSentiment {
    Positive,
    Negative,
    Neutral,
}

/// A news headline as seen by the factor generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub description: Option<String>,
    pub sentiment: Option<HeadlineSentiment>,
}

impl Headline {
    /// `"{title}: {description}"`, or the bare title.
    pub fn as_factor(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => format!("{}: {}", self.title.trim(), desc),
            _ => self.title.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_row_mapping() {
        assert_eq!(TrailingWindow::for_row(0), Some(TrailingWindow::FiveDay));
        assert_eq!(TrailingWindow::for_row(1), Some(TrailingWindow::ThirtyDay));
        assert_eq!(TrailingWindow::for_row(2), Some(TrailingWindow::OneYear));
        assert_eq!(TrailingWindow::for_row(3), None);
    }

    #[test]
    fn test_unavailable_snapshot() {
        let snapshot = MarketSnapshot::unavailable();
        assert!(snapshot.is_unavailable());
        assert!(snapshot.returns.is_empty());
        assert_eq!(snapshot.price.daily_change_pct, 0.0);
    }

    #[test]
    fn test_symbol_entry_matches_key_or_ticker() {
        let entry = SymbolEntry::new("apple", "AAPL", "apple.html", "애플", "🍎");
        assert!(entry.matches("apple"));
        assert!(entry.matches("aapl"));
        assert!(!entry.matches("tesla"));
    }

    #[test]
    fn test_headline_as_factor() {
        let with_desc = Headline {
            title: "Record quarter".to_string(),
            description: Some(" Revenue up 20% ".to_string()),
            sentiment: Some(HeadlineSentiment::Positive),
        };
        assert_eq!(with_desc.as_factor(), "Record quarter: Revenue up 20%");

        let bare = Headline {
            title: "Guidance cut".to_string(),
            description: Some("   ".to_string()),
            sentiment: None,
        };
        assert_eq!(bare.as_factor(), "Guidance cut");
    }
}
