//! Narrative "positive/negative factor" lines for a report page.

mod table;

use report_core::{FactorLists, Headline, HeadlineSentiment, NewsSource};
use std::sync::Arc;

/// Headlines requested per ticker when news seeding is on.
pub const DEFAULT_HEADLINE_LIMIT: u32 = 10;

/// Static factors for `symbol`, or the generic fallback with the ticker
/// worked into the first line of each list.
pub fn factors(symbol: &str) -> FactorLists {
    match table::lookup(symbol) {
        Some(entry) => FactorLists {
            positive: entry.positive.iter().map(|s| s.to_string()).collect(),
            negative: entry.negative.iter().map(|s| s.to_string()).collect(),
        },
        None => FactorLists {
            positive: fallback(symbol, table::FALLBACK_POSITIVE_LEAD, table::FALLBACK_POSITIVE),
            negative: fallback(symbol, table::FALLBACK_NEGATIVE_LEAD, table::FALLBACK_NEGATIVE),
        },
    }
}

fn fallback(symbol: &str, lead: &str, rest: &[&str]) -> Vec<String> {
    std::iter::once(format!("{} {}", symbol, lead))
        .chain(rest.iter().map(|s| s.to_string()))
        .collect()
}

/// Put sentiment-tagged headlines at the front of the matching list.
/// Both lists keep their original length; neutral or untagged headlines are ignored.
pub fn seed_with_headlines(base: FactorLists, headlines: &[Headline]) -> FactorLists {
    let pick = |sentiment: HeadlineSentiment| -> Vec<String> {
        headlines
            .iter()
            .filter(|h| h.sentiment == Some(sentiment))
            .map(Headline::as_factor)
            .filter(|s| !s.is_empty())
            .collect()
    };

    FactorLists {
        positive: prepend(pick(HeadlineSentiment::Positive), base.positive),
        negative: prepend(pick(HeadlineSentiment::Negative), base.negative),
    }
}

fn prepend(front: Vec<String>, base: Vec<String>) -> Vec<String> {
    let len = base.len();
    front.into_iter().chain(base).take(len).collect()
}

/// Static factors, optionally seeded from a news source.
pub struct FactorGenerator {
    news: Option<Arc<dyn NewsSource>>,
    headline_limit: u32,
}

impl FactorGenerator {
    pub fn new() -> Self {
        Self {
            news: None,
            headline_limit: DEFAULT_HEADLINE_LIMIT,
        }
    }

    pub fn with_news(news: Arc<dyn NewsSource>) -> Self {
        Self {
            news: Some(news),
            headline_limit: DEFAULT_HEADLINE_LIMIT,
        }
    }

    pub async fn generate(&self, symbol: &str) -> FactorLists {
        let base = factors(symbol);
        let Some(news) = &self.news else {
            return base;
        };

        match news.headlines(symbol, self.headline_limit).await {
            Ok(headlines) => {
                tracing::debug!("{}: seeding factors from {} headlines", symbol, headlines.len());
                seed_with_headlines(base, &headlines)
            }
            Err(e) => {
                tracing::warn!("{}: news lookup failed, using static factors: {}", symbol, e);
                base
            }
        }
    }
}

impl Default for FactorGenerator {
    fn default() -> Self {
        Self::new()
    }
}
