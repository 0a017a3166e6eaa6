use chrono::{Local, NaiveDate};
use factor_table::FactorGenerator;
use html_updater::{PageUpdate, RewriteReport};
use market_snapshot::SnapshotFetcher;
use report_core::SymbolEntry;

use crate::config::RefreshConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Updated(RewriteReport),
    /// Dry run: the page was rendered but not written.
    Previewed(RewriteReport),
    MissingPage,
    NoData,
    UpdateFailed(String),
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EntryOutcome::Updated(_) | EntryOutcome::Previewed(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    /// Keys of the entries that failed, in processing order.
    pub failures: Vec<String>,
}

impl RunSummary {
    pub fn exit_code(&self) -> i32 {
        if self.failures.is_empty() {
            0
        } else {
            1
        }
    }
}

pub struct Refresher {
    config: RefreshConfig,
    fetcher: SnapshotFetcher,
    factors: FactorGenerator,
}

impl Refresher {
    pub fn new(config: RefreshConfig, fetcher: SnapshotFetcher, factors: FactorGenerator) -> Self {
        Self {
            config,
            fetcher,
            factors,
        }
    }

    pub async fn run(&self) -> RunSummary {
        self.run_as_of(Local::now().date_naive()).await
    }

    /// Refresh every configured entry in order, stamping pages with `as_of`.
    pub async fn run_as_of(&self, as_of: NaiveDate) -> RunSummary {
        let mut summary = RunSummary {
            total: self.config.symbols.len(),
            ..RunSummary::default()
        };

        for entry in &self.config.symbols {
            tracing::info!("{} {} ({}) refreshing", entry.icon, entry.display_name, entry.ticker);

            let outcome = self.refresh_entry(entry, as_of).await;
            match &outcome {
                EntryOutcome::Updated(_) => {
                    tracing::info!("{} {} updated {}", entry.icon, entry.ticker, entry.html_file)
                }
                EntryOutcome::Previewed(report) => tracing::info!(
                    "{} {} dry run: {} rows, {} up, {} down",
                    entry.icon,
                    entry.ticker,
                    report.rows_updated,
                    report.up_items,
                    report.down_items
                ),
                EntryOutcome::MissingPage => {
                    tracing::error!("{} {}: {} not found", entry.icon, entry.ticker, entry.html_file)
                }
                EntryOutcome::NoData => {
                    tracing::error!("{} {}: no market data, page not updated", entry.icon, entry.ticker)
                }
                EntryOutcome::UpdateFailed(e) => {
                    tracing::error!("{} {}: update failed: {}", entry.icon, entry.ticker, e)
                }
            }

            if outcome.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failures.push(entry.key.clone());
            }
        }

        html_updater::refresh_index(&self.config.index_path());

        tracing::info!("{}/{} pages refreshed", summary.succeeded, summary.total);
        if !summary.failures.is_empty() {
            tracing::warn!("failed: {}", summary.failures.join(", "));
        }
        summary
    }

    pub async fn refresh_entry(&self, entry: &SymbolEntry, as_of: NaiveDate) -> EntryOutcome {
        let path = self.config.page_path(entry);
        if !path.is_file() {
            return EntryOutcome::MissingPage;
        }

        let snapshot = self.fetcher.fetch(&entry.ticker).await;
        if snapshot.is_unavailable() {
            return EntryOutcome::NoData;
        }

        let factors = self.factors.generate(&entry.ticker).await;
        let update = PageUpdate {
            display_name: &entry.display_name,
            snapshot: &snapshot,
            factors: &factors,
            as_of,
            attribution: &self.config.attribution,
        };

        let result = if self.config.dry_run {
            html_updater::preview_document(&path, &update).map(EntryOutcome::Previewed)
        } else {
            html_updater::update_document(&path, &update).map(EntryOutcome::Updated)
        };
        result.unwrap_or_else(|e| EntryOutcome::UpdateFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::default_symbols;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use report_core::{Bar, PriceHistorySource, ReportError};
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><body>
<div class="score-title">placeholder</div>
<table class="performance-table">
<thead><tr><th>기간</th><th>수익률</th></tr></thead>
<tbody>
<tr><td>5일</td><td>-</td></tr>
<tr><td>30일</td><td>-</td></tr>
<tr><td>1년</td><td>-</td></tr>
</tbody>
</table>
<div class="section up"><div class="item"><strong>old</strong> old text</div></div>
<div class="section down"><div class="item"><strong>old</strong> old text</div></div>
<div class="estimated">(01월 01일 기준)</div>
</body></html>"#;

    /// Rising closes for every ticker except those listed as empty.
    struct ScriptedHistory {
        empty: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedHistory {
        fn new(empty: Vec<&'static str>) -> Self {
            Self {
                empty,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PriceHistorySource for ScriptedHistory {
        async fn daily_history(&self, symbol: &str, _lookback_days: i64) -> Result<Vec<Bar>, ReportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.empty.contains(&symbol) {
                return Ok(Vec::new());
            }
            let start = Utc.with_ymd_and_hms(2025, 1, 2, 21, 0, 0).unwrap();
            Ok((0..260)
                .map(|i| {
                    let close = 100.0 + i as f64;
                    Bar {
                        timestamp: start + Duration::days(i),
                        open: close,
                        high: close,
                        low: close,
                        close,
                        volume: 1_000.0,
                    }
                })
                .collect())
        }
    }

    fn site(pages: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for page in pages {
            fs::write(dir.path().join(page), PAGE).unwrap();
        }
        dir
    }

    fn all_pages() -> Vec<String> {
        default_symbols().into_iter().map(|e| e.html_file).collect()
    }

    fn config(root: &Path, dry_run: bool) -> RefreshConfig {
        RefreshConfig {
            site_root: root.to_path_buf(),
            index_page: "index.html".into(),
            symbols: default_symbols(),
            attribution: "test desk".to_string(),
            enable_news_factors: false,
            dry_run,
            polygon_api_key: "unused".to_string(),
            polygon_rate_limit: 5,
        }
    }

    fn refresher(config: RefreshConfig, source: Arc<ScriptedHistory>) -> Refresher {
        Refresher::new(config, SnapshotFetcher::new(source), FactorGenerator::new())
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 18).unwrap()
    }

    #[tokio::test]
    async fn test_empty_history_fails_only_that_entry() {
        let pages = all_pages();
        let dir = site(&pages.iter().map(String::as_str).collect::<Vec<_>>());
        let source = Arc::new(ScriptedHistory::new(vec!["AAPL"]));

        let summary = refresher(config(dir.path(), false), source.clone())
            .run_as_of(as_of())
            .await;

        assert_eq!(summary.total, 6);
        assert_eq!(summary.succeeded, 5);
        assert_eq!(summary.failures, vec!["apple".to_string()]);
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 6);

        assert_eq!(fs::read_to_string(dir.path().join("apple.html")).unwrap(), PAGE);
        let tesla = fs::read_to_string(dir.path().join("tesla.html")).unwrap();
        assert!(tesla.contains("테슬라 : $359.00 (+0.28%)"));
        assert!(tesla.contains("(09월 18일 기준, test desk)"));
    }

    #[tokio::test]
    async fn test_all_entries_succeed() {
        let pages = all_pages();
        let dir = site(&pages.iter().map(String::as_str).collect::<Vec<_>>());
        let source = Arc::new(ScriptedHistory::new(vec![]));

        let summary = refresher(config(dir.path(), false), source)
            .run_as_of(as_of())
            .await;

        assert_eq!(summary.succeeded, 6);
        assert!(summary.failures.is_empty());
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_missing_page_skips_fetch() {
        let dir = site(&["tesla.html"]);
        let source = Arc::new(ScriptedHistory::new(vec![]));
        let mut config = config(dir.path(), false);
        config.symbols.truncate(2);

        let summary = refresher(config, source.clone()).run_as_of(as_of()).await;

        assert_eq!(summary.failures, vec!["nvidia".to_string()]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dry_run_leaves_pages_untouched() {
        let dir = site(&["tesla.html"]);
        let source = Arc::new(ScriptedHistory::new(vec![]));
        let mut config = config(dir.path(), true);
        config.symbols.truncate(1);
        let refresher = refresher(config, source);

        let entry = &default_symbols()[0];
        match refresher.refresh_entry(entry, as_of()).await {
            EntryOutcome::Previewed(report) => {
                assert_eq!(report.rows_updated, 3);
                assert_eq!(report.up_items, 1);
                assert_eq!(report.down_items, 1);
                assert!(report.footer);
            }
            other => panic!("expected preview, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(dir.path().join("tesla.html")).unwrap(), PAGE);
    }
}
