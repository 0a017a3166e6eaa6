use anyhow::{bail, Context, Result};
use html_updater::DEFAULT_ATTRIBUTION;
use polygon_client::DEFAULT_RATE_LIMIT;
use report_core::SymbolEntry;
use std::env;
use std::path::PathBuf;

use crate::symbols::default_symbols;

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    // Pages
    pub site_root: PathBuf,
    pub index_page: PathBuf,
    pub symbols: Vec<SymbolEntry>,
    pub attribution: String,

    // Behaviour
    pub enable_news_factors: bool,
    pub dry_run: bool,

    // External APIs
    pub polygon_api_key: String,
    /// Requests per minute. Free tier users should set POLYGON_RATE_LIMIT=5.
    pub polygon_rate_limit: usize,
}

impl RefreshConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self {
            site_root: var("SITE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            index_page: var("INDEX_PAGE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("index.html")),
            symbols: default_symbols(),
            attribution: var("REPORT_ATTRIBUTION")
                .unwrap_or_else(|| DEFAULT_ATTRIBUTION.to_string()),

            enable_news_factors: var("ENABLE_NEWS_FACTORS")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .context("ENABLE_NEWS_FACTORS must be true or false")?,
            dry_run: false,

            polygon_api_key: var("POLYGON_API_KEY")
                .filter(|k| !k.trim().is_empty())
                .context("POLYGON_API_KEY not set")?,
            polygon_rate_limit: match var("POLYGON_RATE_LIMIT") {
                Some(v) => v
                    .trim()
                    .parse()
                    .context("POLYGON_RATE_LIMIT must be a whole number")?,
                None => DEFAULT_RATE_LIMIT,
            },
        };

        if config.polygon_rate_limit == 0 {
            bail!("POLYGON_RATE_LIMIT must be at least 1");
        }

        Ok(config)
    }

    /// Apply command-line overrides on top of the environment.
    pub fn apply_args(mut self, args: &[String]) -> Result<Self> {
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--dry-run" => self.dry_run = true,
                "--with-news" => self.enable_news_factors = true,
                "--site-root" => {
                    let value = iter.next().context("--site-root needs a path")?;
                    self.site_root = PathBuf::from(value);
                }
                "--only" => {
                    let value = iter.next().context("--only needs a comma-separated list")?;
                    self.symbols = select_symbols(&self.symbols, value)?;
                }
                other => bail!("unknown argument: {}", other),
            }
        }
        Ok(self)
    }

    pub fn page_path(&self, entry: &SymbolEntry) -> PathBuf {
        self.site_root.join(&entry.html_file)
    }

    pub fn index_path(&self) -> PathBuf {
        self.site_root.join(&self.index_page)
    }
}

/// Entries named in `list` (keys or tickers), kept in table order.
fn select_symbols(symbols: &[SymbolEntry], list: &str) -> Result<Vec<SymbolEntry>> {
    let names: Vec<&str> = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(unknown) = names.iter().find(|n| !symbols.iter().any(|e| e.matches(n))) {
        bail!("unknown symbol in --only: {}", unknown);
    }

    Ok(symbols
        .iter()
        .filter(|e| names.iter().any(|n| e.matches(n)))
        .cloned()
        .collect())
}
