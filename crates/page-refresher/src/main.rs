use std::sync::Arc;

use anyhow::Result;
use factor_table::FactorGenerator;
use market_snapshot::SnapshotFetcher;
use polygon_client::PolygonClient;

mod config;
mod driver;
mod symbols;

use config::RefreshConfig;
use driver::Refresher;

const DEFAULT_LOG_FILTER: &str =
    "page_refresher=info,html_updater=info,market_snapshot=info,factor_table=info,polygon_client=warn";

const USAGE: &str = "\
Usage: page-refresher [OPTIONS]

Refreshes the per-symbol report pages with the latest market data.

Options:
  --dry-run            Render pages without writing them
  --only KEYS          Comma-separated keys or tickers to refresh (e.g. tesla,NVDA)
  --site-root PATH     Directory holding the report pages (env SITE_ROOT)
  --with-news          Seed factor lists from recent headlines (env ENABLE_NEWS_FACTORS)
  -h, --help           Show this message
";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print!("{}", USAGE);
        return Ok(());
    }

    init_tracing();

    let config = RefreshConfig::from_env()?.apply_args(&args)?;
    tracing::info!(
        "Refreshing {} pages under {}{}",
        config.symbols.len(),
        config.site_root.display(),
        if config.dry_run { " (dry run)" } else { "" }
    );

    let polygon = Arc::new(PolygonClient::with_rate_limit(
        config.polygon_api_key.clone(),
        config.polygon_rate_limit,
    ));
    let factors = if config.enable_news_factors {
        tracing::info!("Headline seeding enabled");
        FactorGenerator::with_news(polygon.clone())
    } else {
        FactorGenerator::new()
    };
    let fetcher = SnapshotFetcher::new(polygon);

    let summary = Refresher::new(config, fetcher, factors).run().await;
    std::process::exit(summary.exit_code());
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter()).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter()).init();
    }
}
