//! In-place refresh of a hand-authored report page.
//!
//! A page is addressed only through the class contract in [`markup`]:
//! the price title, the performance table, the `up`/`down` narrative
//! sections and the `estimated` footer. Each is rewritten independently and
//! a missing node only skips its own step.

pub mod error;
pub mod format;
pub mod index_page;
pub mod markup;
pub mod rewrite;
pub mod scan;

pub use error::UpdateError;
pub use index_page::{refresh_index, IndexOutcome};
pub use rewrite::RewriteReport;

use chrono::NaiveDate;
use report_core::{FactorLists, MarketSnapshot};
use std::fs;
use std::path::Path;

/// Attribution appended to the footer date unless configured otherwise.
pub const DEFAULT_ATTRIBUTION: &str = "estimated by Justin Kim Research";

/// Data written into one page.
#[derive(Debug, Clone)]
pub struct PageUpdate<'a> {
    pub display_name: &'a str,
    pub snapshot: &'a MarketSnapshot,
    pub factors: &'a FactorLists,
    pub as_of: NaiveDate,
    pub attribution: &'a str,
}

/// Rewrite `html` in memory.
pub fn render(html: &str, update: &PageUpdate<'_>) -> Result<(String, RewriteReport), UpdateError> {
    let scan = scan::scan(html);
    rewrite::apply(html, &scan, update)
}

/// Read the page at `path`, rewrite it and write it back over the original.
pub fn update_document(path: &Path, update: &PageUpdate<'_>) -> Result<RewriteReport, UpdateError> {
    let html = read_page(path)?;
    let (output, report) = render(&html, update)?;

    fs::write(path, output).map_err(|source| UpdateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        "{}: title={:?} rows={} up={} down={} footer={}",
        path.display(),
        report.title,
        report.rows_updated,
        report.up_items,
        report.down_items,
        report.footer
    );
    Ok(report)
}

/// Like [`update_document`] but leaves the file untouched.
pub fn preview_document(path: &Path, update: &PageUpdate<'_>) -> Result<RewriteReport, UpdateError> {
    let html = read_page(path)?;
    render(&html, update).map(|(_, report)| report)
}

fn read_page(path: &Path) -> Result<String, UpdateError> {
    if !path.is_file() {
        return Err(UpdateError::MissingFile(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| UpdateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
