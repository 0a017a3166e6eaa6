//! Summary page listing every symbol.
//!
//! The price blocks on this page are hand-maintained. A refresh run only
//! reports whether the page exists; it never writes to it.

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// No index page at the given path.
    Skipped,
    /// Page exists and was not modified.
    LeftUnchanged,
}

pub fn refresh_index(path: &Path) -> IndexOutcome {
    if !path.is_file() {
        tracing::info!("{} not found, skipping index page", path.display());
        return IndexOutcome::Skipped;
    }
    tracing::info!("{} left unchanged (index price blocks are not rewritten)", path.display());
    IndexOutcome::LeftUnchanged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_index_is_skipped() {
        let dir = TempDir::new().unwrap();
        assert_eq!(refresh_index(&dir.path().join("index.html")), IndexOutcome::Skipped);
    }

    #[test]
    fn test_existing_index_is_not_modified() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        let body = "<div class=\"price\">$1.00</div>\n<div class=\"change positive\">+1.00%</div>";
        fs::write(&path, body).unwrap();

        assert_eq!(refresh_index(&path), IndexOutcome::LeftUnchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), body);
    }
}
