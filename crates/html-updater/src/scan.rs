//! Structural read of a page: which of the addressable nodes exist and what
//! shape they have. The rewrite pass streams the document and cannot look
//! ahead, so it decides per node from this scan.

use crate::markup::{self, Section, TitleVariant};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

fn compile(css: &str) -> Selector {
    Selector::parse(css).expect("markup selectors are valid CSS")
}

static CURRENT_TITLE: LazyLock<Selector> = LazyLock::new(|| compile(TitleVariant::Current.selector()));
static LEGACY_TITLE: LazyLock<Selector> = LazyLock::new(|| compile(TitleVariant::Legacy.selector()));
static PERFORMANCE_TABLE: LazyLock<Selector> = LazyLock::new(|| compile(markup::PERFORMANCE_TABLE));
static UP_SECTION: LazyLock<Selector> = LazyLock::new(|| compile(Section::Up.selector()));
static DOWN_SECTION: LazyLock<Selector> = LazyLock::new(|| compile(Section::Down.selector()));
static FOOTER: LazyLock<Selector> = LazyLock::new(|| compile(markup::FOOTER));
static ROW: LazyLock<Selector> = LazyLock::new(|| compile(markup::ROW));
static HEADER_ROW: LazyLock<Selector> = LazyLock::new(|| compile(markup::HEADER_ROW));
static CELL: LazyLock<Selector> = LazyLock::new(|| compile(markup::CELL));
static ITEM: LazyLock<Selector> = LazyLock::new(|| compile(markup::ITEM));
static EMPHASIS: LazyLock<Selector> = LazyLock::new(|| compile(markup::EMPHASIS));

/// First element in document order matching `selector`.
pub fn locate<'a>(doc: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    doc.select(selector).next()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentScan {
    /// Title variant to rewrite, if any is present.
    pub title: Option<TitleVariant>,
    /// For each body row of the performance table, its ordinal among all
    /// `tr` elements of that table.
    pub body_rows: Vec<usize>,
    /// Per `div.item` of the up section: whether it holds an emphasis node.
    pub up_items: Vec<bool>,
    pub down_items: Vec<bool>,
    pub has_footer: bool,
}

impl DocumentScan {
    pub fn items(&self, section: Section) -> &[bool] {
        match section {
            Section::Up => &self.up_items,
            Section::Down => &self.down_items,
        }
    }

    /// Body-row index of the table row with the given ordinal.
    pub fn body_row_index(&self, row_ordinal: usize) -> Option<usize> {
        self.body_rows.iter().position(|&o| o == row_ordinal)
    }
}

pub fn scan(html: &str) -> DocumentScan {
    let doc = Html::parse_document(html);

    let title = TitleVariant::LOOKUP_ORDER.into_iter().find(|variant| {
        let selector = match variant {
            TitleVariant::Current => &*CURRENT_TITLE,
            TitleVariant::Legacy => &*LEGACY_TITLE,
        };
        locate(&doc, selector).is_some()
    });

    DocumentScan {
        title,
        body_rows: locate(&doc, &PERFORMANCE_TABLE)
            .map(body_rows)
            .unwrap_or_default(),
        up_items: locate(&doc, &UP_SECTION).map(item_shapes).unwrap_or_default(),
        down_items: locate(&doc, &DOWN_SECTION).map(item_shapes).unwrap_or_default(),
        has_footer: locate(&doc, &FOOTER).is_some(),
    }
}

/// Rows outside the header that hold at least one `td`. The header is the
/// `thead`, or the first row when the table has none.
fn body_rows(table: ElementRef<'_>) -> Vec<usize> {
    let mut header_rows: HashSet<_> = table.select(&HEADER_ROW).map(|row| row.id()).collect();
    if header_rows.is_empty() {
        header_rows.extend(table.select(&ROW).next().map(|row| row.id()));
    }

    table
        .select(&ROW)
        .enumerate()
        .filter(|(_, row)| !header_rows.contains(&row.id()) && row.select(&CELL).next().is_some())
        .map(|(ordinal, _)| ordinal)
        .collect()
}

fn item_shapes(section: ElementRef<'_>) -> Vec<bool> {
    section
        .select(&ITEM)
        .map(|item| item.select(&EMPHASIS).next().is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_title_preferred_over_legacy() {
        let both = r#"<div class="score">old</div><div class="score-title">new</div>"#;
        assert_eq!(scan(both).title, Some(TitleVariant::Current));

        let legacy = r#"<div class="score">old</div>"#;
        assert_eq!(scan(legacy).title, Some(TitleVariant::Legacy));

        assert_eq!(scan("<p>nothing here</p>").title, None);
    }

    #[test]
    fn test_header_rows_are_not_body_rows() {
        let html = r#"<table class="performance-table">
            <thead><tr><th>기간</th><th>수익률</th></tr></thead>
            <tbody>
              <tr><td>5일</td><td>+1.00%</td></tr>
              <tr><td>30일</td><td>+2.00%</td></tr>
            </tbody>
        </table>"#;
        assert_eq!(scan(html).body_rows, vec![1, 2]);
    }

    #[test]
    fn test_th_only_row_without_thead_is_skipped() {
        let html = r#"<table class="performance-table">
            <tr><th>기간</th><th>수익률</th></tr>
            <tr><td>5일</td><td>-</td></tr>
        </table>"#;
        let scan = scan(html);
        assert_eq!(scan.body_rows, vec![1]);
        assert_eq!(scan.body_row_index(1), Some(0));
        assert_eq!(scan.body_row_index(0), None);
    }

    #[test]
    fn test_first_row_is_header_without_thead() {
        let html = r#"<table class="performance-table">
            <tr><td>기간</td><td>수익률</td></tr>
            <tr><td>5일</td><td>-</td></tr>
            <tr><td>30일</td><td>-</td></tr>
            <tr><td>1년</td><td>-</td></tr>
        </table>"#;
        let scan = scan(html);
        assert_eq!(scan.body_rows, vec![1, 2, 3]);
        assert_eq!(scan.body_row_index(0), None);
        assert_eq!(scan.body_row_index(3), Some(2));
    }

    #[test]
    fn test_rows_without_end_tags() {
        let html = "<table class=\"performance-table\"><thead><tr><th>기간<th>수익률</thead>\n\
                    <tbody>\n<tr><td>5일<td>-\n<tr><td>30일<td>-\n<tr><td>1년<td>-\n</tbody></table>";
        assert_eq!(scan(html).body_rows, vec![1, 2, 3]);
    }

    #[test]
    fn test_item_shapes_only_from_first_section() {
        let html = r#"
            <div class="section up">
              <div class="item"><strong>a</strong> text</div>
              <div class="item">plain</div>
            </div>
            <div class="section up"><div class="item"><strong>x</strong></div></div>
            <div class="section down"><div class="item">plain</div></div>"#;
        let scan = scan(html);
        assert_eq!(scan.up_items, vec![true, false]);
        assert_eq!(scan.down_items, vec![false]);
        assert!(!scan.has_footer);
    }
}
