//! Streaming rewrite of the addressable nodes. Everything else passes
//! through byte for byte.

use crate::format;
use crate::markup::{self, Section};
use crate::scan::DocumentScan;
use crate::{PageUpdate, UpdateError};
use lol_html::html_content::{ContentType, Element, EndTag, TextChunk};
use lol_html::{element, rewrite_str, text, HandlerResult, RewriteStrSettings};
use report_core::TrailingWindow;
use std::cell::Cell;
use std::rc::Rc;

/// What a rewrite actually touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewriteReport {
    pub title: Option<markup::TitleVariant>,
    pub rows_updated: usize,
    pub up_items: usize,
    pub down_items: usize,
    pub footer: bool,
}

/// Arms on the first element matching a selector and tracks whether it is
/// still open. Later matches are ignored.
#[derive(Default)]
struct FirstMatch {
    seen: Cell<bool>,
    open: Rc<Cell<bool>>,
}

impl FirstMatch {
    fn enter(&self, el: &mut Element) -> HandlerResult {
        if self.seen.replace(true) {
            return Ok(());
        }
        self.open.set(true);
        let open = Rc::clone(&self.open);
        match el.end_tag_handlers() {
            Some(handlers) => handlers.push(Box::new(move |_end: &mut EndTag| {
                open.set(false);
                Ok(())
            })),
            // void or self-closing: nothing inside to rewrite
            None => self.open.set(false),
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.get()
    }
}

struct TableState {
    table: FirstMatch,
    rows_seen: Cell<usize>,
    cells_seen: Cell<usize>,
    row_value: Cell<Option<f64>>,
    /// Set once a value cell has been written; its old text is dropped until
    /// the next row or cell starts. `</td>` and `</tr>` are optional, so the
    /// cell's end tag cannot be relied on.
    strip_text: Cell<bool>,
    rows_updated: Cell<usize>,
}

impl TableState {
    fn new() -> Self {
        Self {
            table: FirstMatch::default(),
            rows_seen: Cell::new(0),
            cells_seen: Cell::new(0),
            row_value: Cell::new(None),
            strip_text: Cell::new(false),
            rows_updated: Cell::new(0),
        }
    }

    fn enter_row(&self, scan: &DocumentScan, update: &PageUpdate<'_>) {
        if !self.table.is_open() {
            return;
        }
        self.strip_text.set(false);
        let ordinal = self.rows_seen.replace(self.rows_seen.get() + 1);
        let value = scan
            .body_row_index(ordinal)
            .and_then(TrailingWindow::for_row)
            .and_then(|window| update.snapshot.returns.get(window));
        self.row_value.set(value);
        self.cells_seen.set(0);
    }

    fn enter_cell(&self, el: &mut Element) -> HandlerResult {
        if !self.table.is_open() {
            return Ok(());
        }
        self.strip_text.set(false);
        let index = self.cells_seen.replace(self.cells_seen.get() + 1);
        if index != 1 {
            return Ok(());
        }
        if let Some(value) = self.row_value.take() {
            el.prepend(&format::signed_pct(value), ContentType::Text);
            el.set_attribute("class", format::performance_class(value))?;
            self.strip_text.set(true);
            self.rows_updated.set(self.rows_updated.get() + 1);
        }
        Ok(())
    }

    fn cell_text(&self, chunk: &mut TextChunk) {
        if self.table.is_open() && self.strip_text.get() {
            chunk.remove();
        }
    }
}

struct SectionState<'a> {
    section: FirstMatch,
    factors: &'a [String],
    shapes: &'a [bool],
    items_seen: Cell<usize>,
    /// Factor index of the open item when its emphasis is still to be written.
    pending: Cell<Option<usize>>,
    /// Set after the emphasis closes; cleared once the following text node
    /// or any element has been seen.
    strip_text: Rc<Cell<bool>>,
    filled: Cell<usize>,
}

impl<'a> SectionState<'a> {
    fn new(factors: &'a [String], shapes: &'a [bool]) -> Self {
        Self {
            section: FirstMatch::default(),
            factors,
            shapes,
            items_seen: Cell::new(0),
            pending: Cell::new(None),
            strip_text: Rc::new(Cell::new(false)),
            filled: Cell::new(0),
        }
    }

    fn enter_item(&self, el: &mut Element) {
        if !self.section.is_open() {
            return;
        }
        let index = self.items_seen.replace(self.items_seen.get() + 1);
        self.pending.set(None);
        self.strip_text.set(false);

        let Some(factor) = self.factors.get(index) else {
            return;
        };
        match self.shapes.get(index) {
            Some(true) => self.pending.set(Some(index)),
            Some(false) => {
                el.set_inner_content(factor, ContentType::Text);
                self.filled.set(self.filled.get() + 1);
            }
            None => {
                tracing::debug!("item {} missing from structural scan, left as is", index);
            }
        }
    }

    fn enter_item_descendant(&self) {
        if self.section.is_open() {
            self.strip_text.set(false);
        }
    }

    fn enter_emphasis(&self, el: &mut Element) -> HandlerResult {
        if !self.section.is_open() {
            return Ok(());
        }
        let Some(index) = self.pending.take() else {
            return Ok(());
        };
        let factor = &self.factors[index];
        el.set_inner_content(&format::headline(factor), ContentType::Text);

        let tail = format!(" {}", factor);
        let strip_text = Rc::clone(&self.strip_text);
        match el.end_tag_handlers() {
            Some(handlers) => handlers.push(Box::new(move |end: &mut EndTag| {
                end.after(&tail, ContentType::Text);
                strip_text.set(true);
                Ok(())
            })),
            None => el.after(&tail, ContentType::Text),
        }
        self.filled.set(self.filled.get() + 1);
        Ok(())
    }

    fn item_text(&self, chunk: &mut TextChunk) {
        if !self.section.is_open() || !self.strip_text.get() {
            return;
        }
        chunk.remove();
        if chunk.last_in_text_node() {
            self.strip_text.set(false);
        }
    }
}

pub fn apply(
    html: &str,
    scan: &DocumentScan,
    update: &PageUpdate<'_>,
) -> Result<(String, RewriteReport), UpdateError> {
    let title_line = format::title_line(update.display_name, &update.snapshot.price);
    let footer_line = format::footer(update.as_of, update.attribution);

    let title_done = Cell::new(false);
    let footer_done = Cell::new(false);
    let table = TableState::new();
    let up = SectionState::new(&update.factors.positive, scan.items(Section::Up));
    let down = SectionState::new(&update.factors.negative, scan.items(Section::Down));

    let mut handlers = vec![
        element!(markup::PERFORMANCE_TABLE, |el| table.table.enter(el)),
        element!(markup::PERFORMANCE_ROW, |_el| {
            table.enter_row(scan, update);
            Ok(())
        }),
        element!(markup::PERFORMANCE_CELL, |el| table.enter_cell(el)),
        text!(markup::PERFORMANCE_CELL, |chunk| {
            table.cell_text(chunk);
            Ok(())
        }),
        element!(markup::FOOTER, |el| {
            if !footer_done.replace(true) {
                el.set_inner_content(&footer_line, ContentType::Text);
            }
            Ok(())
        }),
    ];

    if let Some(variant) = scan.title {
        handlers.push(element!(variant.selector(), |el| {
            if !title_done.replace(true) {
                el.set_inner_content(&title_line, ContentType::Text);
            }
            Ok(())
        }));
    }

    for (section, state) in [(Section::Up, &up), (Section::Down, &down)] {
        handlers.push(element!(section.selector(), move |el| state.section.enter(el)));
        handlers.push(element!(section.item(), move |el| {
            state.enter_item(el);
            Ok(())
        }));
        handlers.push(element!(section.item_descendant(), move |_el| {
            state.enter_item_descendant();
            Ok(())
        }));
        handlers.push(element!(section.emphasis(), move |el| state.enter_emphasis(el)));
        handlers.push(text!(section.item(), move |chunk| {
            state.item_text(chunk);
            Ok(())
        }));
    }

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| UpdateError::Rewrite(e.to_string()))?;

    let report = RewriteReport {
        title: scan.title.filter(|_| title_done.get()),
        rows_updated: table.rows_updated.get(),
        up_items: up.filled.get(),
        down_items: down.filled.get(),
        footer: footer_done.get(),
    };
    Ok((output, report))
}
