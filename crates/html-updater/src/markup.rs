//! Class-name contract of the report pages.
//!
//! Every node the updater touches is addressed through these selectors.

/// Price/title line. Pages carry one of two historical variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleVariant {
    Current,
    Legacy,
}

impl TitleVariant {
    /// Lookup order: the current markup wins when both are present.
    pub const LOOKUP_ORDER: [TitleVariant; 2] = [TitleVariant::Current, TitleVariant::Legacy];

    pub fn selector(&self) -> &'static str {
        match self {
            TitleVariant::Current => "div.score-title",
            TitleVariant::Legacy => "div.score",
        }
    }
}

pub const PERFORMANCE_TABLE: &str = "table.performance-table";
pub const PERFORMANCE_ROW: &str = "table.performance-table tr";
pub const PERFORMANCE_CELL: &str = "table.performance-table tr td";

pub const FOOTER: &str = "div.estimated";

// Relative selectors, scoped under an already located element.
pub const ROW: &str = "tr";
pub const HEADER_ROW: &str = "thead tr";
pub const CELL: &str = "td";
pub const ITEM: &str = "div.item";
pub const EMPHASIS: &str = "strong";

/// Narrative block: bullish lines go under `up`, bearish under `down`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Up,
    Down,
}

impl Section {
    pub fn selector(&self) -> &'static str {
        match self {
            Section::Up => "div.section.up",
            Section::Down => "div.section.down",
        }
    }

    pub fn item(&self) -> &'static str {
        match self {
            Section::Up => "div.section.up div.item",
            Section::Down => "div.section.down div.item",
        }
    }

    pub fn item_descendant(&self) -> &'static str {
        match self {
            Section::Up => "div.section.up div.item *",
            Section::Down => "div.section.down div.item *",
        }
    }

    pub fn emphasis(&self) -> &'static str {
        match self {
            Section::Up => "div.section.up div.item strong",
            Section::Down => "div.section.down div.item strong",
        }
    }
}
