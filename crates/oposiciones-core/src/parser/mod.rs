//! HTML readers for the exam-board pages
//!
//! Readers work on a snapshot of the rendered DOM so they can be exercised
//! on captured fixtures without a browser:
//! - `table`: registration table rows
//! - `cards`: announcement cards
//! - `pagination`: state of the "next page" control

pub mod cards;
pub mod pagination;
pub mod table;

use scraper::{ElementRef, Selector};

use crate::error::{Result, ScrapeError};

// Re-export main parsing functions
pub use cards::{parse_announcement_cards, AnnouncementCards, CardSkip};
pub use pagination::{next_control, NextControl};
pub use table::{parse_aspirant_rows, AspirantTable, ColumnLayout};

/// Reads one kind of record from a rendered page.
pub trait PageReader {
    type Record;

    /// Short label used in log lines
    fn label(&self) -> &'static str;

    /// Parse every record on the page.
    ///
    /// Returns `Ok(None)` when the data container is absent, which ends
    /// pagination normally.
    fn read(&self, html: &str) -> Result<Option<Vec<Self::Record>>>;

    /// Whether the data container is present and holds at least one item.
    fn is_ready(&self, html: &str) -> bool;

    /// Text signature of the data container, used to notice that a page
    /// really changed after advancing.
    fn fingerprint(&self, html: &str) -> Option<String>;
}

/// Compile a CSS selector, mapping failures into `ScrapeError::ParseError`.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScrapeError::ParseError(format!("Invalid selector '{}': {:?}", css, e)))
}

/// Visible-ish text of an element: whitespace collapsed and trimmed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
