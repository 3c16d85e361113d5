//! Pagination control detection
//!
//! The listing pages use a Bootstrap-style pager whose last item is a link
//! labelled with a glyph (`»`). Its `<li>` container carries `disabled` on
//! the final page.

use scraper::Html;

use crate::error::Result;

use super::{element_text, selector};

/// State of the "next page" control on a page snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    /// No link with the glyph exists
    Missing,
    /// The link exists but its container is marked disabled
    Disabled,
    /// The link can be followed
    Enabled,
}

impl NextControl {
    pub fn can_advance(self) -> bool {
        self == NextControl::Enabled
    }
}

/// Classify the next-page control of a rendered page.
///
/// The control is the first `<a>` whose text is exactly `glyph`. It is
/// disabled when its parent element's class list mentions `disabled`.
pub fn next_control(html: &str, glyph: &str) -> Result<NextControl> {
    let document = Html::parse_document(html);
    let link_selector = selector("a")?;

    let link = match document
        .select(&link_selector)
        .find(|link| element_text(link) == glyph)
    {
        Some(link) => link,
        None => return Ok(NextControl::Missing),
    };

    let disabled = link
        .parent()
        .and_then(|node| node.value().as_element())
        .and_then(|parent| parent.attr("class"))
        .is_some_and(|class| class.contains("disabled"));

    Ok(if disabled {
        NextControl::Disabled
    } else {
        NextControl::Enabled
    })
}
