//! Announcement card parser
//!
//! Parses the "convocatorias a examen" cards. Each card carries a
//! long-form date and the lottery-number range called on that date.

use scraper::{ElementRef, Html};
use thiserror::Error;
use tracing::warn;

use crate::date::parse_spanish_date;
use crate::error::Result;
use crate::types::{AnnouncementCard, CallRange};

use super::{element_text, selector, PageReader};

const CARD: &str = ".convocatoria-card";
const DATE: &str = ".fecha-convocatoria";
const RANGE_START: &str = ".rango-sorteo-init";
const RANGE_END: &str = ".rango-sorteo-fin";

/// Why a card was skipped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardSkip {
    #[error("card has no date field")]
    MissingDate,

    #[error("unrecognised date '{0}'")]
    InvalidDate(String),

    #[error("card has no range start field")]
    MissingStart,

    #[error("range start '{0}' is not a number")]
    InvalidStart(String),

    #[error("range end '{0}' is not a number")]
    InvalidEnd(String),
}

/// Text of the first descendant matching `css`, if any.
fn field_text(card: &ElementRef, css: &str) -> Result<Option<String>> {
    let sel = selector(css)?;
    Ok(card.select(&sel).next().map(|el| element_text(&el)))
}

/// Parse a single card element.
///
/// The date and range start are mandatory; a missing range end defaults to
/// the start. A range end that is present but not numeric rejects the card.
pub fn parse_card(card: &ElementRef) -> Result<std::result::Result<AnnouncementCard, CardSkip>> {
    let date_text = match field_text(card, DATE)? {
        Some(text) => text,
        None => return Ok(Err(CardSkip::MissingDate)),
    };
    let date = match parse_spanish_date(&date_text) {
        Some(date) => date,
        None => return Ok(Err(CardSkip::InvalidDate(date_text))),
    };

    let start = match field_text(card, RANGE_START)? {
        Some(text) => match text.parse::<u32>() {
            Ok(start) => start,
            Err(_) => return Ok(Err(CardSkip::InvalidStart(text))),
        },
        None => return Ok(Err(CardSkip::MissingStart)),
    };

    let end = match field_text(card, RANGE_END)? {
        Some(text) => match text.parse::<u32>() {
            Ok(end) => Some(end),
            Err(_) => return Ok(Err(CardSkip::InvalidEnd(text))),
        },
        None => None,
    };

    Ok(Ok(AnnouncementCard {
        date,
        range: CallRange::new(start, end),
    }))
}

/// Parse every announcement card on a rendered page.
///
/// # Returns
/// * `Ok(Some(cards))` with the valid cards in page order
/// * `Ok(None)` when the page has no cards at all
pub fn parse_announcement_cards(html: &str) -> Result<Option<Vec<AnnouncementCard>>> {
    let document = Html::parse_document(html);
    let card_selector = selector(CARD)?;

    let mut found = false;
    let mut cards = Vec::new();

    for element in document.select(&card_selector) {
        found = true;
        match parse_card(&element)? {
            Ok(card) => cards.push(card),
            Err(reason) => warn!(%reason, "Skipping announcement card"),
        }
    }

    Ok(found.then_some(cards))
}

/// `PageReader` for announcement cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnouncementCards;

impl PageReader for AnnouncementCards {
    type Record = AnnouncementCard;

    fn label(&self) -> &'static str {
        "announcement cards"
    }

    fn read(&self, html: &str) -> Result<Option<Vec<AnnouncementCard>>> {
        parse_announcement_cards(html)
    }

    fn is_ready(&self, html: &str) -> bool {
        let document = Html::parse_document(html);
        selector(CARD).is_ok_and(|sel| document.select(&sel).next().is_some())
    }

    fn fingerprint(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let sel = selector(CARD).ok()?;
        let texts: Vec<String> = document.select(&sel).map(|el| element_text(&el)).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }
}
