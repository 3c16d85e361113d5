//! Grouping of announcement cards by date

use crate::types::{Announcement, AnnouncementCard};

/// Accumulates announcement cards for one section, keeping at most one
/// `Announcement` per date.
///
/// Records and their ranges keep first-seen order. Lookup is a linear scan;
/// a section holds tens of dates.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementBook {
    entries: Vec<Announcement>,
}

impl AnnouncementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card, appending its range to an existing date if present.
    pub fn add(&mut self, card: AnnouncementCard) {
        match self.entries.iter_mut().find(|entry| entry.date == card.date) {
            Some(entry) => entry.ranges.push(card.range),
            None => self.entries.push(Announcement {
                date: card.date,
                ranges: vec![card.range],
            }),
        }
    }

    pub fn extend<I: IntoIterator<Item = AnnouncementCard>>(&mut self, cards: I) {
        for card in cards {
            self.add(card);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_announcements(self) -> Vec<Announcement> {
        self.entries
    }
}
