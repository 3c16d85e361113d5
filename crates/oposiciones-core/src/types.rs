//! Data types for the exam-board scraper
//!
//! Field names on the wire are the Spanish keys consumed by the calendar
//! front end; the Rust names describe what the fields hold.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One registered candidate from the registration table
///
/// Order and lottery numbers are unsigned; a table row carrying a negative
/// value in either column is dropped by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspirant {
    /// Rank/order value within the section
    #[serde(rename = "numero_orden")]
    pub order_number: u32,
    /// `"<surname>, <given name>"`
    #[serde(rename = "nombre_apellidos")]
    pub full_name: String,
    /// Draw identifier
    #[serde(rename = "numero_sorteo")]
    pub lottery_number: u32,
    /// Free-text category label (e.g. "Libre")
    #[serde(rename = "turno")]
    pub shift: String,
}

impl Aspirant {
    /// Build a record, composing the full name from its two source fields.
    pub fn new(
        order_number: u32,
        lottery_number: u32,
        given_name: &str,
        surname: &str,
        shift: &str,
    ) -> Self {
        Self {
            order_number,
            full_name: format!("{}, {}", surname, given_name),
            lottery_number,
            shift: shift.to_string(),
        }
    }
}

/// Inclusive range of lottery numbers called to an exam session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRange {
    #[serde(rename = "inicio")]
    pub start: u32,
    #[serde(rename = "fin")]
    pub end: u32,
}

impl CallRange {
    /// Create a range; a missing end collapses to a single number.
    pub fn new(start: u32, end: Option<u32>) -> Self {
        Self {
            start,
            end: end.unwrap_or(start),
        }
    }
}

/// All ranges called on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Exam date, serialized as `YYYY-MM-DD`
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    /// Ranges in first-seen order
    #[serde(rename = "convocados")]
    pub ranges: Vec<CallRange>,
}

/// A single parsed announcement card, before grouping by date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncementCard {
    pub date: NaiveDate,
    pub range: CallRange,
}

/// A named site section (one tribunal/board) and its entry URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub url: String,
}

impl Section {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// How a section's extraction ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    /// At least one record was extracted and the walk ended normally
    Extracted,
    /// The walk ended normally but produced nothing
    NoData,
    /// The walk was cut short; records collected so far are kept
    Failed(String),
}

/// Outcome of processing one section
#[derive(Debug, Clone)]
pub struct SectionHarvest<T> {
    /// Section name as configured
    pub section: String,
    /// Records in extraction order
    pub records: Vec<T>,
    /// Number of pages read
    pub pages: u32,
    pub status: SectionStatus,
}

impl<T> SectionHarvest<T> {
    /// Harvest for a walk that finished without error
    pub fn completed(section: &str, records: Vec<T>, pages: u32) -> Self {
        let status = if records.is_empty() {
            SectionStatus::NoData
        } else {
            SectionStatus::Extracted
        };
        Self {
            section: section.to_string(),
            records,
            pages,
            status,
        }
    }

    /// Harvest for a walk that stopped on an error
    pub fn failed(section: &str, records: Vec<T>, pages: u32, reason: impl Into<String>) -> Self {
        Self {
            section: section.to_string(),
            records,
            pages,
            status: SectionStatus::Failed(reason.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspirant_full_name_order() {
        let aspirant = Aspirant::new(1, 501, "Maria", "Garcia", "Libre");
        assert_eq!(aspirant.full_name, "Garcia, Maria");
    }

    #[test]
    fn test_aspirant_serialization_keys() {
        let aspirant = Aspirant::new(1, 501, "Maria", "Garcia", "Libre");
        let json = serde_json::to_string(&aspirant).unwrap();
        assert_eq!(
            json,
            r#"{"numero_orden":1,"nombre_apellidos":"Garcia, Maria","numero_sorteo":501,"turno":"Libre"}"#
        );
    }

    #[test]
    fn test_call_range_defaults_end_to_start() {
        assert_eq!(CallRange::new(7, None), CallRange { start: 7, end: 7 });
        assert_eq!(CallRange::new(1, Some(50)), CallRange { start: 1, end: 50 });
    }

    #[test]
    fn test_announcement_serialization() {
        let announcement = Announcement {
            date: NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
            ranges: vec![CallRange::new(1, Some(50))],
        };
        let json = serde_json::to_string(&announcement).unwrap();
        assert_eq!(json, r#"{"fecha":"2025-05-05","convocados":[{"inicio":1,"fin":50}]}"#);

        let back: Announcement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, announcement);
    }

    #[test]
    fn test_harvest_status() {
        let empty: SectionHarvest<Aspirant> = SectionHarvest::completed("tribunal1", vec![], 1);
        assert_eq!(empty.status, SectionStatus::NoData);

        let full = SectionHarvest::completed("tribunal1", vec![1u32], 1);
        assert_eq!(full.status, SectionStatus::Extracted);

        let failed = SectionHarvest::failed("tribunal2", vec![1u32], 3, "boom");
        assert_eq!(failed.status, SectionStatus::Failed("boom".to_string()));
        assert!(!failed.is_empty());
    }
}
