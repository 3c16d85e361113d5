//! Exam-board scraper core library
//!
//! Extracts candidate registrations and exam-call announcements from the
//! notarial exam board's website and writes them as JSON.
//!
//! # Features
//! - Paginated registration table extraction
//! - Announcement cards grouped by exam date
//! - Spanish long-form date normalization
//! - Browser access behind a `PageDriver` trait, with a headless Chrome
//!   implementation and a fixture replay implementation

pub mod aggregate;
pub mod config;
pub mod date;
pub mod driver;
pub mod error;
pub mod paginator;
pub mod parser;
pub mod pipeline;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use aggregate::AnnouncementBook;
pub use config::{BrowserSettings, PaginationSettings, ScrapeConfig};
pub use date::normalize_date;
pub use driver::{ChromiumLauncher, PageDriver, SessionLauncher, StaticLauncher};
pub use error::{Result, ScrapeError};
pub use pipeline::ExamBoardScraper;
pub use types::{
    Announcement, AnnouncementCard, Aspirant, CallRange, Section, SectionHarvest, SectionStatus,
};
