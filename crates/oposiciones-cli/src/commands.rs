//! Pipeline runs
//!
//! Each run scrapes every configured section and persists the result. A
//! section that fails or yields nothing is reported but never stops the
//! others; only a failure to write output is returned as an error.

use std::path::PathBuf;

use oposiciones_core::store::{write_announcements, write_registrations};
use oposiciones_core::{
    Announcement, Aspirant, ExamBoardScraper, Result, ScrapeConfig, SectionHarvest,
    SectionStatus, SessionLauncher,
};
use tracing::{info, warn};

/// Per-section line for the end-of-run summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub section: String,
    pub records: usize,
    pub pages: u32,
    pub status: SectionStatus,
}

impl<T> From<&SectionHarvest<T>> for SectionSummary {
    fn from(harvest: &SectionHarvest<T>) -> Self {
        Self {
            section: harvest.section.clone(),
            records: harvest.records.len(),
            pages: harvest.pages,
            status: harvest.status.clone(),
        }
    }
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub sections: Vec<SectionSummary>,
    pub files: Vec<PathBuf>,
}

fn summarize<T>(harvests: &[SectionHarvest<T>], files: Vec<PathBuf>) -> RunSummary {
    let sections: Vec<SectionSummary> = harvests.iter().map(SectionSummary::from).collect();

    for summary in &sections {
        match &summary.status {
            SectionStatus::Extracted => info!(
                section = %summary.section,
                records = summary.records,
                pages = summary.pages,
                "Extracted"
            ),
            SectionStatus::NoData => warn!(section = %summary.section, "No data could be extracted"),
            SectionStatus::Failed(reason) => warn!(
                section = %summary.section,
                records = summary.records,
                reason = %reason,
                "Failed, partial data kept"
            ),
        }
    }

    RunSummary { sections, files }
}

/// Registration pipeline: one `<section>_inscritos.json` per section.
pub async fn run_registrations<L: SessionLauncher>(
    scraper: &ExamBoardScraper<L>,
) -> Result<RunSummary> {
    let harvests: Vec<SectionHarvest<Aspirant>> = scraper.scrape_registrations().await;
    let files = write_registrations(&scraper.config().output_dir, &harvests)?;
    Ok(summarize(&harvests, files))
}

/// Announcements pipeline: one combined `convocatorias.json`.
pub async fn run_announcements<L: SessionLauncher>(
    scraper: &ExamBoardScraper<L>,
) -> Result<RunSummary> {
    let harvests: Vec<SectionHarvest<Announcement>> = scraper.scrape_announcements().await;
    let file = write_announcements(&scraper.config().output_dir, &harvests)?;
    Ok(summarize(&harvests, vec![file]))
}

/// Build a headless Chrome scraper for `config`.
pub fn chromium_scraper(
    config: ScrapeConfig,
) -> Result<ExamBoardScraper<oposiciones_core::ChromiumLauncher>> {
    ExamBoardScraper::new(config)
}
