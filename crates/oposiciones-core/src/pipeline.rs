//! Main scraper API
//!
//! Combines a session launcher with the page readers, the paginator and the
//! aggregation rules. Sections are processed strictly one after another, each
//! in its own browser session.

use tracing::{debug, info, warn};

use crate::aggregate::AnnouncementBook;
use crate::config::ScrapeConfig;
use crate::driver::{ChromiumLauncher, PageDriver, SessionLauncher};
use crate::error::Result;
use crate::paginator::{walk, WalkOutcome};
use crate::parser::{AnnouncementCards, AspirantTable, PageReader};
use crate::types::{Announcement, Aspirant, Section, SectionHarvest};

/// Scraper for the exam-board registration and announcement pages
///
/// # Example
/// ```no_run
/// use oposiciones_core::{ExamBoardScraper, ScrapeConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = ExamBoardScraper::new(ScrapeConfig::default())?;
///
///     for harvest in scraper.scrape_registrations().await {
///         println!("{}: {} aspirants", harvest.section, harvest.records.len());
///     }
///
///     Ok(())
/// }
/// ```
pub struct ExamBoardScraper<L> {
    launcher: L,
    config: ScrapeConfig,
}

impl ExamBoardScraper<ChromiumLauncher> {
    /// Create a scraper driving headless Chrome.
    ///
    /// # Errors
    /// Returns `ScrapeError::Config` if the configuration does not validate.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        config.validate()?;
        let launcher = ChromiumLauncher::new(config.browser.clone());
        Ok(Self { launcher, config })
    }
}

impl<L: SessionLauncher> ExamBoardScraper<L> {
    /// Create a scraper with a custom session launcher.
    ///
    /// This is how captured pages are replayed offline and in tests.
    pub fn with_launcher(launcher: L, config: ScrapeConfig) -> Self {
        Self { launcher, config }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Extract the registration table of every configured section.
    pub async fn scrape_registrations(&self) -> Vec<SectionHarvest<Aspirant>> {
        let mut harvests = Vec::with_capacity(self.config.registration_sections.len());
        for section in &self.config.registration_sections {
            harvests.push(self.scrape_registration_section(section).await);
        }
        harvests
    }

    /// Extract one section's registration table, following every page.
    pub async fn scrape_registration_section(&self, section: &Section) -> SectionHarvest<Aspirant> {
        let mut records = Vec::new();
        let outcome = self
            .run_section(section, &AspirantTable, |page| records.extend(page))
            .await;
        harvest(section, records, outcome)
    }

    /// Extract the announcements of every configured section.
    pub async fn scrape_announcements(&self) -> Vec<SectionHarvest<Announcement>> {
        let mut harvests = Vec::with_capacity(self.config.announcement_sections.len());
        for section in &self.config.announcement_sections {
            harvests.push(self.scrape_announcement_section(section).await);
        }
        harvests
    }

    /// Extract one section's announcement cards, merged by date.
    pub async fn scrape_announcement_section(
        &self,
        section: &Section,
    ) -> SectionHarvest<Announcement> {
        let mut book = AnnouncementBook::new();
        let outcome = self
            .run_section(section, &AnnouncementCards, |cards| book.extend(cards))
            .await;
        harvest(section, book.into_announcements(), outcome)
    }

    /// Run one section in its own session, closing it on every path.
    async fn run_section<R, F>(&self, section: &Section, reader: &R, on_page: F) -> WalkOutcome
    where
        R: PageReader,
        F: FnMut(Vec<R::Record>),
    {
        info!(section = %section.name, url = %section.url, "Starting section");

        let mut driver = match self.launcher.launch().await {
            Ok(driver) => driver,
            Err(e) => {
                return WalkOutcome {
                    pages: 0,
                    result: Err(e),
                }
            }
        };

        let outcome = self.drive(&mut driver, section, reader, on_page).await;

        if let Err(e) = driver.close().await {
            warn!(section = %section.name, error = %e, "Failed to close browser session");
        }

        outcome
    }

    async fn drive<D, R, F>(
        &self,
        driver: &mut D,
        section: &Section,
        reader: &R,
        on_page: F,
    ) -> WalkOutcome
    where
        D: PageDriver,
        R: PageReader,
        F: FnMut(Vec<R::Record>),
    {
        if let Err(e) = driver.load_page(&section.url).await {
            return WalkOutcome {
                pages: 0,
                result: Err(e),
            };
        }

        let settings = &self.config.pagination;
        match driver
            .dismiss_cookie_banner_if_present(
                &settings.cookie_button_text,
                settings.cookie_banner_timeout(),
            )
            .await
        {
            Ok(true) => info!("Cookie banner accepted"),
            Ok(false) => debug!("No cookie banner found"),
            Err(e) => warn!(error = %e, "Cookie banner check failed, continuing"),
        }

        walk(driver, reader, settings, on_page).await
    }
}

/// Turn a walk outcome into the section's harvest.
///
/// Only debug lines are logged here; callers report the final status.
fn harvest<T>(section: &Section, records: Vec<T>, outcome: WalkOutcome) -> SectionHarvest<T> {
    match outcome.result {
        Ok(end) => {
            debug!(
                section = %section.name,
                ?end,
                records = records.len(),
                pages = outcome.pages,
                "Walk finished"
            );
            SectionHarvest::completed(&section.name, records, outcome.pages)
        }
        Err(e) => {
            debug!(
                section = %section.name,
                error = %e,
                kept = records.len(),
                "Walk aborted"
            );
            SectionHarvest::failed(&section.name, records, outcome.pages, e.to_string())
        }
    }
}
