//! Page walking
//!
//! Reads the current page, hands its records to a sink, then follows the
//! next-page control until it is missing or disabled. Each read waits for
//! the data container to be populated instead of sleeping a fixed time.

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::PaginationSettings;
use crate::driver::PageDriver;
use crate::error::{Result, ScrapeError};
use crate::parser::PageReader;

/// Why a walk stopped normally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// The page has no data container
    NoContainer,
    /// The next control is missing or disabled
    LastPage,
    /// Following the next control did not change the page
    Stale,
}

/// Result of walking one section
#[derive(Debug)]
pub struct WalkOutcome {
    /// Pages read, including those read before a failure
    pub pages: u32,
    pub result: Result<WalkEnd>,
}

enum Snapshot {
    Page(String),
    Unchanged,
}

/// Wait until the reader sees a populated page different from `previous`.
///
/// After the timeout the last snapshot is returned as-is so the reader can
/// decide whether data is there; a page whose fingerprint still equals
/// `previous` is reported as unchanged. Snapshot errors are retried until the
/// deadline, since a page in the middle of navigating cannot be read.
async fn wait_for_page<D, R>(
    driver: &mut D,
    reader: &R,
    settings: &PaginationSettings,
    previous: Option<&str>,
) -> Result<Snapshot>
where
    D: PageDriver + ?Sized,
    R: PageReader,
{
    let deadline = Instant::now() + settings.ready_timeout();

    loop {
        let html = match driver.content().await {
            Ok(html) => html,
            Err(e) if Instant::now() < deadline => {
                debug!(error = %e, "Page snapshot failed, retrying");
                sleep(settings.poll_interval()).await;
                continue;
            }
            Err(e) => return Err(e),
        };
        let fresh = match previous {
            Some(previous) => reader.fingerprint(&html).as_deref() != Some(previous),
            None => true,
        };

        if fresh && reader.is_ready(&html) {
            return Ok(Snapshot::Page(html));
        }

        if Instant::now() >= deadline {
            debug!(fresh, "Readiness wait timed out");
            return Ok(if fresh {
                Snapshot::Page(html)
            } else {
                Snapshot::Unchanged
            });
        }

        sleep(settings.poll_interval()).await;
    }
}

async fn walk_pages<D, R, F>(
    driver: &mut D,
    reader: &R,
    settings: &PaginationSettings,
    on_page: &mut F,
    pages: &mut u32,
) -> Result<WalkEnd>
where
    D: PageDriver + ?Sized,
    R: PageReader,
    F: FnMut(Vec<R::Record>),
{
    let mut previous: Option<String> = None;

    loop {
        let html = match wait_for_page(driver, reader, settings, previous.as_deref()).await? {
            Snapshot::Page(html) => html,
            Snapshot::Unchanged => {
                warn!(page = *pages + 1, "Page did not change after advancing, stopping");
                return Ok(WalkEnd::Stale);
            }
        };

        if *pages >= settings.max_pages {
            return Err(ScrapeError::PageLimitExceeded(settings.max_pages));
        }

        let records = match reader.read(&html)? {
            Some(records) => records,
            None => {
                info!(reader = reader.label(), "No data container found, finishing");
                return Ok(WalkEnd::NoContainer);
            }
        };

        *pages += 1;
        info!(page = *pages, records = records.len(), "Read page");
        previous = reader.fingerprint(&html);
        on_page(records);

        if !driver.click_next(&settings.next_glyph).await? {
            info!(pages = *pages, "Reached the last page");
            return Ok(WalkEnd::LastPage);
        }
    }
}

/// Walk every page reachable from the currently loaded one.
///
/// `on_page` receives each page's records in order. The walk fails with
/// `PageLimitExceeded` rather than reading more than `max_pages` pages.
pub async fn walk<D, R, F>(
    driver: &mut D,
    reader: &R,
    settings: &PaginationSettings,
    mut on_page: F,
) -> WalkOutcome
where
    D: PageDriver + ?Sized,
    R: PageReader,
    F: FnMut(Vec<R::Record>),
{
    let mut pages = 0;
    let result = walk_pages(driver, reader, settings, &mut on_page, &mut pages).await;
    WalkOutcome { pages, result }
}
