//! Replay driver over captured HTML pages
//!
//! `StaticLauncher` maps section URLs to the sequence of pages a user would
//! see by following the next-page link. The next link is honoured with the
//! same rules the live site uses: a missing or disabled control ends the
//! walk, and an enabled control on the last captured page leaves the page
//! unchanged, like a pager that never disables.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;

use crate::error::{Result, ScrapeError};
use crate::parser::{element_text, next_control, selector};

use super::{PageDriver, SessionLauncher};

/// Body served for URLs with no captured pages
const BLANK_PAGE: &str = "<html><head></head><body></body></html>";

#[derive(Debug, Default)]
struct Counters {
    launches: AtomicUsize,
    closes: AtomicUsize,
}

/// Launcher handing out `StaticDriver`s over a shared page set
#[derive(Debug, Clone, Default)]
pub struct StaticLauncher {
    sites: Arc<HashMap<String, Vec<String>>>,
    fail_launch: bool,
    counters: Arc<Counters>,
}

impl StaticLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the pages reachable from `url`, in pagination order.
    pub fn with_site(mut self, url: impl Into<String>, pages: Vec<String>) -> Self {
        Arc::make_mut(&mut self.sites).insert(url.into(), pages);
        self
    }

    /// Make every launch fail, as when no browser is installed.
    pub fn failing(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    /// Sessions started so far
    pub fn launches(&self) -> usize {
        self.counters.launches.load(Ordering::SeqCst)
    }

    /// Sessions torn down so far
    pub fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionLauncher for StaticLauncher {
    type Driver = StaticDriver;

    async fn launch(&self) -> Result<StaticDriver> {
        if self.fail_launch {
            return Err(ScrapeError::Launch("static launcher configured to fail".to_string()));
        }
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        Ok(StaticDriver {
            sites: Arc::clone(&self.sites),
            pages: Vec::new(),
            index: 0,
            closed: false,
            counters: Arc::clone(&self.counters),
        })
    }
}

/// Driver serving captured pages
#[derive(Debug)]
pub struct StaticDriver {
    sites: Arc<HashMap<String, Vec<String>>>,
    pages: Vec<String>,
    index: usize,
    closed: bool,
    counters: Arc<Counters>,
}

impl StaticDriver {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(ScrapeError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn current(&self) -> &str {
        self.pages.get(self.index).map(String::as_str).unwrap_or(BLANK_PAGE)
    }
}

#[async_trait]
impl PageDriver for StaticDriver {
    async fn load_page(&mut self, url: &str) -> Result<()> {
        self.ensure_open()?;
        self.pages = self.sites.get(url).cloned().unwrap_or_default();
        self.index = 0;
        Ok(())
    }

    async fn dismiss_cookie_banner_if_present(
        &mut self,
        button_text: &str,
        _timeout: Duration,
    ) -> Result<bool> {
        self.ensure_open()?;
        let document = Html::parse_document(self.current());
        let button_selector = selector("button")?;
        let present = document
            .select(&button_selector)
            .any(|button| element_text(&button).contains(button_text));
        Ok(present)
    }

    async fn content(&mut self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.current().to_string())
    }

    async fn click_next(&mut self, glyph: &str) -> Result<bool> {
        self.ensure_open()?;
        if !next_control(self.current(), glyph)?.can_advance() {
            return Ok(false);
        }
        if self.index + 1 < self.pages.len() {
            self.index += 1;
        }
        Ok(true)
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
