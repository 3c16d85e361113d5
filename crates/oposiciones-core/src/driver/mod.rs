//! Browser driver abstraction
//!
//! The pipelines only ever talk to a page through `PageDriver`, so the
//! parsing and aggregation logic can run against captured HTML without a
//! browser. `chromium` drives a real headless Chrome; `fixture` replays
//! static pages.

pub mod chromium;
pub mod fixture;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use chromium::{ChromiumDriver, ChromiumLauncher};
pub use fixture::{StaticDriver, StaticLauncher};

/// One browser tab bound to a single section walk
#[async_trait]
pub trait PageDriver: Send {
    /// Navigate to `url` and wait for the load to finish.
    async fn load_page(&mut self, url: &str) -> Result<()>;

    /// Click a consent button labelled `button_text` if one shows up within
    /// `timeout`. Returns whether a banner was dismissed; absence is normal.
    async fn dismiss_cookie_banner_if_present(
        &mut self,
        button_text: &str,
        timeout: Duration,
    ) -> Result<bool>;

    /// Snapshot of the rendered DOM.
    async fn content(&mut self) -> Result<String>;

    /// Follow the next-page link labelled `glyph`.
    ///
    /// Returns `false` when the link is missing or its container is disabled.
    async fn click_next(&mut self, glyph: &str) -> Result<bool>;

    /// Tear the session down. Must be safe to call once per session on
    /// every exit path.
    async fn close(&mut self) -> Result<()>;
}

/// Starts a fresh browser session for each section
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Driver: PageDriver;

    async fn launch(&self) -> Result<Self::Driver>;
}
