//! Run configuration
//!
//! Every tunable of a run lives in `ScrapeConfig` and is passed into the
//! scraper explicitly. `Default` reproduces the production setup; a JSON file
//! can override any subset of fields.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};
use crate::types::Section;

/// Base URL of the 2025 notarial exam site
const SITE_BASE_URL: &str = "https://oposiciones2025.notariado.org/web";

/// Default output directory, read by the calendar front end
const DEFAULT_OUTPUT_DIR: &str = "src/data";

/// Browser session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a visible window (default: true)
    pub headless: bool,
    /// Window width in pixels (default: 1920)
    pub window_width: u32,
    /// Window height in pixels (default: 1080)
    pub window_height: u32,
    /// Pass `--no-sandbox` and `--disable-dev-shm-usage` (default: true)
    pub disable_sandbox: bool,
    /// Explicit Chrome/Chromium binary; auto-detected when unset
    pub chrome_executable: Option<PathBuf>,
    /// Timeout for individual CDP requests in seconds (default: 30)
    pub request_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            disable_sandbox: true,
            chrome_executable: None,
            request_timeout_secs: 30,
        }
    }
}

impl BrowserSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Page walking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// Hard bound on pages per section (default: 500)
    pub max_pages: u32,
    /// How long to wait for the data container to be populated (default: 10000)
    pub ready_timeout_ms: u64,
    /// Delay between readiness polls (default: 250)
    pub poll_interval_ms: u64,
    /// How long to look for the cookie banner (default: 3000)
    pub cookie_banner_timeout_ms: u64,
    /// Text of the cookie consent button (default: "Aceptar")
    pub cookie_button_text: String,
    /// Label of the next-page link (default: "»")
    pub next_glyph: String,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_pages: 500,
            ready_timeout_ms: 10_000,
            poll_interval_ms: 250,
            cookie_banner_timeout_ms: 3_000,
            cookie_button_text: "Aceptar".to_string(),
            next_glyph: "»".to_string(),
        }
    }
}

impl PaginationSettings {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn cookie_banner_timeout(&self) -> Duration {
        Duration::from_millis(self.cookie_banner_timeout_ms)
    }
}

/// Configuration for a scraping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Sections walked by the registration pipeline, in order
    pub registration_sections: Vec<Section>,
    /// Sections walked by the announcements pipeline, in order
    pub announcement_sections: Vec<Section>,
    /// Directory receiving the JSON output
    pub output_dir: PathBuf,
    pub browser: BrowserSettings,
    pub pagination: PaginationSettings,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        let tribunals = [("tribunal1", "tribunal-1"), ("tribunal2", "tribunal-2")];
        Self {
            registration_sections: tribunals
                .iter()
                .map(|(name, slug)| {
                    Section::new(
                        *name,
                        format!("{}/{}/consulta-de-inscripciones", SITE_BASE_URL, slug),
                    )
                })
                .collect(),
            announcement_sections: tribunals
                .iter()
                .map(|(name, slug)| {
                    Section::new(
                        *name,
                        format!("{}/{}/convocatorias-a-examen", SITE_BASE_URL, slug),
                    )
                })
                .collect(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            browser: BrowserSettings::default(),
            pagination: PaginationSettings::default(),
        }
    }
}

impl ScrapeConfig {
    /// Parse a configuration from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    /// `ScrapeError::Json` for malformed JSON, `ScrapeError::Config` if the
    /// result does not validate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ScrapeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Replace the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Check invariants the pipelines rely on.
    pub fn validate(&self) -> Result<()> {
        if self.pagination.max_pages == 0 {
            return Err(ScrapeError::Config("max_pages must be at least 1".to_string()));
        }
        if self.pagination.next_glyph.trim().is_empty() {
            return Err(ScrapeError::Config("next_glyph cannot be empty".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ScrapeError::Config("output_dir cannot be empty".to_string()));
        }

        for section in self
            .registration_sections
            .iter()
            .chain(&self.announcement_sections)
        {
            if section.name.trim().is_empty() {
                return Err(ScrapeError::Config(format!(
                    "section with URL '{}' has an empty name",
                    section.url
                )));
            }
            if section.name.contains(&['/', '\\'][..]) {
                return Err(ScrapeError::Config(format!(
                    "section name '{}' cannot contain path separators",
                    section.name
                )));
            }
            if section.url.trim().is_empty() {
                return Err(ScrapeError::Config(format!(
                    "section '{}' has an empty URL",
                    section.name
                )));
            }
        }

        Ok(())
    }
}
