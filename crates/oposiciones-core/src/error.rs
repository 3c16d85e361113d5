//! Error types for the exam-board scraper
//!
//! Row- and card-level parse failures are not errors: readers log and skip
//! them. `ScrapeError` covers the failures that end a section or a run.

use thiserror::Error;

/// Error type for scraper operations
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Browser automation command failed
    #[error("Browser automation failed: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// Browser process could not be started or configured
    #[error("Failed to start browser session: {0}")]
    Launch(String),

    /// The browser session was used after teardown
    #[error("Browser session is closed")]
    SessionClosed,

    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is missing or invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Pagination did not terminate within the configured bound
    #[error("Page limit exceeded: more than {0} pages")]
    PageLimitExceeded(u32),

    /// An injected script returned something unexpected
    #[error("Unexpected script result: {0}")]
    Script(String),
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;
