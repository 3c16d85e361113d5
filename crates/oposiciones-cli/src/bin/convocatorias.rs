//! Announcements pipeline: writes one `convocatorias.json` keyed by tribunal.

use oposiciones_cli::commands::{chromium_scraper, run_announcements};
use oposiciones_cli::{config_from_env, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let scraper = chromium_scraper(config_from_env()?)?;
    let summary = run_announcements(&scraper).await?;

    for file in &summary.files {
        tracing::info!(path = %file.display(), "Announcements run finished");
    }
    Ok(())
}
