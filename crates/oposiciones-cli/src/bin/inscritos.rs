//! Registration pipeline: writes `<section>_inscritos.json` per tribunal.

use oposiciones_cli::commands::{chromium_scraper, run_registrations};
use oposiciones_cli::{config_from_env, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let scraper = chromium_scraper(config_from_env()?)?;
    let summary = run_registrations(&scraper).await?;

    tracing::info!(files = summary.files.len(), "Registration run finished");
    Ok(())
}
