//! Exam-board scraper entry points
//!
//! Shared setup for the `inscritos` and `convocatorias` binaries: logging,
//! configuration resolution and the two pipeline runs.
//!
//! Configuration comes from the environment only:
//! - `OPOSICIONES_CONFIG` - path to a JSON `ScrapeConfig`; defaults apply when unset
//! - `OPOSICIONES_OUTPUT_DIR` - overrides `output_dir`
//! - `RUST_LOG` - log filter, `info` when unset

pub mod commands;

use std::path::PathBuf;

use oposiciones_core::{Result, ScrapeConfig};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the JSON configuration file
pub const CONFIG_ENV: &str = "OPOSICIONES_CONFIG";

/// Environment variable overriding the output directory
pub const OUTPUT_DIR_ENV: &str = "OPOSICIONES_OUTPUT_DIR";

/// Install the stderr log subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the run configuration from an optional file and output override.
///
/// # Errors
/// Returns an error if the file cannot be read, is malformed, or the
/// resulting configuration does not validate.
pub fn resolve_config(
    config_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<ScrapeConfig> {
    let mut config = match config_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading configuration");
            ScrapeConfig::from_json_file(&path)?
        }
        None => ScrapeConfig::default(),
    };

    if let Some(dir) = output_dir {
        config = config.with_output_dir(dir);
    }

    config.validate()?;
    Ok(config)
}

/// Resolve the configuration from `OPOSICIONES_CONFIG` and
/// `OPOSICIONES_OUTPUT_DIR`.
pub fn config_from_env() -> Result<ScrapeConfig> {
    let non_empty = |name: &str| {
        std::env::var_os(name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    };
    resolve_config(non_empty(CONFIG_ENV), non_empty(OUTPUT_DIR_ENV))
}
