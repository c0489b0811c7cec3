//! Tracing setup: logs go to a file, never to the terminal (stdout is the
//! alternate screen and stderr would corrupt it in raw mode).

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Default log location in the system temp dir.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("aether-studio.log")
}

/// Install the global subscriber writing to `path`. `RUST_LOG` controls the
/// filter; default is `info`.
pub fn init_global(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;
    Ok(())
}
