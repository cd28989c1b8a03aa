//! Tracing setup.
//!
//! Interactive sessions log to a file in the data directory so output never
//! lands on the alternate screen; one-shot modes log to stderr.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub(crate) const LOG_FILE: &str = "volatility-terminal.log";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr. Defaults to warnings only so stdout stays machine-readable.
pub(crate) fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("volatility_terminal=warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to `<data_dir>/volatility-terminal.log`, appending.
pub(crate) fn init_file(data_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("create {}", data_dir.display()))?;
    let path = data_dir.join(LOG_FILE);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("volatility_terminal=info"))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(path)
}
