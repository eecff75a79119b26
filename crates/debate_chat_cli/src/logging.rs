//! File-backed `tracing` subscriber.
//!
//! Traces go to `debate-chat.log` in the settings directory so they never
//! interleave with the transcript on stdout.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use settings_store::LOG_FILE_NAME;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

/// Parses `filter`, falling back to the default level when it is invalid.
#[must_use]
pub fn env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber writing to `<settings_dir>/debate-chat.log`.
///
/// Returns the log file path.
pub fn init_file_logging(settings_dir: &Path, filter: &str) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(settings_dir)
        .with_context(|| format!("creating settings directory {}", settings_dir.display()))?;

    let path = settings_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("installing tracing subscriber: {error}"))?;

    Ok(path)
}
