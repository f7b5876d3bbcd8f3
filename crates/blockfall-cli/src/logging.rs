use std::{
    fs::{File, OpenOptions},
    path::Path,
    sync::Mutex,
};

use anyhow::Context as _;
use tracing::Subscriber;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Formats events at `level` and above as plain text lines into `file`.
fn file_subscriber(file: File, level: LevelFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(level)
}

/// Installs the global subscriber, appending to `path`.
///
/// Nothing is written to stdout or stderr, which belong to the UI.
pub fn init(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    file_subscriber(file, level)
        .try_init()
        .context("Failed to install logger")?;
    Ok(())
}
