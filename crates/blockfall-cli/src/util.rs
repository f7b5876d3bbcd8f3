use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::Path,
    time::Duration,
};

use anyhow::Context as _;
use blockfall_engine::{GameStats, PieceSeed};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Formats play time as `m:ss.cc`.
pub fn format_play_time(duration: Duration) -> String {
    format!(
        "{}:{:0>2}.{:0>2}",
        duration.as_secs() / 60,
        duration.as_secs() % 60,
        duration.subsec_millis() / 10
    )
}

/// End-of-game statistics written by `--stats-output`.
#[derive(Debug, Serialize)]
pub struct StatsReport<'a> {
    finished_at: DateTime<Utc>,
    seed: PieceSeed,
    stats: &'a GameStats,
}

impl<'a> StatsReport<'a> {
    pub fn new(seed: PieceSeed, stats: &'a GameStats) -> Self {
        Self {
            finished_at: Utc::now(),
            seed,
            stats,
        }
    }

    /// Writes the report to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
        writeln!(writer)
            .with_context(|| format!("Failed to write newline to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", path.display()))?;
        Ok(())
    }
}
