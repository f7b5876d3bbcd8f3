use std::{path::PathBuf, time::Duration};

use blockfall_engine::{GameSession, PieceSeed};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use crate::{command::play::app::PlayApp, logging, tui::Tui, util::StatsReport};

mod app;
mod input;

const DEFAULT_POLL_INTERVAL_MS: u64 = 30;
const DEFAULT_LEVEL_UP_PAUSE_MS: u64 = 800;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// 128-bit hex seed for a reproducible piece order (random if omitted)
    #[clap(long, value_name = "HEX32")]
    seed: Option<PieceSeed>,
    /// How often the terminal is polled and gravity is advanced
    #[clap(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,
    /// How long the level-up banner stays on screen; gravity waits meanwhile
    #[clap(long, default_value_t = DEFAULT_LEVEL_UP_PAUSE_MS)]
    level_up_pause_ms: u64,
    /// Hide the landing preview
    #[clap(long)]
    no_ghost: bool,
    /// Write the final statistics to this file as JSON on exit
    #[clap(long)]
    stats_output: Option<PathBuf>,
    /// Append log events to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
    /// Most verbose level written to the log file
    #[clap(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            level_up_pause_ms: DEFAULT_LEVEL_UP_PAUSE_MS,
            no_ghost: false,
            stats_output: None,
            log_file: None,
            log_level: LevelFilter::INFO,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        poll_interval_ms,
        level_up_pause_ms,
        no_ghost,
        stats_output,
        log_file,
        log_level,
    } = arg;

    if let Some(path) = log_file {
        logging::init(path, *log_level)?;
    }

    let session = match seed {
        Some(seed) => GameSession::with_seed(*seed),
        None => GameSession::new(),
    };
    info!("starting game with seed {}", session.seed());

    let mut app = PlayApp::new(session)
        .poll_interval(Duration::from_millis(*poll_interval_ms))
        .level_up_pause(Duration::from_millis(*level_up_pause_ms))
        .show_ghost(!no_ghost);
    Tui::new().run(&mut app)?;

    let session = app.into_session();
    let stats = session.stats();
    println!(
        "Final score: {}, level: {}, lines: {}",
        stats.score(),
        stats.level(),
        stats.total_cleared_lines()
    );

    if let Some(path) = stats_output {
        StatsReport::new(session.seed(), stats).save(path)?;
        println!("Statistics written to {}", path.display());
    }

    Ok(())
}
