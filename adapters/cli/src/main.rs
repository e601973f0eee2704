#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Scavenger headlessly with a scripted
//! player and reports how far the run got.

mod autopilot;
mod config;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use scavenger_core::DifficultyPreset;
use scavenger_persistence::{DirectoryStore, MemoryStore, SaveStore};
use scavenger_system_progression::Stage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::SessionConfig,
    session::{Session, Summary},
};

/// Command-line arguments accepted by the Scavenger binary.
#[derive(Debug, Parser)]
#[command(name = "scavenger", about = "Headless Scavenger session runner")]
struct CliArgs {
    /// Session configuration file in TOML format.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed every level layout is derived from.
    #[arg(long)]
    seed: Option<u64>,
    /// Difficulty preset to switch to before the run starts.
    #[arg(long, value_enum)]
    difficulty: Option<PresetArg>,
    /// Directory holding save records; saves stay in memory when omitted.
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,
    /// Number of levels to complete before stopping.
    #[arg(long)]
    levels: Option<u32>,
    /// Hard cap on simulated ticks.
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Simulated milliseconds per tick.
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Runs to restart after a game over.
    #[arg(long)]
    restarts: Option<u32>,
}

/// Difficulty presets selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    Easy,
    Normal,
    Hard,
}

impl From<PresetArg> for DifficultyPreset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Easy => Self::Easy,
            PresetArg::Normal => Self::Normal,
            PresetArg::Hard => Self::Hard,
        }
    }
}

impl CliArgs {
    fn apply(self, config: &mut SessionConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(preset) = self.difficulty {
            config.difficulty = Some(preset.into());
        }
        if let Some(save_dir) = self.save_dir {
            config.save_dir = Some(save_dir);
        }
        if let Some(levels) = self.levels {
            config.levels = levels;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if let Some(restarts) = self.restarts {
            config.restarts = restarts;
        }
    }
}

/// Entry point for the Scavenger command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = CliArgs::parse();
    let mut config = SessionConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    let summary = match config.save_dir.clone() {
        Some(dir) => run(&config, DirectoryStore::new(dir))?,
        None => run(&config, MemoryStore::new())?,
    };

    println!(
        "ticks: {}, levels completed: {}, deaths: {}, record level: {}, collectibles: {}",
        summary.ticks,
        summary.levels_completed,
        summary.deaths,
        summary.record_level,
        summary.collectibles
    );
    Ok(())
}

fn run<S: SaveStore>(config: &SessionConfig, store: S) -> Result<Summary> {
    let mut session = Session::new(config, store)?;
    let mut restarts_left = config.restarts;
    session.begin()?;

    for _ in 0..config.max_ticks {
        if let Stage::GameOver { level } = session.stage() {
            if restarts_left == 0 {
                info!(level, "run over");
                break;
            }
            restarts_left -= 1;
            session.restart()?;
        }

        let intents = autopilot::plan(session.world());
        session.step(config.tick(), &intents)?;

        if session.summary().levels_completed >= config.levels {
            info!(levels = config.levels, "level target reached");
            break;
        }
    }

    let summary = session.summary();
    if summary.ticks >= config.max_ticks {
        warn!(max_ticks = config.max_ticks, "tick budget exhausted");
    }
    Ok(summary)
}
