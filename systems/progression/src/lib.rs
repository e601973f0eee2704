#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run lifecycle: level requests, the start-of-level hold, level exits,
//! deaths and the highest level reached.

use std::time::Duration;

use scavenger_core::{
    CollectibleSet, Command, DifficultyProfile, Event, ProfileError, ProgressState,
};
use thiserror::Error;
use tracing::{debug, info};

const DEFAULT_LEVEL_START_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_LEVEL_EXIT_DELAY: Duration = Duration::from_secs(1);

/// Configuration parameters required to construct the progression system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    level_start_delay: Duration,
    level_exit_delay: Duration,
}

impl Config {
    /// Creates a configuration from the two transition delays.
    ///
    /// `level_start_delay` is how long a freshly loaded level stays paused;
    /// `level_exit_delay` separates a completed level from the next request.
    #[must_use]
    pub const fn new(level_start_delay: Duration, level_exit_delay: Duration) -> Self {
        Self {
            level_start_delay,
            level_exit_delay,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL_START_DELAY, DEFAULT_LEVEL_EXIT_DELAY)
    }
}

/// Where the run currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// No level has been requested yet.
    Idle,
    /// Waiting for the layout of `level`.
    Generating {
        /// Requested level.
        level: u32,
    },
    /// The level is loaded and held paused.
    Holding {
        /// Loaded level.
        level: u32,
        /// Time left before the level unpauses.
        remaining: Duration,
    },
    /// The level is being played.
    Playing {
        /// Current level.
        level: u32,
    },
    /// The level was completed and the next one is pending.
    Exiting {
        /// Time left before the next level is requested.
        remaining: Duration,
    },
    /// The player starved on `level`.
    GameOver {
        /// Level the run ended on.
        level: u32,
    },
}

/// Persisted records changed since the last [`Progression::take_dirty`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dirty {
    /// The difficulty profile changed.
    pub profile: bool,
    /// Food, level or held item changed.
    pub progress: bool,
    /// A collectible was found or the set was erased.
    pub collectibles: bool,
}

impl Dirty {
    /// Whether anything needs saving.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.profile || self.progress || self.collectibles
    }
}

/// Errors reported by run lifecycle requests.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ProgressionError {
    /// The profile breaks an invariant.
    #[error("invalid difficulty profile: {0}")]
    Profile(#[from] ProfileError),
    /// `begin` was called on a run that already started.
    #[error("the run has already started")]
    AlreadyStarted,
    /// `restart` was called while the player is alive.
    #[error("the run can only restart after a game over")]
    NotGameOver,
    /// Profiles can only change between runs.
    #[error("the profile cannot change while a level is in progress")]
    RunInProgress,
}

/// System that owns the [`ProgressState`] and sequences levels.
#[derive(Debug)]
pub struct Progression {
    config: Config,
    profile: DifficultyProfile,
    progress: ProgressState,
    record_level: u32,
    stage: Stage,
    dirty: Dirty,
}

impl Progression {
    /// Creates the system from a saved profile and run state.
    #[must_use]
    pub fn new(config: Config, profile: DifficultyProfile, progress: ProgressState) -> Self {
        Self {
            config,
            profile,
            progress,
            record_level: 0,
            stage: Stage::Idle,
            dirty: Dirty::default(),
        }
    }

    /// Current stage of the run.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Active difficulty profile.
    #[must_use]
    pub const fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Run state carried between levels.
    #[must_use]
    pub const fn progress(&self) -> &ProgressState {
        &self.progress
    }

    /// Collectibles found so far.
    #[must_use]
    pub const fn collectibles(&self) -> &CollectibleSet {
        &self.progress.collectibles
    }

    /// Highest level completed during this session.
    #[must_use]
    pub const fn record_level(&self) -> u32 {
        self.record_level
    }

    /// Returns and clears the records changed since the last call.
    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    /// Starts the run by requesting the saved next level.
    pub fn begin(&mut self, out: &mut Vec<Command>) -> Result<(), ProgressionError> {
        if self.stage != Stage::Idle {
            return Err(ProgressionError::AlreadyStarted);
        }
        self.profile.validate()?;
        self.request_level(self.progress.next_level, out);
        Ok(())
    }

    /// Starts a fresh run after a game over.
    pub fn restart(&mut self, out: &mut Vec<Command>) -> Result<(), ProgressionError> {
        if !matches!(self.stage, Stage::GameOver { .. }) {
            return Err(ProgressionError::NotGameOver);
        }
        self.request_level(self.progress.next_level, out);
        Ok(())
    }

    /// Replaces the profile and starts a new run state from it.
    ///
    /// Collectibles are kept. Only allowed before the run starts or after a
    /// game over.
    pub fn update_profile(&mut self, profile: DifficultyProfile) -> Result<(), ProgressionError> {
        if !matches!(self.stage, Stage::Idle | Stage::GameOver { .. }) {
            return Err(ProgressionError::RunInProgress);
        }
        profile.validate()?;
        self.profile = profile;
        self.progress.reset(&self.profile);
        self.dirty.profile = true;
        self.dirty.progress = true;
        Ok(())
    }

    /// Restores the default profile, a fresh run and an empty collection.
    pub fn erase_progress(&mut self) -> Result<(), ProgressionError> {
        if !matches!(self.stage, Stage::Idle | Stage::GameOver { .. }) {
            return Err(ProgressionError::RunInProgress);
        }
        self.profile = DifficultyProfile::default();
        self.progress = ProgressState::from_profile(&self.profile);
        self.dirty = Dirty {
            profile: true,
            progress: true,
            collectibles: true,
        };
        Ok(())
    }

    /// Consumes world and generator events to advance the run.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelGenerated { layout } => match self.stage {
                    Stage::Generating { level } if level == layout.level => {
                        out.push(Command::LoadLevel {
                            layout: layout.clone(),
                            loadout: self.progress.loadout(),
                            profile: self.profile,
                        });
                        self.stage = Stage::Holding {
                            level,
                            remaining: self.config.level_start_delay,
                        };
                        if self.config.level_start_delay.is_zero() {
                            self.release_hold(level, out);
                        }
                    }
                    _ => debug!(level = layout.level, "unrequested layout ignored"),
                },
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                Event::CollectibleFound { index } => {
                    if self.progress.collectibles.mark_found(*index) {
                        info!(index = index.get(), "collectible found");
                        self.dirty.collectibles = true;
                    }
                }
                Event::LevelCompleted {
                    level,
                    food,
                    held_item,
                } => {
                    self.progress.record_level_exit(*level, *food, *held_item);
                    if *level > self.record_level {
                        self.record_level = *level;
                    }
                    self.dirty.progress = true;
                    self.dirty.collectibles = true;
                    info!(level, food, "level completed");
                    self.stage = Stage::Exiting {
                        remaining: self.config.level_exit_delay,
                    };
                    if self.config.level_exit_delay.is_zero() {
                        self.request_level(self.progress.next_level, out);
                    }
                }
                Event::GameOver { level } => {
                    self.progress.reset(&self.profile);
                    self.dirty.progress = true;
                    info!(level, record = self.record_level, "run ended");
                    self.stage = Stage::GameOver { level: *level };
                }
                _ => {}
            }
        }
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        match self.stage {
            Stage::Holding { level, remaining } => {
                let remaining = remaining.saturating_sub(dt);
                self.stage = Stage::Holding { level, remaining };
                if remaining.is_zero() {
                    self.release_hold(level, out);
                }
            }
            Stage::Exiting { remaining } => {
                let remaining = remaining.saturating_sub(dt);
                self.stage = Stage::Exiting { remaining };
                if remaining.is_zero() {
                    self.request_level(self.progress.next_level, out);
                }
            }
            _ => {}
        }
    }

    fn release_hold(&mut self, level: u32, out: &mut Vec<Command>) {
        out.push(Command::SetPaused { paused: false });
        self.stage = Stage::Playing { level };
        info!(level, "level started");
    }

    fn request_level(&mut self, level: u32, out: &mut Vec<Command>) {
        out.push(Command::GenerateLevel { level });
        self.stage = Stage::Generating { level };
    }
}
