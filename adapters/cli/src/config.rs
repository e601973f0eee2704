//! Session configuration loaded from an optional TOML file.

use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use scavenger_core::DifficultyPreset;
use scavenger_system_enemy_behavior::Config as BehaviorConfig;
use scavenger_system_level_generation::{CountRange, LayoutTuning};
use scavenger_system_progression::Config as ProgressionConfig;
use serde::Deserialize;

/// Everything a headless session needs besides the saved game.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    /// Seed every level layout is derived from.
    pub(crate) seed: u64,
    /// Preset to switch to before the run starts; `None` keeps the saved profile.
    pub(crate) difficulty: Option<DifficultyPreset>,
    /// Directory holding save records; `None` keeps saves in memory.
    pub(crate) save_dir: Option<PathBuf>,
    /// Simulated time per tick in milliseconds.
    pub(crate) tick_ms: u64,
    /// Hard cap on simulated ticks.
    pub(crate) max_ticks: u64,
    /// The session stops after completing this many levels.
    pub(crate) levels: u32,
    /// Runs restarted after a game over before the session gives up.
    pub(crate) restarts: u32,
    /// Pause held after a level loads, in milliseconds.
    pub(crate) level_start_delay_ms: u64,
    /// Delay between leaving a level and requesting the next, in milliseconds.
    pub(crate) level_exit_delay_ms: u64,
    /// Enemy wake stagger settings.
    pub(crate) stagger: StaggerConfig,
    /// Base spawn counts before difficulty scaling.
    pub(crate) tuning: TuningConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            difficulty: None,
            save_dir: None,
            tick_ms: 50,
            max_ticks: 20_000,
            levels: 5,
            restarts: 0,
            level_start_delay_ms: 2_000,
            level_exit_delay_ms: 1_000,
            stagger: StaggerConfig::default(),
            tuning: TuningConfig::default(),
        }
    }
}

/// Enemy wake stagger expressed in TOML-friendly units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StaggerConfig {
    /// Share of an enemy's wait time added per registration index.
    pub(crate) percent: u32,
    /// Window the stagger wraps into, in milliseconds.
    pub(crate) window_ms: u64,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            percent: 20,
            window_ms: 1_000,
        }
    }
}

/// Inclusive `[min, max]` spawn counts per tile kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TuningConfig {
    pub(crate) walls: [u32; 2],
    pub(crate) food: [u32; 2],
    pub(crate) items: [u32; 2],
}

impl Default for TuningConfig {
    fn default() -> Self {
        let tuning = LayoutTuning::default();
        Self {
            walls: [tuning.walls.min(), tuning.walls.max()],
            food: [tuning.food.min(), tuning.food.max()],
            items: [tuning.items.min(), tuning.items.max()],
        }
    }
}

impl SessionConfig {
    /// Reads the file at `path`, or returns defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    /// Parses and validates TOML contents.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse session config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the session loop cannot run with.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            bail!("tick_ms must be at least 1");
        }
        if self.stagger.window_ms == 0 {
            bail!("stagger.window_ms must be at least 1");
        }
        Ok(())
    }

    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub(crate) fn layout_tuning(&self) -> LayoutTuning {
        let range = |[min, max]: [u32; 2]| CountRange::new(min, max);
        LayoutTuning {
            walls: range(self.tuning.walls),
            food: range(self.tuning.food),
            items: range(self.tuning.items),
        }
    }

    pub(crate) fn progression(&self) -> ProgressionConfig {
        ProgressionConfig::new(
            Duration::from_millis(self.level_start_delay_ms),
            Duration::from_millis(self.level_exit_delay_ms),
        )
    }

    pub(crate) fn behavior(&self) -> BehaviorConfig {
        BehaviorConfig::new(
            self.stagger.percent,
            Duration::from_millis(self.stagger.window_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(
            SessionConfig::parse("").expect("parses"),
            SessionConfig::default()
        );
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = SessionConfig::parse(
            r#"
            seed = 42
            difficulty = "Hard"

            [tuning]
            walls = [2, 3]
            "#,
        )
        .expect("parses");

        assert_eq!(config.seed, 42);
        assert_eq!(config.difficulty, Some(DifficultyPreset::Hard));
        assert_eq!(config.tuning.walls, [2, 3]);
        assert_eq!(config.tuning.food, TuningConfig::default().food);
        assert_eq!(config.layout_tuning().walls, CountRange::new(2, 3));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(SessionConfig::parse("tick = 5").is_err());
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(SessionConfig::parse("tick_ms = 0").is_err());
    }
}
