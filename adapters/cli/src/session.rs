//! Headless session that wires the world, every system and the save store
//! into one message pump.

use std::time::Duration;

use anyhow::{Context, Result};
use scavenger_core::{Command, DifficultyProfile, Event};
use scavenger_persistence::{SaveManager, SaveStore};
use scavenger_system_enemy_behavior::EnemyBehavior;
use scavenger_system_level_generation::{Config as GenerationConfig, LevelGeneration};
use scavenger_system_player_control::{Intent, PlayerControl};
use scavenger_system_progression::{Progression, Stage};
use scavenger_world::{apply, query, World};
use tracing::{debug, info};

use crate::config::SessionConfig;

/// Counters reported when the session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) levels_completed: u32,
    pub(crate) deaths: u32,
    pub(crate) record_level: u32,
    pub(crate) collectibles: usize,
}

/// World plus systems driven by ticks and intents.
pub(crate) struct Session<S: SaveStore> {
    world: World,
    generation: LevelGeneration,
    progression: Progression,
    behavior: EnemyBehavior,
    control: PlayerControl,
    saves: SaveManager<S>,
    summary: Summary,
}

impl<S: SaveStore> Session<S> {
    /// Restores the saved game from `store` and prepares the systems.
    pub(crate) fn new(config: &SessionConfig, store: S) -> Result<Self> {
        let saves = SaveManager::new(store);
        let profile = saves.load_profile().context("failed to load difficulty")?;
        let progress = saves
            .load_progress(&profile)
            .context("failed to load saved run")?;

        let mut progression = Progression::new(config.progression(), profile, progress);
        if let Some(preset) = config.difficulty {
            if preset != profile.preset {
                progression
                    .update_profile(DifficultyProfile::preset(preset))
                    .context("failed to switch difficulty")?;
                info!(?preset, "difficulty switched, run progress reset");
            }
        }

        let mut session = Self {
            world: World::new(),
            generation: LevelGeneration::new(GenerationConfig::new(
                config.seed,
                config.layout_tuning(),
            )),
            progression,
            behavior: EnemyBehavior::new(config.behavior()),
            control: PlayerControl::new(),
            saves,
            summary: Summary::default(),
        };
        session.persist()?;
        Ok(session)
    }

    /// Requests the first level of the run.
    pub(crate) fn begin(&mut self) -> Result<()> {
        let mut commands = Vec::new();
        self.progression
            .begin(&mut commands)
            .context("failed to begin the run")?;
        self.pump(commands, &[])
    }

    /// Starts a new run after a game over.
    pub(crate) fn restart(&mut self) -> Result<()> {
        let mut commands = Vec::new();
        self.progression
            .restart(&mut commands)
            .context("failed to restart the run")?;
        self.pump(commands, &[])
    }

    /// Advances the simulation by `dt` with the player's `intents`.
    pub(crate) fn step(&mut self, dt: Duration, intents: &[Intent]) -> Result<()> {
        self.summary.ticks += 1;
        self.pump(vec![Command::Tick { dt }], intents)
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn stage(&self) -> Stage {
        self.progression.stage()
    }

    pub(crate) fn summary(&self) -> Summary {
        Summary {
            record_level: self.progression.record_level(),
            collectibles: self.progression.collectibles().found_count(),
            ..self.summary
        }
    }

    /// Routes commands through the world until no system has anything left
    /// to say, then saves whatever changed.
    fn pump(&mut self, mut commands: Vec<Command>, intents: &[Intent]) -> Result<()> {
        let mut intents = intents;
        while !commands.is_empty() {
            let mut events = Vec::new();
            self.generation
                .handle(
                    &commands,
                    self.progression.profile(),
                    self.progression.collectibles(),
                    &mut events,
                )
                .context("level generation failed")?;
            for command in commands.drain(..) {
                apply(&mut self.world, command, &mut events);
            }
            self.observe(&events);

            let player = query::player(&self.world);
            let enemies = query::enemy_view(&self.world);
            self.progression.handle(&events, &mut commands);
            self.behavior
                .handle(&events, &enemies, player.as_ref(), &mut commands);
            self.control
                .handle(&events, intents, player.as_ref(), &mut commands);
            intents = &[];
        }
        self.persist()
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::LevelCompleted { .. } => self.summary.levels_completed += 1,
                Event::GameOver { .. } => self.summary.deaths += 1,
                _ => {}
            }
        }
    }

    fn persist(&mut self) -> Result<()> {
        let dirty = self.progression.take_dirty();
        if !dirty.any() {
            return Ok(());
        }
        if dirty.profile {
            self.saves
                .save_profile(self.progression.profile())
                .context("failed to save difficulty")?;
        }
        if dirty.progress {
            self.saves
                .save_progress(self.progression.progress())
                .context("failed to save run")?;
        }
        if dirty.collectibles {
            self.saves
                .save_collectibles(self.progression.collectibles())
                .context("failed to save collectibles")?;
        }
        debug!(?dirty, "saves written");
        Ok(())
    }
}
