//! Save-data model carried between levels and runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CollectibleIndex, DifficultyProfile, HeldItem, PlayerLoadout, COLLECTIBLE_COUNT};

/// Permanently tracked set of found collectibles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectibleSet {
    found: [bool; COLLECTIBLE_COUNT],
}

impl CollectibleSet {
    /// Creates a set where nothing has been found yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            found: [false; COLLECTIBLE_COUNT],
        }
    }

    /// Marks a collectible as found, returning whether it was new.
    pub fn mark_found(&mut self, index: CollectibleIndex) -> bool {
        let slot = &mut self.found[usize::from(index.get())];
        let fresh = !*slot;
        *slot = true;
        fresh
    }

    /// Marks a collectible by raw index, rejecting values out of range.
    pub fn mark_raw(&mut self, raw: u8) -> Result<bool, CollectibleError> {
        let index = CollectibleIndex::new(raw).ok_or(CollectibleError::OutOfRange(raw))?;
        Ok(self.mark_found(index))
    }

    /// Whether a collectible was already found.
    #[must_use]
    pub fn contains(&self, index: CollectibleIndex) -> bool {
        self.found[usize::from(index.get())]
    }

    /// Collectibles not found yet, in ascending order.
    pub fn missing(&self) -> impl Iterator<Item = CollectibleIndex> + '_ {
        CollectibleIndex::all().filter(move |index| !self.contains(*index))
    }

    /// Number of collectibles found.
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.found.iter().filter(|found| **found).count()
    }

    /// Whether every collectible was found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.found_count() == COLLECTIBLE_COUNT
    }
}

/// Errors produced when addressing collectibles by raw index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CollectibleError {
    /// The raw index exceeds the number of collectibles.
    #[error("collectible index {0} is out of range")]
    OutOfRange(u8),
}

/// Run state carried between levels and persisted across sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Food points carried into the next level.
    pub food_points: i32,
    /// Level that will be generated next.
    pub next_level: u32,
    /// Item carried into the next level.
    pub held_item: Option<HeldItem>,
    /// Collectibles found across every run.
    pub collectibles: CollectibleSet,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::from_profile(&DifficultyProfile::default())
    }
}

impl ProgressState {
    /// Fresh run state for the provided profile.
    #[must_use]
    pub fn from_profile(profile: &DifficultyProfile) -> Self {
        Self {
            food_points: profile.initial_food,
            next_level: profile.start_level.max(1),
            held_item: None,
            collectibles: CollectibleSet::new(),
        }
    }

    /// Records the state the player left `level` with.
    pub fn record_level_exit(&mut self, level: u32, food: i32, held_item: Option<HeldItem>) {
        self.next_level = level.saturating_add(1);
        self.food_points = food;
        self.held_item = held_item;
    }

    /// Restores run defaults after a death, keeping collectibles.
    pub fn reset(&mut self, profile: &DifficultyProfile) {
        let collectibles = self.collectibles;
        *self = Self::from_profile(profile);
        self.collectibles = collectibles;
    }

    /// Food and equipment the world spawns the player with.
    #[must_use]
    pub const fn loadout(&self) -> PlayerLoadout {
        PlayerLoadout {
            food: self.food_points,
            held_item: self.held_item,
        }
    }
}
