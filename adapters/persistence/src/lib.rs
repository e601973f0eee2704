#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Save-data adapter that keeps the difficulty profile, run state and
//! collectibles as JSON records in three independent slots.

mod store;

use std::path::PathBuf;

use scavenger_core::{
    CollectibleError, CollectibleIndex, CollectibleSet, DifficultyProfile, HeldItem,
    ProfileError, ProgressState,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use store::{DirectoryStore, MemoryStore, SaveStore, Slot};

/// Errors raised while reading or writing save records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A record could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        /// File or directory that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A record is not valid JSON for its slot.
    #[error("corrupt {slot} record")]
    Corrupt {
        /// Slot holding the record.
        slot: Slot,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// A record could not be serialised.
    #[error("failed to encode {slot} record")]
    Encode {
        /// Slot being written.
        slot: Slot,
        /// Serialisation failure.
        #[source]
        source: serde_json::Error,
    },
    /// The stored profile breaks an invariant.
    #[error("stored difficulty profile is invalid")]
    InvalidProfile(#[source] ProfileError),
    /// The stored collectibles reference an unknown index.
    #[error("stored collectibles are invalid")]
    InvalidCollectibles(#[source] CollectibleError),
    /// The stored run state cannot be resumed.
    #[error("stored level data is invalid: {0}")]
    InvalidLevelData(&'static str),
}

#[derive(Debug, Serialize, Deserialize)]
struct LevelDataRecord {
    food_points: i32,
    next_level: u32,
    held_item: Option<HeldItem>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectiblesRecord {
    found: Vec<u8>,
}

/// Typed access to the three save slots of a [`SaveStore`].
#[derive(Debug)]
pub struct SaveManager<S: SaveStore> {
    store: S,
}

impl<S: SaveStore> SaveManager<S> {
    /// Wraps a record store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying record store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the saved profile, or the normal preset when none was saved.
    pub fn load_profile(&self) -> Result<DifficultyProfile, StoreError> {
        let Some(profile) = self.read::<DifficultyProfile>(Slot::Difficulty)? else {
            info!("no saved difficulty, using the normal preset");
            return Ok(DifficultyProfile::default());
        };
        profile.validate().map_err(StoreError::InvalidProfile)?;
        Ok(profile)
    }

    /// Saves the profile.
    pub fn save_profile(&mut self, profile: &DifficultyProfile) -> Result<(), StoreError> {
        self.write(Slot::Difficulty, profile)
    }

    /// Loads the run state and collectibles.
    ///
    /// A missing run record starts a fresh run from `profile`; a missing
    /// collectibles record yields an empty set.
    pub fn load_progress(&self, profile: &DifficultyProfile) -> Result<ProgressState, StoreError> {
        let mut progress = match self.read::<LevelDataRecord>(Slot::LevelData)? {
            Some(record) => {
                if record.next_level == 0 {
                    return Err(StoreError::InvalidLevelData("next level must be at least 1"));
                }
                if record.food_points <= 0 {
                    return Err(StoreError::InvalidLevelData("food must be positive"));
                }
                ProgressState {
                    food_points: record.food_points,
                    next_level: record.next_level,
                    held_item: record.held_item.filter(|held| held.uses > 0),
                    collectibles: CollectibleSet::new(),
                }
            }
            None => {
                info!("no saved run, starting fresh");
                ProgressState::from_profile(profile)
            }
        };
        progress.collectibles = self.load_collectibles()?;
        Ok(progress)
    }

    /// Saves food, next level and held item. Collectibles have their own slot.
    pub fn save_progress(&mut self, progress: &ProgressState) -> Result<(), StoreError> {
        let record = LevelDataRecord {
            food_points: progress.food_points,
            next_level: progress.next_level,
            held_item: progress.held_item,
        };
        self.write(Slot::LevelData, &record)
    }

    /// Loads the found collectibles, or an empty set when none were saved.
    pub fn load_collectibles(&self) -> Result<CollectibleSet, StoreError> {
        let Some(record) = self.read::<CollectiblesRecord>(Slot::Collectibles)? else {
            info!("no saved collectibles");
            return Ok(CollectibleSet::new());
        };
        let mut set = CollectibleSet::new();
        for raw in record.found {
            let _ = set
                .mark_raw(raw)
                .map_err(StoreError::InvalidCollectibles)?;
        }
        Ok(set)
    }

    /// Saves the found collectibles.
    pub fn save_collectibles(&mut self, collectibles: &CollectibleSet) -> Result<(), StoreError> {
        let record = CollectiblesRecord {
            found: CollectibleIndex::all()
                .filter(|index| collectibles.contains(*index))
                .map(|index| index.get())
                .collect(),
        };
        self.write(Slot::Collectibles, &record)
    }

    fn read<T: DeserializeOwned>(&self, slot: Slot) -> Result<Option<T>, StoreError> {
        let Some(contents) = self.store.read(slot)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&contents)
            .map_err(|source| StoreError::Corrupt { slot, source })?;
        debug!(%slot, "record loaded");
        Ok(Some(value))
    }

    fn write<T: Serialize>(&mut self, slot: Slot, value: &T) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Encode { slot, source })?;
        self.store.write(slot, &contents)?;
        debug!(%slot, "record saved");
        Ok(())
    }
}
