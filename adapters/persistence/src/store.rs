//! Raw record stores addressed by slot.

use std::{
    collections::HashMap,
    fmt, fs, io,
    path::PathBuf,
};

use crate::StoreError;

/// Independent records kept by the save system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Selected difficulty profile.
    Difficulty,
    /// Food, next level and held item of the current run.
    LevelData,
    /// Collectibles found across every run.
    Collectibles,
}

impl Slot {
    /// Every slot in save order.
    pub const ALL: [Slot; 3] = [Slot::Difficulty, Slot::LevelData, Slot::Collectibles];

    /// Stable name of the slot.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Difficulty => "difficulty",
            Self::LevelData => "level_data",
            Self::Collectibles => "collectibles",
        }
    }

    /// File name used by [`DirectoryStore`].
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque storage of serialised records.
pub trait SaveStore {
    /// Reads a record, returning `None` when the slot was never written.
    fn read(&self, slot: Slot) -> Result<Option<String>, StoreError>;

    /// Replaces the record held in `slot`.
    fn write(&mut self, slot: Slot, contents: &str) -> Result<(), StoreError>;
}

/// Store that keeps one JSON file per slot inside a directory.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Creates a store rooted at `root`; the directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file backing `slot`.
    #[must_use]
    pub fn path(&self, slot: Slot) -> PathBuf {
        self.root.join(slot.file_name())
    }
}

impl SaveStore for DirectoryStore {
    fn read(&self, slot: Slot) -> Result<Option<String>, StoreError> {
        let path = self.path(slot);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn write(&mut self, slot: Slot, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Write {
            path: self.root.clone(),
            source,
        })?;
        let path = self.path(slot);
        fs::write(&path, contents).map_err(|source| StoreError::Write { path, source })
    }
}

/// In-memory store used by tests and headless sessions without a save directory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: HashMap<Slot, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw contents of a slot.
    #[must_use]
    pub fn raw(&self, slot: Slot) -> Option<&str> {
        self.records.get(&slot).map(String::as_str)
    }

    /// Overwrites a slot with arbitrary contents.
    pub fn set_raw(&mut self, slot: Slot, contents: impl Into<String>) {
        let _ = self.records.insert(slot, contents.into());
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, slot: Slot) -> Result<Option<String>, StoreError> {
        Ok(self.records.get(&slot).cloned())
    }

    fn write(&mut self, slot: Slot, contents: &str) -> Result<(), StoreError> {
        self.set_raw(slot, contents);
        Ok(())
    }
}
