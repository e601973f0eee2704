use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use scavenger_core::{
    CollectibleIndex, CollectibleSet, DifficultyPreset, DifficultyProfile, HeldItem,
    ProgressState, WeaponKind,
};
use scavenger_persistence::{DirectoryStore, MemoryStore, SaveManager, Slot, StoreError};

fn sample_progress() -> ProgressState {
    let mut collectibles = CollectibleSet::new();
    let _ = collectibles.mark_raw(0).expect("in range");
    let _ = collectibles.mark_raw(7).expect("in range");
    ProgressState {
        food_points: 63,
        next_level: 12,
        held_item: Some(HeldItem {
            kind: WeaponKind::Crossbow,
            uses: 3,
        }),
        collectibles,
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("scavenger-{name}-{}-{nanos}", std::process::id()))
}

#[test]
fn profile_round_trips_through_memory() {
    let mut manager = SaveManager::new(MemoryStore::new());
    let mut profile = DifficultyProfile::preset(DifficultyPreset::Hard);
    profile.initial_food = 80;

    manager.save_profile(&profile).expect("saved");

    assert_eq!(manager.load_profile().expect("loaded"), profile);
}

#[test]
fn progress_and_collectibles_live_in_separate_slots() {
    let mut manager = SaveManager::new(MemoryStore::new());
    let progress = sample_progress();

    manager.save_progress(&progress).expect("saved");
    assert!(manager.store().raw(Slot::Collectibles).is_none());

    manager
        .save_collectibles(&progress.collectibles)
        .expect("saved");

    let loaded = manager
        .load_progress(&DifficultyProfile::default())
        .expect("loaded");
    assert_eq!(loaded, progress);
    assert!(loaded
        .collectibles
        .contains(CollectibleIndex::new(7).expect("in range")));
}

#[test]
fn missing_run_keeps_saved_collectibles() {
    let mut manager = SaveManager::new(MemoryStore::new());
    let progress = sample_progress();
    manager
        .save_collectibles(&progress.collectibles)
        .expect("saved");

    let profile = DifficultyProfile::preset(DifficultyPreset::Easy);
    let loaded = manager.load_progress(&profile).expect("loaded");

    assert_eq!(loaded.next_level, profile.start_level.max(1));
    assert_eq!(loaded.food_points, profile.initial_food);
    assert_eq!(loaded.collectibles, progress.collectibles);
}

#[test]
fn corrupt_records_are_reported() {
    let mut store = MemoryStore::new();
    store.set_raw(Slot::Difficulty, "{ not json");
    let manager = SaveManager::new(store);

    match manager.load_profile() {
        Err(StoreError::Corrupt { slot, .. }) => assert_eq!(slot, Slot::Difficulty),
        other => panic!("unexpected load result: {other:?}"),
    }
}

#[test]
fn invalid_profiles_are_rejected() {
    let mut manager = SaveManager::new(MemoryStore::new());
    let mut profile = DifficultyProfile::default();
    profile.initial_food = 0;
    manager.save_profile(&profile).expect("encoding never validates");

    assert!(matches!(
        manager.load_profile(),
        Err(StoreError::InvalidProfile(_))
    ));
}

#[test]
fn unknown_collectible_indices_are_rejected() {
    let mut store = MemoryStore::new();
    store.set_raw(Slot::Collectibles, r#"{"found": [1, 200]}"#);
    let manager = SaveManager::new(store);

    assert!(matches!(
        manager.load_collectibles(),
        Err(StoreError::InvalidCollectibles(_))
    ));
}

#[test]
fn level_data_must_describe_a_live_run() {
    let mut store = MemoryStore::new();
    store.set_raw(
        Slot::LevelData,
        r#"{"food_points": 10, "next_level": 0, "held_item": null}"#,
    );
    let manager = SaveManager::new(store);

    assert!(matches!(
        manager.load_progress(&DifficultyProfile::default()),
        Err(StoreError::InvalidLevelData(_))
    ));
}

#[test]
fn directory_store_writes_one_file_per_slot() {
    let root = scratch_dir("slots");
    let mut manager = SaveManager::new(DirectoryStore::new(&root));
    let progress = sample_progress();
    let profile = DifficultyProfile::preset(DifficultyPreset::Easy);

    assert_eq!(manager.load_profile().expect("defaults"), DifficultyProfile::default());

    manager.save_profile(&profile).expect("saved");
    manager.save_progress(&progress).expect("saved");
    manager
        .save_collectibles(&progress.collectibles)
        .expect("saved");

    for slot in Slot::ALL {
        assert!(manager.store().path(slot).is_file(), "{slot} not written");
    }

    let reopened = SaveManager::new(DirectoryStore::new(&root));
    assert_eq!(reopened.load_profile().expect("loaded"), profile);
    assert_eq!(reopened.load_progress(&profile).expect("loaded"), progress);

    fs::remove_dir_all(&root).expect("scratch directory removed");
}
