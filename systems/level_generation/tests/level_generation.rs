use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scavenger_core::{
    area_ratio, CellCoord, CollectibleIndex, CollectibleSet, Command, DifficultyPreset,
    DifficultyProfile, Event, LevelLayout, Spawn,
};
use scavenger_system_level_generation::{
    board_bounds, generate, Config, CountRange, GenerationError, LayoutTuning, LevelGeneration,
};

fn layout_for(seed: u64, level: u32, profile: &DifficultyProfile) -> LevelLayout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(
        level,
        profile,
        &CollectibleSet::new(),
        &LayoutTuning::default(),
        &mut rng,
    )
    .expect("layout generates")
}

/// Normal profile whose boards stay small even on very deep levels.
fn compact_profile() -> DifficultyProfile {
    let mut profile = DifficultyProfile::default();
    profile.level_growth_rate = 0.01;
    profile
}

#[test]
fn every_level_has_one_exit_and_one_supplies_tile() {
    for preset in [
        DifficultyPreset::Easy,
        DifficultyPreset::Normal,
        DifficultyPreset::Hard,
    ] {
        let profile = DifficultyProfile::preset(preset);
        for level in 1..=40 {
            let layout = layout_for(u64::from(level), level, &profile);
            assert_eq!(layout.count(|spawn| *spawn == Spawn::Exit), 1);
            assert_eq!(layout.count(|spawn| *spawn == Spawn::Supplies), 1);
        }
    }
}

#[test]
fn placements_stay_on_the_board_and_off_the_spawn_block() {
    let profile = DifficultyProfile::preset(DifficultyPreset::Hard);
    for seed in 0..50 {
        let layout = layout_for(seed, 12, &profile);
        let mut seen = HashSet::new();
        for placement in &layout.placements {
            assert!(layout.contains(placement.cell));
            assert!(!(placement.cell.column() < 2 && placement.cell.row() < 2));
            assert!(seen.insert(placement.cell), "cell used twice");
        }
    }
}

#[test]
fn boards_are_square_and_sized_by_level() {
    let profile = DifficultyProfile::default();
    for level in [1, 5, 17, 33] {
        let (lo, hi) = board_bounds(level, profile.level_growth_rate);
        for seed in 0..20 {
            let layout = layout_for(seed, level, &profile);
            assert_eq!(layout.columns, layout.rows);
            assert!((lo..=hi).contains(&layout.columns));
        }
    }
}

#[test]
fn gated_weapons_never_appear_below_their_unlock_level() {
    let profile = DifficultyProfile::default();
    for seed in 0..1_000_u64 {
        let level = 1 + (seed % 40) as u32;
        let layout = layout_for(seed, level, &profile);
        for placement in &layout.placements {
            if let Spawn::Item(kind) = placement.spawn {
                assert!(
                    profile.unlocks.weapon(kind) <= level,
                    "{kind:?} placed on level {level}"
                );
            }
        }
    }
}

#[test]
fn gated_enemy_tiers_never_appear_below_their_unlock_level() {
    let profile = DifficultyProfile::default();
    for seed in 0..300_u64 {
        let level = 1 + (seed % 30) as u32;
        let layout = layout_for(seed, level, &profile);
        for placement in &layout.placements {
            if let Spawn::Enemy(tier) = placement.spawn {
                assert!(profile.unlocks.tier(tier) <= level);
            }
        }
    }
}

#[test]
fn minimum_area_ratio_never_shrinks_with_level() {
    for preset in [
        DifficultyPreset::Easy,
        DifficultyPreset::Normal,
        DifficultyPreset::Hard,
    ] {
        let profile = DifficultyProfile::preset(preset);
        let mut previous = 0;
        for level in 1..=200 {
            let (lo, _) = board_bounds(level, profile.level_growth_rate);
            let ratio = area_ratio(lo, lo);
            assert!(ratio >= previous);
            previous = ratio;
        }
    }
}

#[test]
fn first_level_has_no_enemies_or_gated_items() {
    let profile = DifficultyProfile::default();
    for seed in 0..100 {
        let layout = layout_for(seed, 1, &profile);
        assert_eq!(layout.count(|spawn| matches!(spawn, Spawn::Enemy(_))), 0);
        assert_eq!(layout.count(|spawn| matches!(spawn, Spawn::Item(_))), 0);
    }
}

#[test]
fn level_zero_is_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let result = generate(
        0,
        &DifficultyProfile::default(),
        &CollectibleSet::new(),
        &LayoutTuning::default(),
        &mut rng,
    );
    assert_eq!(result, Err(GenerationError::InvalidLevel));
}

#[test]
fn invalid_profiles_are_rejected() {
    let mut profile = DifficultyProfile::default();
    profile.spawn.enemy = 0.0;
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let result = generate(
        4,
        &profile,
        &CollectibleSet::new(),
        &LayoutTuning::default(),
        &mut rng,
    );
    assert!(matches!(result, Err(GenerationError::Profile(_))));
}

#[test]
fn oversized_quotas_fail_instead_of_truncating() {
    let tuning = LayoutTuning {
        walls: CountRange::new(100, 100),
        ..LayoutTuning::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let result = generate(
        1,
        &DifficultyProfile::default(),
        &CollectibleSet::new(),
        &tuning,
        &mut rng,
    );
    assert_eq!(
        result,
        Err(GenerationError::CellsExhausted {
            level: 1,
            spawn: Spawn::Wall,
        })
    );
}

#[test]
fn deep_levels_always_roll_a_missing_collectible() {
    let profile = compact_profile();
    let mut collectibles = CollectibleSet::new();
    for raw in 0..11 {
        let index = CollectibleIndex::new(raw).expect("index in range");
        let _ = collectibles.mark_found(index);
    }
    let last = CollectibleIndex::new(11).expect("index in range");

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let layout = generate(
            300,
            &profile,
            &collectibles,
            &LayoutTuning::default(),
            &mut rng,
        )
        .expect("layout generates");
        let found: Vec<Spawn> = layout
            .placements
            .iter()
            .map(|placement| placement.spawn)
            .filter(|spawn| matches!(spawn, Spawn::Collectible(_)))
            .collect();
        assert_eq!(found, vec![Spawn::Collectible(last)]);
    }
}

#[test]
fn completed_sets_and_easy_runs_place_no_collectible() {
    let mut complete = CollectibleSet::new();
    for index in CollectibleIndex::all() {
        let _ = complete.mark_found(index);
    }
    let mut easy = compact_profile();
    easy.preset = DifficultyPreset::Easy;

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let layout = generate(
            300,
            &compact_profile(),
            &complete,
            &LayoutTuning::default(),
            &mut rng,
        )
        .expect("layout generates");
        assert_eq!(
            layout.count(|spawn| matches!(spawn, Spawn::Collectible(_))),
            0
        );

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let layout = generate(
            300,
            &easy,
            &CollectibleSet::new(),
            &LayoutTuning::default(),
            &mut rng,
        )
        .expect("layout generates");
        assert_eq!(
            layout.count(|spawn| matches!(spawn, Spawn::Collectible(_))),
            0
        );
    }
}

#[test]
fn sessions_replay_deterministically() {
    let profile = DifficultyProfile::preset(DifficultyPreset::Hard);
    let collectibles = CollectibleSet::new();
    let first = LevelGeneration::new(Config::new(42, LayoutTuning::default()));
    let second = LevelGeneration::new(Config::new(42, LayoutTuning::default()));

    for level in [1, 7, 19] {
        assert_eq!(
            first.generate_level(level, &profile, &collectibles),
            second.generate_level(level, &profile, &collectibles)
        );
    }
}

#[test]
fn generate_level_commands_emit_layouts() {
    let mut system = LevelGeneration::new(Config::new(9, LayoutTuning::default()));
    let mut events = Vec::new();

    system
        .handle(
            &[
                Command::GenerateLevel { level: 2 },
                Command::GenerateLevel { level: 3 },
            ],
            &DifficultyProfile::default(),
            &CollectibleSet::new(),
            &mut events,
        )
        .expect("levels generate");

    let levels: Vec<u32> = events
        .iter()
        .map(|event| match event {
            Event::LevelGenerated { layout } => layout.level,
            other => panic!("unexpected event emitted: {other:?}"),
        })
        .collect();
    assert_eq!(levels, vec![2, 3]);
    assert!(events.iter().all(|event| match event {
        Event::LevelGenerated { layout } => !layout.contains(CellCoord::new(-1, 0)),
        _ => false,
    }));
}
