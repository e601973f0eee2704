use std::time::Duration;

use scavenger_core::{
    CellCoord, Command, DifficultyProfile, Direction, EnemyId, EnemyTier, Event, LevelLayout,
    Placement, PlayerLoadout, Spawn,
};
use scavenger_system_enemy_behavior::{Config, EnemyBehavior};
use scavenger_world::{apply, query, World};

struct Harness {
    world: World,
    behavior: EnemyBehavior,
    enemies: Vec<EnemyId>,
}

impl Harness {
    fn new(placements: Vec<Placement>) -> Self {
        let mut harness = Self {
            world: World::new(),
            behavior: EnemyBehavior::new(Config::default()),
            enemies: Vec::new(),
        };
        let layout = LevelLayout {
            level: 5,
            columns: 9,
            rows: 9,
            placements,
        };
        let loaded = harness.pump(Command::LoadLevel {
            layout,
            loadout: PlayerLoadout {
                food: 500,
                held_item: None,
            },
            profile: DifficultyProfile::default(),
        });
        assert!(loaded.is_empty());
        harness
    }

    fn pump(&mut self, command: Command) -> Vec<Command> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        for event in &events {
            if let Event::EnemySpawned { enemy, .. } = event {
                self.enemies.push(*enemy);
            }
        }

        let enemies = query::enemy_view(&self.world);
        let player = query::player(&self.world);
        let mut commands = Vec::new();
        self.behavior
            .handle(&events, &enemies, player.as_ref(), &mut commands);
        commands
    }

    fn unpause(&mut self) {
        assert!(self.pump(Command::SetPaused { paused: false }).is_empty());
    }

    fn tick(&mut self, millis: u64) -> Vec<Command> {
        self.pump(Command::Tick {
            dt: Duration::from_millis(millis),
        })
    }
}

fn place(column: i32, row: i32, tier: EnemyTier) -> Placement {
    Placement {
        cell: CellCoord::new(column, row),
        spawn: Spawn::Enemy(tier),
    }
}

#[test]
fn melee_enemy_closes_in_horizontally_first() {
    let mut harness = Harness::new(vec![place(3, 2, EnemyTier::One)]);
    harness.unpause();

    assert!(harness.tick(3_900).is_empty());
    let commands = harness.tick(100);

    assert_eq!(
        commands,
        vec![Command::StepEnemy {
            enemy: harness.enemies[0],
            direction: Direction::West,
        }]
    );
}

#[test]
fn owed_turns_are_taken_one_per_tick_from_fresh_positions() {
    let mut harness = Harness::new(vec![place(1, 2, EnemyTier::One)]);
    harness.unpause();
    let enemy = harness.enemies[0];

    let commands = harness.tick(8_000);
    assert_eq!(
        commands,
        vec![Command::StepEnemy {
            enemy,
            direction: Direction::West,
        }]
    );
    for command in commands {
        assert!(harness.pump(command).is_empty());
    }

    assert_eq!(
        harness.tick(1),
        vec![Command::StepEnemy {
            enemy,
            direction: Direction::South,
        }]
    );
}

#[test]
fn melee_enemy_aligned_on_a_column_steps_vertically() {
    let mut harness = Harness::new(vec![place(0, 4, EnemyTier::One)]);
    harness.unpause();

    let commands = harness.tick(4_000);

    assert_eq!(
        commands,
        vec![Command::StepEnemy {
            enemy: harness.enemies[0],
            direction: Direction::South,
        }]
    );
}

#[test]
fn enemies_beyond_sense_distance_stay_put() {
    let mut harness = Harness::new(vec![place(6, 6, EnemyTier::One)]);
    harness.unpause();

    assert!(harness.tick(10_000).is_empty());
    assert_eq!(harness.behavior.tracked(), 1);
    assert!(harness.behavior.is_active(harness.enemies[0]));
}

#[test]
fn ranged_enemy_throws_along_the_normalised_heading() {
    let mut harness = Harness::new(vec![place(3, 4, EnemyTier::Three)]);
    harness.unpause();

    assert!(harness.tick(5_999).is_empty());
    let commands = harness.tick(1);

    assert_eq!(commands.len(), 1);
    match commands[0] {
        Command::ThrowProjectile { enemy, heading } => {
            assert_eq!(enemy, harness.enemies[0]);
            assert!((heading.x() + 0.6).abs() < 1e-6);
            assert!((heading.y() + 0.8).abs() < 1e-6);
        }
        ref other => panic!("unexpected command emitted: {other:?}"),
    }
}

#[test]
fn later_registrations_wake_slightly_later() {
    let mut harness = Harness::new(vec![
        place(3, 0, EnemyTier::One),
        place(0, 3, EnemyTier::One),
    ]);
    harness.unpause();

    let first = harness.tick(4_000);
    assert_eq!(
        first,
        vec![Command::StepEnemy {
            enemy: harness.enemies[0],
            direction: Direction::West,
        }]
    );

    let second = harness.tick(400);
    assert_eq!(
        second,
        vec![Command::StepEnemy {
            enemy: harness.enemies[1],
            direction: Direction::South,
        }]
    );
}

#[test]
fn pause_holds_elapsed_time() {
    let mut harness = Harness::new(vec![place(3, 2, EnemyTier::One)]);
    harness.unpause();

    assert!(harness.tick(3_000).is_empty());
    assert!(harness
        .pump(Command::SetPaused { paused: true })
        .is_empty());
    assert!(harness.tick(5_000).is_empty());

    harness.unpause();
    assert_eq!(harness.tick(1_000).len(), 1);
}

#[test]
fn nothing_happens_before_the_level_is_unpaused() {
    let mut harness = Harness::new(vec![place(3, 2, EnemyTier::One)]);

    assert!(harness.tick(10_000).is_empty());
    assert!(!harness.behavior.is_active(harness.enemies[0]));
}

#[test]
fn loading_a_new_level_forgets_old_enemies() {
    let mut harness = Harness::new(vec![place(3, 2, EnemyTier::One)]);
    assert_eq!(harness.behavior.tracked(), 1);

    let _ = harness.pump(Command::LoadLevel {
        layout: LevelLayout {
            level: 6,
            columns: 9,
            rows: 9,
            placements: Vec::new(),
        },
        loadout: PlayerLoadout {
            food: 100,
            held_item: None,
        },
        profile: DifficultyProfile::default(),
    });

    assert_eq!(harness.behavior.tracked(), 0);
}
