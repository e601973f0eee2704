use std::time::Duration;

use scavenger_core::{
    CellCoord, Command, DifficultyProfile, Event, HeldItem, LevelLayout, PlayerLoadout,
    WeaponKind,
};
use scavenger_system_player_control::{Intent, PlayerControl};
use scavenger_world::{apply, query, World};

struct Harness {
    world: World,
    control: PlayerControl,
    pending: Vec<Event>,
}

impl Harness {
    fn new(held_item: Option<HeldItem>) -> Self {
        let mut harness = Self {
            world: World::new(),
            control: PlayerControl::new(),
            pending: Vec::new(),
        };
        harness.apply(Command::LoadLevel {
            layout: LevelLayout {
                level: 2,
                columns: 8,
                rows: 8,
                placements: Vec::new(),
            },
            loadout: PlayerLoadout {
                food: 100,
                held_item,
            },
            profile: DifficultyProfile::default(),
        });
        harness
    }

    fn apply(&mut self, command: Command) {
        apply(&mut self.world, command, &mut self.pending);
    }

    /// Feeds pending events and intents through the controller and applies
    /// whatever it emits.
    fn step(&mut self, intents: &[Intent]) -> Vec<Command> {
        let events = std::mem::take(&mut self.pending);
        let player = query::player(&self.world);
        let mut commands = Vec::new();
        self.control
            .handle(&events, intents, player.as_ref(), &mut commands);
        for command in commands.clone() {
            self.apply(command);
        }
        commands
    }

    fn tick(&mut self, millis: u64) {
        self.apply(Command::Tick {
            dt: Duration::from_millis(millis),
        });
    }
}

#[test]
fn intents_are_dropped_while_the_level_is_held() {
    let mut harness = Harness::new(None);

    assert!(harness.step(&[Intent::Move { dx: 1, dy: 0 }]).is_empty());
    assert_eq!(
        query::player(&harness.world).map(|player| player.cell),
        Some(CellCoord::new(0, 0))
    );
}

#[test]
fn movement_follows_the_world_cooldown() {
    let mut harness = Harness::new(None);
    harness.apply(Command::SetPaused { paused: false });

    assert_eq!(harness.step(&[Intent::Move { dx: 1, dy: 0 }]).len(), 1);
    assert!(harness.step(&[Intent::Move { dx: 1, dy: 0 }]).is_empty());

    harness.tick(200);
    assert_eq!(harness.step(&[Intent::Move { dx: 0, dy: 1 }]).len(), 1);
    assert_eq!(
        query::player(&harness.world).map(|player| player.cell),
        Some(CellCoord::new(1, 1))
    );
}

#[test]
fn firing_spends_a_use_and_waits_for_the_item_cooldown() {
    let mut harness = Harness::new(Some(HeldItem {
        kind: WeaponKind::Pistol,
        uses: 6,
    }));
    harness.apply(Command::SetPaused { paused: false });

    assert_eq!(harness.step(&[Intent::Fire { dx: 0, dy: 1 }]).len(), 1);
    assert!(harness.step(&[Intent::Fire { dx: 0, dy: 1 }]).is_empty());

    harness.tick(500);
    assert_eq!(harness.step(&[Intent::Fire { dx: 1, dy: 0 }]).len(), 1);
    assert_eq!(
        query::player(&harness.world).and_then(|player| player.held_item),
        Some(HeldItem {
            kind: WeaponKind::Pistol,
            uses: 4,
        })
    );
}
