#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates discretised player input into world commands.

use scavenger_core::{Command, Direction, Event, PlayerSnapshot, WeaponKind};

/// Discretised input produced by a front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Step one cell along the axis vector.
    Move {
        /// Horizontal component.
        dx: i32,
        /// Vertical component.
        dy: i32,
    },
    /// Fire the held ranged weapon along the axis vector.
    Fire {
        /// Horizontal component.
        dx: i32,
        /// Vertical component.
        dy: i32,
    },
    /// Drop the held bomb on the player's cell.
    Drop,
}

/// Pure system that validates intents and gates them on the world state.
#[derive(Debug)]
pub struct PlayerControl {
    paused: bool,
    game_over: bool,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerControl {
    /// Creates a controller that waits for the first level to unpause.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            paused: true,
            game_over: false,
        }
    }

    /// Reports whether intents are currently forwarded.
    #[must_use]
    pub const fn accepts_input(&self) -> bool {
        !self.paused && !self.game_over
    }

    /// Consumes world events and pending intents to emit player commands.
    ///
    /// At most one move and one item use are emitted per call, and only when
    /// the matching cooldown of `player` has elapsed.
    pub fn handle(
        &mut self,
        events: &[Event],
        intents: &[Intent],
        player: Option<&PlayerSnapshot>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::LevelLoaded { .. } => self.game_over = false,
                Event::PauseChanged { paused } => self.paused = *paused,
                Event::GameOver { .. } => self.game_over = true,
                _ => {}
            }
        }

        if !self.accepts_input() {
            return;
        }
        let Some(player) = player else {
            return;
        };

        let mut move_ready = player.move_ready;
        let mut item_ready = player.item_ready;
        let held = player.held_item.map(|item| item.kind);

        for intent in intents {
            match *intent {
                Intent::Move { dx, dy } if move_ready => {
                    if let Some(direction) = Direction::from_delta(dx, dy) {
                        out.push(Command::MovePlayer { direction });
                        move_ready = false;
                    }
                }
                Intent::Fire { dx, dy } if item_ready => {
                    let ranged = held.map_or(false, |kind| kind.projectile().is_some());
                    if let (true, Some(direction)) = (ranged, Direction::from_delta(dx, dy)) {
                        out.push(Command::FireWeapon { direction });
                        item_ready = false;
                    }
                }
                Intent::Drop if item_ready && held == Some(WeaponKind::Bomb) => {
                    out.push(Command::DropBomb);
                    item_ready = false;
                }
                _ => {}
            }
        }
    }
}
