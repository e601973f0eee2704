//! Read-only resolution of single-cell movement attempts.

use scavenger_core::{CellCoord, Direction, Obstacle};

use crate::grid::{Grid, Occupant, Tile};

/// Set of obstacles an actor reacts to when a step is blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interactions {
    wall: bool,
    enemy: bool,
    player: bool,
}

impl Interactions {
    /// The player chops walls and strikes enemies.
    pub const PLAYER: Interactions = Interactions {
        wall: true,
        enemy: true,
        player: false,
    };

    /// Enemies strike the player and gnaw through walls.
    pub const ENEMY: Interactions = Interactions {
        wall: true,
        enemy: false,
        player: true,
    };

    /// Whether the actor reacts to `obstacle`.
    #[must_use]
    pub const fn contains(&self, obstacle: Obstacle) -> bool {
        match obstacle {
            Obstacle::Wall => self.wall,
            Obstacle::Enemy => self.enemy,
            Obstacle::Player => self.player,
        }
    }
}

/// What stopped a blocked step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blocker {
    /// An obstacle the actor reacts to; the caller dispatches combat.
    Interactable(Obstacle),
    /// Boundary or an occupant the actor ignores.
    Inert,
}

/// Result of a single movement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The destination is free and the step may be committed.
    Moved {
        /// Cell the actor leaves.
        from: CellCoord,
        /// Cell the actor enters.
        to: CellCoord,
    },
    /// The destination is blocked; nothing moves.
    Blocked {
        /// Cell the actor tried to enter.
        cell: CellCoord,
        /// What blocked the step.
        blocker: Blocker,
    },
}

/// Resolves one cardinal step from `from` without mutating the board.
#[must_use]
pub fn attempt_move(
    grid: &Grid,
    from: CellCoord,
    direction: Direction,
    interactions: Interactions,
) -> MoveOutcome {
    let to = from.offset(direction);

    let obstacle = match grid.tile(to) {
        Tile::Boundary => {
            return MoveOutcome::Blocked {
                cell: to,
                blocker: Blocker::Inert,
            }
        }
        Tile::Wall { .. } => Some(Obstacle::Wall),
        Tile::Floor | Tile::Pickup(_) | Tile::Exit | Tile::Supplies => {
            grid.occupant(to).map(|occupant| match occupant {
                Occupant::Player => Obstacle::Player,
                Occupant::Enemy(_) => Obstacle::Enemy,
            })
        }
    };

    match obstacle {
        None => MoveOutcome::Moved { from, to },
        Some(obstacle) if interactions.contains(obstacle) => MoveOutcome::Blocked {
            cell: to,
            blocker: Blocker::Interactable(obstacle),
        },
        Some(_) => MoveOutcome::Blocked {
            cell: to,
            blocker: Blocker::Inert,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{attempt_move, Blocker, Interactions, MoveOutcome};
    use crate::grid::{Grid, Occupant, Tile};
    use scavenger_core::{CellCoord, Direction, EnemyId, Obstacle};

    #[test]
    fn enemies_ignore_each_other() {
        let mut grid = Grid::new(7, 7);
        let _ = grid.occupy(CellCoord::new(2, 2), Occupant::Enemy(EnemyId::new(0)));
        let _ = grid.occupy(CellCoord::new(3, 2), Occupant::Enemy(EnemyId::new(1)));

        let outcome = attempt_move(
            &grid,
            CellCoord::new(2, 2),
            Direction::East,
            Interactions::ENEMY,
        );
        assert_eq!(
            outcome,
            MoveOutcome::Blocked {
                cell: CellCoord::new(3, 2),
                blocker: Blocker::Inert,
            }
        );
    }

    #[test]
    fn pickups_do_not_block() {
        let mut grid = Grid::new(7, 7);
        let _ = grid.set_tile(CellCoord::new(0, 1), Tile::Exit);
        let outcome = attempt_move(
            &grid,
            CellCoord::new(0, 0),
            Direction::North,
            Interactions::PLAYER,
        );
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(0, 1),
            }
        );
    }

    #[test]
    fn interaction_sets_match_their_actor() {
        assert!(Interactions::PLAYER.contains(Obstacle::Wall));
        assert!(Interactions::PLAYER.contains(Obstacle::Enemy));
        assert!(!Interactions::PLAYER.contains(Obstacle::Player));
        assert!(Interactions::ENEMY.contains(Obstacle::Player));
        assert!(!Interactions::ENEMY.contains(Obstacle::Enemy));
    }
}
