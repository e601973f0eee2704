//! Scripted input that plays a level without a human at the keyboard.

use std::collections::{HashMap, VecDeque};

use scavenger_core::{CellCoord, Direction, PlayerSnapshot, WeaponKind};
use scavenger_system_player_control::Intent;
use scavenger_world::{query, Grid, Tile, World};

/// Distance at which the autopilot opens fire on an enemy in line.
const FIRING_RANGE: i32 = 4;

/// Chooses intents for the current frame.
///
/// The player walks the shortest route to the supplies, then to the exit.
/// Destructible walls count as passable because walking into them breaks
/// them down. Held weapons are used on enemies lined up with the player.
pub(crate) fn plan(world: &World) -> Vec<Intent> {
    let Some(player) = query::player(world) else {
        return Vec::new();
    };
    let grid = query::grid(world);
    let mut intents = Vec::new();

    if let Some(intent) = attack(world, &player) {
        intents.push(intent);
    }

    let goal = if player.supplies_collected {
        Tile::Exit
    } else {
        Tile::Supplies
    };
    if let Some(direction) = first_step(grid, player.cell, goal) {
        let (dx, dy) = direction.delta();
        intents.push(Intent::Move { dx, dy });
    }
    intents
}

fn attack(world: &World, player: &PlayerSnapshot) -> Option<Intent> {
    let held = player.held_item?;
    let enemies = query::enemy_view(world);
    match held.kind {
        WeaponKind::Bomb => enemies
            .iter()
            .any(|enemy| enemy.cell.manhattan_distance(player.cell) <= 1)
            .then_some(Intent::Drop),
        _ => enemies.iter().find_map(|enemy| {
            let dx = enemy.cell.column() - player.cell.column();
            let dy = enemy.cell.row() - player.cell.row();
            let in_line = (dx == 0) != (dy == 0);
            (in_line && dx.abs().max(dy.abs()) <= FIRING_RANGE).then(|| Intent::Fire {
                dx: dx.signum(),
                dy: dy.signum(),
            })
        }),
    }
}

/// Breadth-first search from `start` to the nearest cell holding `goal`.
fn first_step(grid: &Grid, start: CellCoord, goal: Tile) -> Option<Direction> {
    let mut came_from: HashMap<CellCoord, (CellCoord, Direction)> = HashMap::new();
    let mut frontier = VecDeque::from([start]);

    while let Some(cell) = frontier.pop_front() {
        if cell != start && grid.tile(cell) == goal {
            return trace_back(&came_from, start, cell);
        }
        for direction in Direction::ALL {
            let next = cell.offset(direction);
            if next == start
                || came_from.contains_key(&next)
                || !grid.contains(next)
                || grid.tile(next) == Tile::Boundary
            {
                continue;
            }
            let _ = came_from.insert(next, (cell, direction));
            frontier.push_back(next);
        }
    }
    None
}

fn trace_back(
    came_from: &HashMap<CellCoord, (CellCoord, Direction)>,
    start: CellCoord,
    mut cell: CellCoord,
) -> Option<Direction> {
    loop {
        let (previous, direction) = *came_from.get(&cell)?;
        if previous == start {
            return Some(direction);
        }
        cell = previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scavenger_core::{
        Command, DifficultyProfile, LevelLayout, Placement, PlayerLoadout, Spawn,
    };
    use scavenger_world::apply;

    fn world_with(placements: Vec<Placement>) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadLevel {
                layout: LevelLayout {
                    level: 1,
                    columns: 6,
                    rows: 6,
                    placements,
                },
                loadout: PlayerLoadout {
                    food: 100,
                    held_item: None,
                },
                profile: DifficultyProfile::default(),
            },
            &mut events,
        );
        world
    }

    #[test]
    fn heads_for_supplies_before_the_exit() {
        let world = world_with(vec![
            Placement {
                cell: CellCoord::new(0, 4),
                spawn: Spawn::Supplies,
            },
            Placement {
                cell: CellCoord::new(5, 0),
                spawn: Spawn::Exit,
            },
        ]);

        assert_eq!(plan(&world), vec![Intent::Move { dx: 0, dy: 1 }]);
    }

    #[test]
    fn routes_through_destructible_walls() {
        let world = world_with(vec![
            Placement {
                cell: CellCoord::new(1, 0),
                spawn: Spawn::Wall,
            },
            Placement {
                cell: CellCoord::new(3, 0),
                spawn: Spawn::Supplies,
            },
        ]);

        assert_eq!(plan(&world), vec![Intent::Move { dx: 1, dy: 0 }]);
    }

    #[test]
    fn idles_without_a_goal() {
        assert!(plan(&world_with(Vec::new())).is_empty());
    }
}
