//! Generated board descriptions handed from the generator to the world.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, CollectibleIndex, EnemyTier, FoodKind, PowerupKind, WeaponKind};

/// Cell the player enters every level on.
pub const PLAYER_SPAWN: CellCoord = CellCoord::new(0, 0);

/// Reference board area used to scale spawn quotas.
const REFERENCE_AREA: u32 = 49;

/// Scale of a board relative to the smallest 7×7 board, rounded down.
#[must_use]
pub const fn area_ratio(columns: u32, rows: u32) -> u32 {
    (columns * rows) / REFERENCE_AREA
}

/// Content placed on a single cell by the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Spawn {
    /// Destructible wall.
    Wall,
    /// Food pickup.
    Food(FoodKind),
    /// Item pickup.
    Item(WeaponKind),
    /// Enemy of the given tier.
    Enemy(EnemyTier),
    /// Supplies that unlock the exit.
    Supplies,
    /// Level exit.
    Exit,
    /// Permanently tracked collectible.
    Collectible(CollectibleIndex),
    /// Level-scoped powerup.
    Powerup(PowerupKind),
}

/// A spawn bound to the cell it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Cell of the spawn.
    pub cell: CellCoord,
    /// Content of the cell.
    pub spawn: Spawn,
}

/// Complete description of a generated level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Level number the layout was generated for.
    pub level: u32,
    /// Number of playable columns.
    pub columns: u32,
    /// Number of playable rows.
    pub rows: u32,
    /// Spawns in placement order; no two share a cell.
    pub placements: Vec<Placement>,
}

impl LevelLayout {
    /// Scale of the board relative to the smallest board.
    #[must_use]
    pub const fn area_ratio(&self) -> u32 {
        area_ratio(self.columns, self.rows)
    }

    /// Whether `cell` lies on the playable board.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        (0..self.columns as i32).contains(&cell.column())
            && (0..self.rows as i32).contains(&cell.row())
    }

    /// Number of placements matching `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&Spawn) -> bool) -> usize {
        self.placements
            .iter()
            .filter(|placement| predicate(&placement.spawn))
            .count()
    }

    /// Cells of placements matching `predicate`.
    pub fn cells_of<'a>(
        &'a self,
        predicate: impl Fn(&Spawn) -> bool + 'a,
    ) -> impl Iterator<Item = CellCoord> + 'a {
        self.placements
            .iter()
            .filter(move |placement| predicate(&placement.spawn))
            .map(|placement| placement.cell)
    }
}

#[cfg(test)]
mod tests {
    use super::{area_ratio, LevelLayout, Placement, Spawn};
    use crate::{CellCoord, EnemyTier};

    #[test]
    fn area_ratio_rounds_down() {
        assert_eq!(area_ratio(7, 7), 1);
        assert_eq!(area_ratio(9, 9), 1);
        assert_eq!(area_ratio(10, 10), 2);
        assert_eq!(area_ratio(14, 14), 4);
    }

    #[test]
    fn counts_and_cells_follow_the_predicate() {
        let layout = LevelLayout {
            level: 1,
            columns: 7,
            rows: 7,
            placements: vec![
                Placement {
                    cell: CellCoord::new(3, 3),
                    spawn: Spawn::Enemy(EnemyTier::One),
                },
                Placement {
                    cell: CellCoord::new(6, 6),
                    spawn: Spawn::Exit,
                },
            ],
        };

        assert_eq!(layout.count(|spawn| matches!(spawn, Spawn::Exit)), 1);
        let enemies: Vec<_> = layout
            .cells_of(|spawn| matches!(spawn, Spawn::Enemy(_)))
            .collect();
        assert_eq!(enemies, vec![CellCoord::new(3, 3)]);
        assert!(layout.contains(CellCoord::new(6, 0)));
        assert!(!layout.contains(CellCoord::new(7, 0)));
        assert!(!layout.contains(CellCoord::new(-1, 0)));
    }
}
