//! Static tiles and the actor occupancy layer of a level board.

use scavenger_core::{CellCoord, EnemyId, Pickup};

/// Hit points of a freshly placed destructible wall.
pub const WALL_HP: i32 = 4;

/// Static content of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    /// Walkable empty cell.
    Floor,
    /// Destructible wall with its remaining hit points.
    Wall {
        /// Hit points left before the wall collapses.
        hp: i32,
    },
    /// Consumable pickup.
    Pickup(Pickup),
    /// Level exit.
    Exit,
    /// Supplies that unlock the exit.
    Supplies,
    /// Indestructible wall surrounding the playable board.
    Boundary,
}

impl Tile {
    /// Whether actors are prevented from entering the cell.
    #[must_use]
    pub const fn blocks_movement(&self) -> bool {
        matches!(self, Self::Wall { .. } | Self::Boundary)
    }
}

/// Actor occupying a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// The player.
    Player,
    /// An enemy.
    Enemy(EnemyId),
}

/// Dense board storage of tiles and occupants indexed row by row.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    occupants: Vec<Option<Occupant>>,
}

impl Grid {
    /// Creates a board of the given dimensions filled with floor.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![Tile::Floor; capacity],
            occupants: vec![None; capacity],
        }
    }

    /// Number of playable columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of playable rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Whether the cell lies on the playable board.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Tile at `cell`; anything off the board is boundary.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Tile {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(Tile::Boundary)
    }

    /// Replaces the tile at `cell`, returning whether the cell was on the board.
    ///
    /// Boundary tiles cannot be stored; writing one leaves floor behind.
    pub fn set_tile(&mut self, cell: CellCoord, tile: Tile) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        self.tiles[index] = if tile == Tile::Boundary {
            Tile::Floor
        } else {
            tile
        };
        true
    }

    /// Actor occupying `cell`, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.index(cell)
            .and_then(|index| self.occupants.get(index).copied().flatten())
    }

    /// Whether an actor could step into `cell` right now.
    #[must_use]
    pub fn can_enter(&self, cell: CellCoord) -> bool {
        !self.tile(cell).blocks_movement() && self.occupant(cell).is_none()
    }

    /// Places an actor on `cell`, returning whether the cell was free and on the board.
    pub fn occupy(&mut self, cell: CellCoord, occupant: Occupant) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        let slot = &mut self.occupants[index];
        if slot.is_some() {
            return false;
        }
        *slot = Some(occupant);
        true
    }

    /// Clears the actor on `cell`, returning the previous occupant.
    pub fn vacate(&mut self, cell: CellCoord) -> Option<Occupant> {
        let index = self.index(cell)?;
        self.occupants[index].take()
    }

    /// Moves the occupant of `from` onto `to`.
    pub(crate) fn relocate(&mut self, from: CellCoord, to: CellCoord) {
        if let Some(occupant) = self.vacate(from) {
            let _ = self.occupy(to, occupant);
        }
    }

    /// Iterates every playable cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns as i32;
        let rows = self.rows as i32;
        (0..rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, Occupant, Tile, WALL_HP};
    use scavenger_core::{CellCoord, EnemyId};

    #[test]
    fn cells_outside_the_board_are_boundary() {
        let grid = Grid::new(7, 7);
        assert_eq!(grid.tile(CellCoord::new(-1, 0)), Tile::Boundary);
        assert_eq!(grid.tile(CellCoord::new(0, 7)), Tile::Boundary);
        assert_eq!(grid.tile(CellCoord::new(20, 20)), Tile::Boundary);
        assert_eq!(grid.tile(CellCoord::new(6, 6)), Tile::Floor);
    }

    #[test]
    fn only_one_actor_per_cell() {
        let mut grid = Grid::new(7, 7);
        let cell = CellCoord::new(2, 3);
        assert!(grid.occupy(cell, Occupant::Player));
        assert!(!grid.occupy(cell, Occupant::Enemy(EnemyId::new(0))));
        assert_eq!(grid.vacate(cell), Some(Occupant::Player));
        assert!(grid.can_enter(cell));
    }

    #[test]
    fn walls_block_and_boundary_cannot_be_stored() {
        let mut grid = Grid::new(7, 7);
        let cell = CellCoord::new(1, 1);
        assert!(grid.set_tile(cell, Tile::Wall { hp: WALL_HP }));
        assert!(!grid.can_enter(cell));
        assert!(grid.set_tile(cell, Tile::Boundary));
        assert_eq!(grid.tile(cell), Tile::Floor);
        assert!(!grid.set_tile(CellCoord::new(-1, -1), Tile::Floor));
    }

    #[test]
    fn cells_iterate_row_major() {
        let grid = Grid::new(7, 8);
        let cells: Vec<CellCoord> = grid.cells().collect();
        assert_eq!(cells.len(), 56);
        assert_eq!(cells[1], CellCoord::new(1, 0));
        assert_eq!(cells[7], CellCoord::new(0, 1));
    }
}
