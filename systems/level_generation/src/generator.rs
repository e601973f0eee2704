//! Board sizing and randomised placement of a single level.

use rand::Rng;
use scavenger_core::{
    area_ratio, CellCoord, CollectibleIndex, CollectibleSet, DifficultyPreset, DifficultyProfile,
    EnemyTier, FoodKind, LevelLayout, Placement, PowerupKind, ProfileError, Spawn, WeaponKind,
};
use thiserror::Error;
use tracing::debug;

/// Side length of the smallest board.
pub const MIN_BOARD_SIDE: u32 = 7;

const GROWTH_SCALE: f32 = 0.25;
const ENEMY_LOG_BASE: f32 = 2.5;
const COLLECTIBLE_ODDS: u32 = 300;
const POWERUP_MIN_SCALE: f32 = 0.5;
const POWERUP_MAX_SCALE: f32 = 1.5;

/// Inclusive range of base counts for one kind of spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountRange {
    min: u32,
    max: u32,
}

impl CountRange {
    /// Creates a range; the bounds are reordered when given backwards.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Lower bound of the range.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Upper bound of the range.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }
}

/// Base spawn counts for a 7×7 board before area and profile scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutTuning {
    /// Destructible walls.
    pub walls: CountRange,
    /// Food and soda pickups.
    pub food: CountRange,
    /// Item pickups.
    pub items: CountRange,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            walls: CountRange::new(5, 9),
            food: CountRange::new(1, 5),
            items: CountRange::new(1, 2),
        }
    }
}

/// Errors that abort generation of a level.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerationError {
    /// Levels are numbered from one.
    #[error("level 0 cannot be generated")]
    InvalidLevel,
    /// The difficulty profile breaks an invariant.
    #[error("invalid difficulty profile: {0}")]
    Profile(#[from] ProfileError),
    /// A quota needed more free cells than the board had left.
    #[error("level {level} ran out of free cells while placing {spawn:?}")]
    CellsExhausted {
        /// Level being generated.
        level: u32,
        /// Spawn that found no free cell.
        spawn: Spawn,
    },
}

/// Inclusive range of board side lengths for `level`.
#[must_use]
pub fn board_bounds(level: u32, level_growth_rate: f32) -> (u32, u32) {
    let growth = level_growth_rate * GROWTH_SCALE;
    let lo = MIN_BOARD_SIDE + (level as f32 * growth).ceil() as u32;
    let hi = MIN_BOARD_SIDE + (level as f32 * growth * 2.0).ceil() as u32;
    (lo, hi.max(lo))
}

/// Generates the layout of `level`.
///
/// Spawns are placed in a fixed order (walls, food, items, enemies,
/// supplies, exit, collectible, powerups) on cells drawn without replacement
/// from the board minus the 2×2 block around the player spawn.
pub fn generate<R: Rng + ?Sized>(
    level: u32,
    profile: &DifficultyProfile,
    collectibles: &CollectibleSet,
    tuning: &LayoutTuning,
    rng: &mut R,
) -> Result<LevelLayout, GenerationError> {
    if level == 0 {
        return Err(GenerationError::InvalidLevel);
    }
    profile.validate()?;

    let (lo, hi) = board_bounds(level, profile.level_growth_rate);
    let side = rng.gen_range(lo..=hi);
    let ratio = area_ratio(side, side) as f32;
    let mut board = Board::new(level, side);

    let walls = quota(tuning.walls, ratio, profile.spawn.wall, rng);
    for _ in 0..walls {
        board.place(Spawn::Wall, rng)?;
    }

    let food = quota(tuning.food, ratio, profile.spawn.food, rng);
    for _ in 0..food {
        let kind = FoodKind::ALL[rng.gen_range(0..FoodKind::ALL.len())];
        board.place(Spawn::Food(kind), rng)?;
    }

    if level >= profile.unlocks.min_weapon() {
        let items = quota(tuning.items, ratio, profile.spawn.item, rng);
        let unlocked = unlocked(&WeaponKind::ALL, |kind| {
            profile.unlocks.weapon(kind) <= level
        });
        for _ in 0..items {
            let kind = unlocked[rng.gen_range(0..unlocked.len())];
            board.place(Spawn::Item(kind), rng)?;
        }
    }

    if level >= profile.unlocks.min_tier() {
        let enemies = enemy_count(level, profile.spawn.enemy, ratio);
        let unlocked = unlocked(&EnemyTier::ALL, |tier| profile.unlocks.tier(tier) <= level);
        for _ in 0..enemies {
            let tier = unlocked[rng.gen_range(0..unlocked.len())];
            board.place(Spawn::Enemy(tier), rng)?;
        }
    }

    board.place(Spawn::Supplies, rng)?;
    board.place(Spawn::Exit, rng)?;

    if let Some(index) = roll_collectible(level, profile.preset, collectibles, rng) {
        board.place(Spawn::Collectible(index), rng)?;
    }

    let (min_powerups, max_powerups) = powerup_bounds(level, ratio);
    let powerups = if max_powerups > min_powerups {
        rng.gen_range(min_powerups..=max_powerups)
    } else {
        min_powerups
    };
    for _ in 0..powerups {
        let kind = PowerupKind::ALL[rng.gen_range(0..PowerupKind::ALL.len())];
        board.place(Spawn::Powerup(kind), rng)?;
    }

    debug!(
        level,
        side,
        walls,
        food,
        powerups,
        placements = board.placements.len(),
        "level layout generated"
    );
    Ok(board.into_layout())
}

struct Board {
    level: u32,
    side: u32,
    free: Vec<CellCoord>,
    placements: Vec<Placement>,
}

impl Board {
    fn new(level: u32, side: u32) -> Self {
        let side_i32 = side as i32;
        let mut free = Vec::with_capacity((side * side) as usize);
        for column in 0..side_i32 {
            for row in 0..side_i32 {
                if column < 2 && row < 2 {
                    continue;
                }
                free.push(CellCoord::new(column, row));
            }
        }
        Self {
            level,
            side,
            free,
            placements: Vec::new(),
        }
    }

    fn place<R: Rng + ?Sized>(&mut self, spawn: Spawn, rng: &mut R) -> Result<(), GenerationError> {
        if self.free.is_empty() {
            return Err(GenerationError::CellsExhausted {
                level: self.level,
                spawn,
            });
        }
        let index = rng.gen_range(0..self.free.len());
        let cell = self.free.swap_remove(index);
        self.placements.push(Placement { cell, spawn });
        Ok(())
    }

    fn into_layout(self) -> LevelLayout {
        LevelLayout {
            level: self.level,
            columns: self.side,
            rows: self.side,
            placements: self.placements,
        }
    }
}

fn quota<R: Rng + ?Sized>(range: CountRange, ratio: f32, factor: f32, rng: &mut R) -> u32 {
    let lo = (range.min() as f32 * ratio * factor).floor() as u32;
    let hi = (range.max() as f32 * ratio * factor).floor() as u32;
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

fn enemy_count(level: u32, factor: f32, ratio: f32) -> u32 {
    let scaled = (level as f32).ln() / ENEMY_LOG_BASE.ln() * factor * ratio;
    scaled.round().max(0.0) as u32
}

fn powerup_bounds(level: u32, ratio: f32) -> (u32, u32) {
    let log = (level as f32).log10();
    let lo = (log * POWERUP_MIN_SCALE * ratio).floor().max(0.0) as u32;
    let hi = (log * POWERUP_MAX_SCALE * ratio).floor().max(0.0) as u32;
    (lo, hi.max(lo))
}

fn unlocked<T: Copy>(options: &[T], is_unlocked: impl Fn(T) -> bool) -> Vec<T> {
    options
        .iter()
        .copied()
        .filter(|option| is_unlocked(*option))
        .collect()
}

fn roll_collectible<R: Rng + ?Sized>(
    level: u32,
    preset: DifficultyPreset,
    collectibles: &CollectibleSet,
    rng: &mut R,
) -> Option<CollectibleIndex> {
    if !matches!(preset, DifficultyPreset::Normal | DifficultyPreset::Hard) {
        return None;
    }
    let odds = (COLLECTIBLE_ODDS / level).max(1);
    if rng.gen_range(0..odds) != 0 {
        return None;
    }
    let missing: Vec<CollectibleIndex> = collectibles.missing().collect();
    if missing.is_empty() {
        return None;
    }
    Some(missing[rng.gen_range(0..missing.len())])
}
