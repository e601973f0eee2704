#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scavenger simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and presentation sinks to react to. Nothing in here depends on
//! rendering, audio, or file formats.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod difficulty;
mod layout;
mod progress;

pub use difficulty::{
    DifficultyPreset, DifficultyProfile, EnemyModifiers, PlayerModifiers, ProfileError,
    SpawnFactors, UnlockLevels,
};
pub use layout::{area_ratio, LevelLayout, Placement, Spawn, PLAYER_SPAWN};
pub use progress::{CollectibleError, CollectibleSet, ProgressState};

/// Multiplies a duration by a factor, rounding to the nearest nanosecond.
///
/// Negative or non-finite factors yield zero.
#[must_use]
pub fn scale_duration(duration: Duration, factor: f32) -> Duration {
    let nanos = duration.as_nanos() as f64 * f64::from(factor);
    if nanos.is_finite() && nanos > 0.0 {
        Duration::from_nanos(nanos.round() as u64)
    } else {
        Duration::ZERO
    }
}

/// Commands that express all permissible mutations of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests that the level generator produce a layout for the given level.
    GenerateLevel {
        /// Level number, starting from one.
        level: u32,
    },
    /// Replaces the world's board with a freshly generated layout.
    LoadLevel {
        /// Layout produced by the level generator.
        layout: LevelLayout,
        /// Food and equipment the player carries into the level.
        loadout: PlayerLoadout,
        /// Difficulty profile that parameterises actors for the whole level.
        profile: DifficultyProfile,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Toggles the global pause flag.
    SetPaused {
        /// Whether actor timers should be suspended.
        paused: bool,
    },
    /// Requests that the player attempt a single step.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the player fire the equipped ranged weapon.
    FireWeapon {
        /// Direction the projectile should travel.
        direction: Direction,
    },
    /// Requests that the player drop the equipped bomb on their cell.
    DropBomb,
    /// Requests that an enemy attempt a single step.
    StepEnemy {
        /// Identifier of the enemy attempting to move.
        enemy: EnemyId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a ranged enemy throw a projectile.
    ThrowProjectile {
        /// Identifier of the throwing enemy.
        enemy: EnemyId,
        /// Unit vector pointing from the enemy toward its target.
        heading: CellPoint,
    },
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces a change of the global pause flag.
    PauseChanged {
        /// Pause state after the change.
        paused: bool,
    },
    /// Carries a freshly generated layout.
    LevelGenerated {
        /// Generated layout ready to be loaded into the world.
        layout: LevelLayout,
    },
    /// Confirms that the world rebuilt its board for a new level.
    LevelLoaded {
        /// Level number that was loaded.
        level: u32,
        /// Number of columns of the playable board.
        columns: u32,
        /// Number of rows of the playable board.
        rows: u32,
    },
    /// Confirms that the player entered the board.
    PlayerSpawned {
        /// Cell the player occupies.
        cell: CellCoord,
        /// Food points carried into the level.
        food: i32,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
        /// Cosmetic duration of the interpolated slide.
        move_time: Duration,
    },
    /// Reports that a player step hit something it cannot interact with.
    PlayerBlocked {
        /// Cell the player attempted to enter.
        cell: CellCoord,
    },
    /// Reports that the player struck an obstacle instead of moving.
    PlayerAttacked {
        /// Cell that was struck.
        cell: CellCoord,
        /// Kind of obstacle that was struck.
        target: Obstacle,
    },
    /// Reports a change of the player's food total.
    FoodChanged {
        /// Food total after the change.
        food: i32,
        /// Signed amount applied.
        delta: i32,
    },
    /// Reports that the player took damage.
    PlayerHit {
        /// Food points removed after armor.
        damage: i32,
        /// Food total after the hit.
        food: i32,
    },
    /// Confirms that an enemy was registered on the board.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Tier of the enemy.
        tier: EnemyTier,
        /// Cell the enemy occupies.
        cell: CellCoord,
        /// Position in the level's registration order.
        registration_index: u32,
        /// Cooldown between the enemy's actions.
        wait_time: Duration,
    },
    /// Confirms that an enemy moved between two cells.
    EnemyMoved {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after moving.
        to: CellCoord,
        /// Cosmetic duration of the interpolated slide.
        move_time: Duration,
    },
    /// Reports that an enemy struck an obstacle instead of moving.
    EnemyAttacked {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Cell that was struck.
        cell: CellCoord,
        /// Kind of obstacle that was struck.
        target: Obstacle,
    },
    /// Reports damage dealt to an enemy that survived it.
    EnemyDamaged {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Hit points removed.
        damage: i32,
        /// Hit points left.
        remaining_hp: i32,
    },
    /// Confirms that an enemy died and left the registry.
    EnemyDied {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Cell the enemy occupied when it died.
        cell: CellCoord,
    },
    /// Reports that an enemy was hit by a thrown brain and acts faster.
    EnemyEnraged {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// New cooldown between the enemy's actions.
        wait_time: Duration,
    },
    /// Reports damage dealt to a destructible wall that still stands.
    WallDamaged {
        /// Cell of the wall.
        cell: CellCoord,
        /// Hit points removed.
        damage: i32,
        /// Hit points left.
        remaining_hp: i32,
    },
    /// Confirms that a destructible wall collapsed into floor.
    WallDestroyed {
        /// Cell of the former wall.
        cell: CellCoord,
    },
    /// Reports that a blast wiped the contents of a cell.
    TileCleared {
        /// Cell that now holds plain floor.
        cell: CellCoord,
    },
    /// Confirms that the player consumed a pickup.
    PickupCollected {
        /// Cell the pickup occupied.
        cell: CellCoord,
        /// Pickup that was consumed.
        pickup: Pickup,
    },
    /// Confirms that the level's supplies were collected and the exit unlocked.
    SuppliesCollected {
        /// Cell the supplies occupied.
        cell: CellCoord,
    },
    /// Reports the player's equipped item after a pickup.
    ItemEquipped {
        /// Kind of item held.
        kind: WeaponKind,
        /// Uses remaining.
        uses: u32,
    },
    /// Reports that the player used the equipped item.
    ItemUsed {
        /// Kind of item used.
        kind: WeaponKind,
        /// Uses remaining; zero means the item is gone.
        remaining_uses: u32,
    },
    /// Confirms that a collectible was found.
    CollectibleFound {
        /// Index of the collectible.
        index: CollectibleIndex,
    },
    /// Confirms that a powerup boosted the player for the rest of the level.
    PowerupActivated {
        /// Kind of powerup.
        kind: PowerupKind,
        /// Multiplier applied.
        factor: f32,
    },
    /// Confirms that a projectile entered the board.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Kind of projectile.
        kind: ProjectileKind,
        /// Launch position in cell units.
        origin: CellPoint,
        /// Velocity in cells per second.
        velocity: CellPoint,
        /// Cosmetic sprite rotation in degrees.
        rotation_degrees: f32,
    },
    /// Reports that a projectile froze on impact and left the simulation.
    ProjectileStopped {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Position where the projectile stopped.
        at: CellPoint,
    },
    /// Reports that a projectile was destroyed outright.
    ProjectileDestroyed {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// Confirms that a bomb was dropped and its fuse started.
    BombDropped {
        /// Identifier of the bomb.
        bomb: BombId,
        /// Cell the bomb lies on.
        cell: CellCoord,
        /// Time until detonation.
        fuse: Duration,
    },
    /// Confirms that a bomb detonated.
    BombExploded {
        /// Identifier of the bomb.
        bomb: BombId,
        /// Centre of the blast.
        cell: CellCoord,
    },
    /// Reports that the player left the level through the unlocked exit.
    LevelCompleted {
        /// Level that was completed.
        level: u32,
        /// Food carried out of the level.
        food: i32,
        /// Item carried out of the level.
        held_item: Option<HeldItem>,
    },
    /// Reports that the player starved; the world is frozen afterwards.
    GameOver {
        /// Level on which the player died.
        level: u32,
    },
    /// Requests a sound effect from the presentation layer.
    Sound {
        /// Identifier of the sound effect.
        cue: SoundCue,
    },
}

/// Sound effect identifiers emitted for presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player finished a step.
    Footstep,
    /// Player struck a wall or enemy.
    Chop,
    /// Player ate food.
    Eat,
    /// Player drank soda.
    Drink,
    /// Player picked up an item or powerup.
    ItemPickup,
    /// Player found a collectible.
    CollectiblePickup,
    /// An enemy attacked the player.
    EnemyAttack,
    /// A ranged weapon fired.
    Shot,
    /// A bomb exploded.
    Explosion,
    /// The player starved.
    GameOver,
}

/// Cardinal movement directions available to actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row offsets of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Converts a raw offset into a direction.
    ///
    /// Only the four cardinal unit vectors are accepted; zero, diagonal, and
    /// longer offsets yield `None`.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, -1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }
}

/// Location of a single board cell expressed as column and row coordinates.
///
/// Coordinates are signed because the boundary ring sits at `-1` and at the
/// board dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.column + dx, self.row + dy)
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Euclidean distance between the centres of two cells.
    #[must_use]
    pub fn distance(self, other: CellCoord) -> f32 {
        self.center().distance(other.center())
    }

    /// Centre of the cell in continuous cell units.
    #[must_use]
    pub fn center(self) -> CellPoint {
        CellPoint::new(self.column as f32, self.row as f32)
    }
}

/// Continuous position or vector expressed in cell units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CellPoint {
    x: f32,
    y: f32,
}

impl CellPoint {
    /// Creates a new point from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Length of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: CellPoint) -> f32 {
        CellPoint::new(other.x - self.x, other.y - self.y).length()
    }

    /// Unit vector with the same direction, or `None` for a zero vector.
    #[must_use]
    pub fn normalized(self) -> Option<CellPoint> {
        let length = self.length();
        if length <= f32::EPSILON || !length.is_finite() {
            return None;
        }
        Some(CellPoint::new(self.x / length, self.y / length))
    }

    /// Cell whose centre lies closest to the point.
    #[must_use]
    pub fn nearest_cell(self) -> CellCoord {
        CellCoord::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// Unique identifier assigned to an enemy within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a dropped bomb within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BombId(u32);

impl BombId {
    /// Creates a new bomb identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// How an enemy engages the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackStyle {
    /// Walks toward the player and strikes adjacent obstacles.
    Melee,
    /// Stands still and throws homing projectiles.
    Ranged,
}

/// Enemy tiers, unlocked at increasing levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyTier {
    /// Basic melee chaser.
    One,
    /// Tougher melee chaser.
    Two,
    /// Ranged brain thrower.
    Three,
}

impl EnemyTier {
    /// All tiers in unlock order.
    pub const ALL: [EnemyTier; 3] = [EnemyTier::One, EnemyTier::Two, EnemyTier::Three];

    /// Unscaled statistics of the tier.
    #[must_use]
    pub const fn base_stats(self) -> EnemyStats {
        match self {
            Self::One => EnemyStats {
                hp: 20,
                player_damage: 10,
                wall_damage: 1,
                wait_time: Duration::from_millis(2_000),
                sense_distance: 6.0,
            },
            Self::Two => EnemyStats {
                hp: 40,
                player_damage: 20,
                wall_damage: 2,
                wait_time: Duration::from_millis(1_500),
                sense_distance: 8.0,
            },
            Self::Three => EnemyStats {
                hp: 30,
                player_damage: 15,
                wall_damage: 1,
                wait_time: Duration::from_millis(3_000),
                sense_distance: 7.0,
            },
        }
    }

    /// Attack style used by the tier.
    #[must_use]
    pub const fn attack(self) -> AttackStyle {
        match self {
            Self::One | Self::Two => AttackStyle::Melee,
            Self::Three => AttackStyle::Ranged,
        }
    }

    /// Whether thrown brains speed this tier up.
    #[must_use]
    pub const fn is_enrageable(self) -> bool {
        !matches!(self, Self::Three)
    }
}

/// Statistics that describe an enemy before or after difficulty scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Hit points.
    pub hp: i32,
    /// Food points removed from the player per hit.
    pub player_damage: i32,
    /// Hit points removed from walls per hit.
    pub wall_damage: i32,
    /// Cooldown between actions.
    pub wait_time: Duration,
    /// Distance at which the enemy notices the player.
    pub sense_distance: f32,
}

/// Items the player can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Droppable explosive with a fuse.
    Bomb,
    /// Ranged weapon whose bullets stop on impact.
    Pistol,
    /// Ranged weapon whose bullets pierce enemies.
    Rifle,
    /// Ranged weapon firing arrows.
    Crossbow,
}

impl WeaponKind {
    /// All weapon kinds.
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Bomb,
        WeaponKind::Pistol,
        WeaponKind::Rifle,
        WeaponKind::Crossbow,
    ];

    /// Display name of the item.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bomb => "Bomb",
            Self::Pistol => "Pistol",
            Self::Rifle => "Rifle",
            Self::Crossbow => "Crossbow",
        }
    }

    /// Use counts and cooldown of the item.
    #[must_use]
    pub const fn stats(self) -> WeaponStats {
        match self {
            Self::Bomb => WeaponStats {
                initial_uses: 1,
                max_uses: 3,
                cooldown: Duration::from_millis(1_000),
            },
            Self::Pistol => WeaponStats {
                initial_uses: 6,
                max_uses: 12,
                cooldown: Duration::from_millis(500),
            },
            Self::Rifle => WeaponStats {
                initial_uses: 4,
                max_uses: 8,
                cooldown: Duration::from_millis(1_000),
            },
            Self::Crossbow => WeaponStats {
                initial_uses: 3,
                max_uses: 6,
                cooldown: Duration::from_millis(750),
            },
        }
    }

    /// Projectile fired by the weapon, or `None` for droppable items.
    #[must_use]
    pub const fn projectile(self) -> Option<ProjectileKind> {
        match self {
            Self::Bomb => None,
            Self::Pistol => Some(ProjectileKind::PistolBullet),
            Self::Rifle => Some(ProjectileKind::RifleBullet),
            Self::Crossbow => Some(ProjectileKind::Arrow),
        }
    }
}

/// Use counts and cooldown of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponStats {
    /// Uses granted by a single pickup.
    pub initial_uses: u32,
    /// Maximum uses that can be stacked.
    pub max_uses: u32,
    /// Minimum time between uses before the player wait modifier.
    pub cooldown: Duration,
}

/// Projectiles travelling across the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Brain thrown by a ranged enemy.
    Brain,
    /// Pistol bullet.
    PistolBullet,
    /// Rifle bullet.
    RifleBullet,
    /// Crossbow arrow.
    Arrow,
}

impl ProjectileKind {
    /// Travel speed in cells per second.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Brain => 4.0,
            Self::PistolBullet => 10.0,
            Self::RifleBullet => 12.0,
            Self::Arrow => 8.0,
        }
    }

    /// Whether the projectile was thrown by an enemy.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::Brain)
    }
}

/// Food pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    /// Solid food.
    Food,
    /// Soda can.
    Soda,
}

impl FoodKind {
    /// Every food kind in generation order.
    pub const ALL: [FoodKind; 2] = [FoodKind::Food, FoodKind::Soda];

    /// Food points restored before the intake modifier.
    #[must_use]
    pub const fn base_points(self) -> i32 {
        match self {
            Self::Food => 10,
            Self::Soda => 20,
        }
    }
}

/// Level-scoped stat boosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Multiplies melee damage against walls and enemies.
    MeleeBoost,
    /// Multiplies armor, dividing incoming damage.
    ArmorBoost,
}

impl PowerupKind {
    /// All powerup kinds.
    pub const ALL: [PowerupKind; 2] = [PowerupKind::MeleeBoost, PowerupKind::ArmorBoost];

    /// Multiplier applied on pickup.
    #[must_use]
    pub const fn boost_factor(self) -> f32 {
        match self {
            Self::MeleeBoost | Self::ArmorBoost => 1.5,
        }
    }
}

/// Number of distinct collectibles in the game.
pub const COLLECTIBLE_COUNT: usize = 12;

/// Index of a permanently tracked collectible, always below [`COLLECTIBLE_COUNT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectibleIndex(u8);

impl CollectibleIndex {
    /// Creates an index, rejecting values outside the collectible range.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if (value as usize) < COLLECTIBLE_COUNT {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Iterates over every valid collectible index in ascending order.
    pub fn all() -> impl Iterator<Item = CollectibleIndex> {
        (0..COLLECTIBLE_COUNT as u8).map(Self)
    }
}

/// Non-blocking objects the player consumes by stepping onto them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pickup {
    /// Restores food.
    Food(FoodKind),
    /// Equips or restocks an item.
    Item(WeaponKind),
    /// Marks a collectible as found.
    Collectible(CollectibleIndex),
    /// Boosts the player until the level ends.
    Powerup(PowerupKind),
}

/// Blocking obstacles an actor may be configured to interact with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Obstacle {
    /// Destructible wall.
    Wall,
    /// Any enemy.
    Enemy,
    /// The player.
    Player,
}

/// Item carried by the player between levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldItem {
    /// Kind of item.
    pub kind: WeaponKind,
    /// Uses remaining.
    pub uses: u32,
}

/// Food and equipment the player enters a level with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerLoadout {
    /// Food points.
    pub food: i32,
    /// Equipped item, if any.
    pub held_item: Option<HeldItem>,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Tier of the enemy.
    pub tier: EnemyTier,
    /// Cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Hit points left.
    pub hp: i32,
    /// Cooldown between actions.
    pub wait_time: Duration,
    /// Distance at which the enemy notices the player.
    pub sense_distance: f32,
    /// Whether a thrown brain sped this enemy up.
    pub enraged: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Food points left.
    pub food: i32,
    /// Whether the move cooldown has elapsed.
    pub move_ready: bool,
    /// Whether the item cooldown has elapsed.
    pub item_ready: bool,
    /// Equipped item, if any.
    pub held_item: Option<HeldItem>,
    /// Divisor applied to incoming damage.
    pub armor: f32,
    /// Whether the exit is unlocked.
    pub supplies_collected: bool,
}
