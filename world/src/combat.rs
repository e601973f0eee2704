//! Damage rules, the bomb footprint and the projectile impact table.

use std::time::Duration;

use scavenger_core::{CellCoord, Direction, EnemyTier, ProjectileKind};

/// Food removed from the player standing inside a blast.
pub const BOMB_PLAYER_DAMAGE: i32 = 50;

/// Time between dropping a bomb and its detonation.
pub const BOMB_FUSE: Duration = Duration::from_secs(2);

/// Lowest cooldown an enraged enemy can reach.
pub const ENRAGED_WAIT_FLOOR: Duration = Duration::from_millis(210);

/// Distance from the shooter at which fired projectiles appear.
pub const MUZZLE_OFFSET: f32 = 0.6;

/// Something a projectile touched while travelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// Destructible wall.
    Wall,
    /// Boundary wall.
    Boundary,
    /// Enemy of the given tier.
    Enemy(EnemyTier),
    /// Projectile thrown by an enemy.
    HostileProjectile,
    /// The player.
    Player,
}

/// Effect a contact has on the touched object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Nothing happens to the touched object.
    None,
    /// The wall loses hit points.
    DamageWall,
    /// The enemy dies.
    KillEnemy,
    /// The enemy acts faster.
    EnrageEnemy,
    /// The touched projectile is destroyed.
    DestroyProjectile,
    /// The player loses food.
    HitPlayer,
}

/// What happens to the travelling projectile after a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aftermath {
    /// Keeps flying.
    Continue,
    /// Freezes on the spot and leaves the simulation.
    Stop,
    /// Is destroyed outright.
    Destroy,
}

/// Combined outcome of a single contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Impact {
    /// Effect on the touched object.
    pub effect: Effect,
    /// Fate of the projectile.
    pub aftermath: Aftermath,
}

impl Impact {
    const fn new(effect: Effect, aftermath: Aftermath) -> Self {
        Self { effect, aftermath }
    }
}

/// Looks up the outcome of `kind` touching `contact`.
///
/// Returns `None` when the projectile passes through without any effect.
#[must_use]
pub const fn resolve_impact(kind: ProjectileKind, contact: Contact) -> Option<Impact> {
    use Aftermath::{Continue, Destroy, Stop};
    use Effect::{DamageWall, DestroyProjectile, EnrageEnemy, HitPlayer, KillEnemy};

    match (kind, contact) {
        (_, Contact::Boundary) => Some(Impact::new(Effect::None, Stop)),
        (ProjectileKind::Brain, Contact::Wall) => Some(Impact::new(DamageWall, Stop)),
        (_, Contact::Wall) => Some(Impact::new(Effect::None, Stop)),

        (ProjectileKind::PistolBullet, Contact::Enemy(_)) => Some(Impact::new(KillEnemy, Stop)),
        (ProjectileKind::RifleBullet, Contact::Enemy(_)) => Some(Impact::new(KillEnemy, Continue)),
        (ProjectileKind::Arrow, Contact::Enemy(_)) => Some(Impact::new(KillEnemy, Destroy)),
        (ProjectileKind::Brain, Contact::Enemy(tier)) => {
            if tier.is_enrageable() {
                Some(Impact::new(EnrageEnemy, Continue))
            } else {
                None
            }
        }

        (ProjectileKind::PistolBullet, Contact::HostileProjectile) => {
            Some(Impact::new(DestroyProjectile, Stop))
        }
        (ProjectileKind::RifleBullet, Contact::HostileProjectile) => {
            Some(Impact::new(DestroyProjectile, Continue))
        }
        (ProjectileKind::Arrow, Contact::HostileProjectile) => {
            Some(Impact::new(DestroyProjectile, Stop))
        }
        (ProjectileKind::Brain, Contact::HostileProjectile) => None,

        (ProjectileKind::Brain, Contact::Player) => Some(Impact::new(HitPlayer, Stop)),
        (_, Contact::Player) => None,
    }
}

/// Cooldown of an enemy after a brain enrages it.
///
/// The cooldown shrinks by a fifth, never drops below the floor and never rises.
#[must_use]
pub fn enraged_wait(current: Duration) -> Duration {
    (current * 4 / 5).max(ENRAGED_WAIT_FLOOR).min(current)
}

/// Food the player loses from a hit of `amount` behind `armor`.
#[must_use]
pub fn armored_damage(amount: i32, armor: f32) -> i32 {
    if armor <= 0.0 {
        return amount;
    }
    (amount as f32 / armor).ceil() as i32
}

/// Melee damage after a multiplicative boost, rounded up.
#[must_use]
pub fn boosted_damage(base: i32, multiplier: f32) -> i32 {
    (base as f32 * multiplier).ceil() as i32
}

/// Cells covered by a blast centred on `center`.
///
/// Three vertical probes at columns `x-1..=x+1` each cover rows `y-1..=y+1`.
#[must_use]
pub fn blast_footprint(center: CellCoord) -> [CellCoord; 9] {
    let mut cells = [center; 9];
    let mut slot = 0;
    for dx in -1..=1 {
        for dy in -1..=1 {
            cells[slot] = CellCoord::new(center.column() + dx, center.row() + dy);
            slot += 1;
        }
    }
    cells
}

/// Cosmetic sprite rotation, in degrees, of a projectile launched in `direction`.
#[must_use]
pub const fn launch_rotation(kind: ProjectileKind, direction: Direction) -> f32 {
    match kind {
        ProjectileKind::Arrow => match direction {
            Direction::North => 325.0,
            Direction::East => 235.0,
            Direction::South => 145.0,
            Direction::West => 55.0,
        },
        ProjectileKind::Brain | ProjectileKind::PistolBullet | ProjectileKind::RifleBullet => 0.0,
    }
}
