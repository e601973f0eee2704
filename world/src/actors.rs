use std::time::Duration;

use glam::Vec2;
use scavenger_core::{
    scale_duration, BombId, CellCoord, CellPoint, DifficultyProfile, EnemyId, EnemySnapshot,
    EnemyStats, EnemyTier, FoodKind, HeldItem, PlayerLoadout, PlayerSnapshot, ProjectileId,
    ProjectileKind, WeaponKind,
};

use crate::combat::{boosted_damage, enraged_wait};

const PLAYER_WAIT: Duration = Duration::from_millis(200);
const PLAYER_WALL_DAMAGE: i32 = 1;
const PLAYER_ENEMY_DAMAGE: i32 = 10;
const FOOD_DEPLETION_INTERVAL: Duration = Duration::from_secs(1);

/// Player statistics after difficulty scaling.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlayerStats {
    pub(crate) wait_time: Duration,
    pub(crate) wall_damage: i32,
    pub(crate) enemy_damage: i32,
    pub(crate) food_intake: f32,
    pub(crate) item_cooldown_scale: f32,
    pub(crate) depletion_interval: Duration,
}

impl PlayerStats {
    pub(crate) fn from_profile(profile: &DifficultyProfile) -> Self {
        let modifiers = profile.player;
        Self {
            wait_time: scale_duration(PLAYER_WAIT, modifiers.wait_time),
            wall_damage: boosted_damage(PLAYER_WALL_DAMAGE, modifiers.wall_damage),
            enemy_damage: boosted_damage(PLAYER_ENEMY_DAMAGE, modifiers.enemy_damage),
            food_intake: modifiers.food_intake,
            item_cooldown_scale: modifiers.wait_time,
            depletion_interval: scale_duration(FOOD_DEPLETION_INTERVAL, modifiers.food_depletion_time),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) cell: CellCoord,
    pub(crate) food: i32,
    pub(crate) held_item: Option<HeldItem>,
    pub(crate) stats: PlayerStats,
    pub(crate) armor: f32,
    pub(crate) melee_multiplier: f32,
    pub(crate) supplies_collected: bool,
    move_cooldown: Duration,
    item_cooldown: Duration,
    depletion_elapsed: Duration,
}

impl Player {
    pub(crate) fn spawn(cell: CellCoord, loadout: PlayerLoadout, stats: PlayerStats) -> Self {
        Self {
            cell,
            food: loadout.food,
            held_item: loadout.held_item,
            stats,
            armor: 1.0,
            melee_multiplier: 1.0,
            supplies_collected: false,
            move_cooldown: Duration::ZERO,
            item_cooldown: Duration::ZERO,
            depletion_elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn move_ready(&self) -> bool {
        self.move_cooldown.is_zero()
    }

    pub(crate) fn item_ready(&self) -> bool {
        self.item_cooldown.is_zero()
    }

    pub(crate) fn start_move_cooldown(&mut self) {
        self.move_cooldown = self.stats.wait_time;
    }

    pub(crate) fn start_item_cooldown(&mut self, kind: WeaponKind) {
        self.item_cooldown = scale_duration(kind.stats().cooldown, self.stats.item_cooldown_scale);
    }

    /// Advances cooldowns and returns how many passive food losses are due.
    pub(crate) fn advance(&mut self, dt: Duration) -> u32 {
        self.move_cooldown = self.move_cooldown.saturating_sub(dt);
        self.item_cooldown = self.item_cooldown.saturating_sub(dt);

        let interval = self.stats.depletion_interval;
        if interval.is_zero() {
            return 0;
        }
        self.depletion_elapsed += dt;
        let mut due = 0;
        while self.depletion_elapsed >= interval {
            self.depletion_elapsed -= interval;
            due += 1;
        }
        due
    }

    pub(crate) fn wall_damage(&self) -> i32 {
        boosted_damage(self.stats.wall_damage, self.melee_multiplier)
    }

    pub(crate) fn enemy_damage(&self) -> i32 {
        boosted_damage(self.stats.enemy_damage, self.melee_multiplier)
    }

    pub(crate) fn food_gain(&self, kind: FoodKind) -> i32 {
        boosted_damage(kind.base_points(), self.stats.food_intake)
    }

    /// Equips or restocks an item, returning the resulting uses.
    pub(crate) fn equip(&mut self, kind: WeaponKind) -> u32 {
        let stats = kind.stats();
        let uses = match self.held_item {
            Some(held) if held.kind == kind => {
                held.uses.saturating_add(stats.initial_uses).min(stats.max_uses)
            }
            _ => stats.initial_uses,
        };
        self.held_item = Some(HeldItem { kind, uses });
        uses
    }

    /// Consumes one use of the held item, returning the uses left.
    pub(crate) fn consume_use(&mut self) -> Option<(WeaponKind, u32)> {
        let held = self.held_item?;
        let remaining = held.uses.saturating_sub(1);
        self.held_item = if remaining == 0 {
            None
        } else {
            Some(HeldItem {
                kind: held.kind,
                uses: remaining,
            })
        };
        Some((held.kind, remaining))
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: self.cell,
            food: self.food,
            move_ready: self.move_ready(),
            item_ready: self.item_ready(),
            held_item: self.held_item,
            armor: self.armor,
            supplies_collected: self.supplies_collected,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) tier: EnemyTier,
    pub(crate) cell: CellCoord,
    pub(crate) hp: i32,
    pub(crate) stats: EnemyStats,
    pub(crate) enraged: bool,
}

impl Enemy {
    pub(crate) fn enrage(&mut self) -> Duration {
        self.stats.wait_time = enraged_wait(self.stats.wait_time);
        self.enraged = true;
        self.stats.wait_time
    }

    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            tier: self.tier,
            cell: self.cell,
            hp: self.hp,
            wait_time: self.stats.wait_time,
            sense_distance: self.stats.sense_distance,
            enraged: self.enraged,
        }
    }
}

/// Live enemies of the current level in registration order.
#[derive(Clone, Debug, Default)]
pub(crate) struct EnemyRegistry {
    enemies: Vec<Enemy>,
    next_id: u32,
}

impl EnemyRegistry {
    pub(crate) fn clear(&mut self) {
        self.enemies.clear();
        self.next_id = 0;
    }

    pub(crate) fn register(&mut self, tier: EnemyTier, cell: CellCoord, stats: EnemyStats) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.enemies.push(Enemy {
            id,
            tier,
            cell,
            hp: stats.hp,
            stats,
            enraged: false,
        });
        id
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        let index = self.enemies.iter().position(|enemy| enemy.id == id)?;
        Some(self.enemies.remove(index))
    }

    pub(crate) fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.enemies.iter().map(Enemy::snapshot).collect()
    }
}

/// Objects a projectile already touched and must not touch again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Struck {
    Enemy(EnemyId),
    Projectile(ProjectileId),
    Player,
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) kind: ProjectileKind,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) spawner: Option<EnemyId>,
    pub(crate) player_damage: i32,
    pub(crate) wall_damage: i32,
    pub(crate) struck: Vec<Struck>,
}

impl Projectile {
    pub(crate) fn cell(&self) -> CellCoord {
        CellPoint::new(self.position.x, self.position.y).nearest_cell()
    }

    pub(crate) fn has_struck(&self, target: Struck) -> bool {
        self.struck.contains(&target)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Bomb {
    pub(crate) id: BombId,
    pub(crate) cell: CellCoord,
    pub(crate) fuse: Duration,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Player, PlayerStats};
    use scavenger_core::{
        CellCoord, DifficultyPreset, DifficultyProfile, HeldItem, PlayerLoadout, WeaponKind,
    };

    fn player(held_item: Option<HeldItem>) -> Player {
        let stats = PlayerStats::from_profile(&DifficultyProfile::default());
        Player::spawn(
            CellCoord::new(0, 0),
            PlayerLoadout {
                food: 100,
                held_item,
            },
            stats,
        )
    }

    #[test]
    fn picking_the_same_item_stacks_up_to_the_maximum() {
        let mut player = player(Some(HeldItem {
            kind: WeaponKind::Pistol,
            uses: 10,
        }));
        assert_eq!(player.equip(WeaponKind::Pistol), 12);
    }

    #[test]
    fn picking_another_item_replaces_the_held_one() {
        let mut player = player(Some(HeldItem {
            kind: WeaponKind::Pistol,
            uses: 10,
        }));
        assert_eq!(player.equip(WeaponKind::Crossbow), 3);
        assert_eq!(player.held_item.map(|held| held.kind), Some(WeaponKind::Crossbow));
    }

    #[test]
    fn last_use_drops_the_item() {
        let mut player = player(Some(HeldItem {
            kind: WeaponKind::Bomb,
            uses: 1,
        }));
        assert_eq!(player.consume_use(), Some((WeaponKind::Bomb, 0)));
        assert!(player.held_item.is_none());
        assert_eq!(player.consume_use(), None);
    }

    #[test]
    fn food_depletes_once_per_interval() {
        let mut player = player(None);
        assert_eq!(player.advance(Duration::from_millis(600)), 0);
        assert_eq!(player.advance(Duration::from_millis(600)), 1);
        assert_eq!(player.advance(Duration::from_millis(2_000)), 2);
    }

    #[test]
    fn easy_profile_doubles_melee_damage() {
        let stats = PlayerStats::from_profile(&DifficultyProfile::preset(DifficultyPreset::Easy));
        assert_eq!(stats.wall_damage, 2);
        assert_eq!(stats.enemy_damage, 20);
        assert_eq!(stats.depletion_interval, Duration::from_secs(2));
    }
}
