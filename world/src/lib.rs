#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Scavenger.
//!
//! The world owns the board of the current level, the player, the enemy
//! registry, projectiles and bombs. It is mutated exclusively through
//! [`apply`] and observed through the functions in [`query`].

use std::time::Duration;

use glam::Vec2;
use scavenger_core::{
    AttackStyle, BombId, CellCoord, CellPoint, Command, DifficultyProfile, Direction, EnemyId,
    Event, FoodKind, LevelLayout, Obstacle, Pickup, PlayerLoadout, PowerupKind, ProjectileId,
    ProjectileKind, SoundCue, Spawn, WeaponKind, PLAYER_SPAWN,
};
use tracing::{debug, info, trace};

mod actors;
mod combat;
mod grid;
mod movement;

use actors::{Bomb, EnemyRegistry, Player, PlayerStats, Projectile, Struck};

pub use combat::{
    armored_damage, blast_footprint, boosted_damage, enraged_wait, launch_rotation,
    resolve_impact, Aftermath, Contact, Effect, Impact, BOMB_FUSE, BOMB_PLAYER_DAMAGE,
    ENRAGED_WAIT_FLOOR, MUZZLE_OFFSET,
};
pub use grid::{Grid, Occupant, Tile, WALL_HP};
pub use movement::{attempt_move, Blocker, Interactions, MoveOutcome};

/// Cosmetic duration of a single-cell slide.
const MOVE_TIME: Duration = Duration::from_millis(100);

/// Longest distance a projectile travels between contact checks.
const PROJECTILE_SUBSTEP: f32 = 0.25;

/// Distance at which a player shot meets a thrown brain.
const HOSTILE_CONTACT_RADIUS: f32 = 0.5;

/// Lifecycle of the currently loaded level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelPhase {
    /// No level has been loaded yet.
    Idle,
    /// The level is being played.
    Playing,
    /// The player left through the exit.
    Completed,
    /// The player starved; the world is frozen.
    GameOver,
}

/// Represents the authoritative Scavenger world state.
#[derive(Debug)]
pub struct World {
    level: u32,
    grid: Grid,
    player: Option<Player>,
    enemies: EnemyRegistry,
    projectiles: Vec<Projectile>,
    bombs: Vec<Bomb>,
    next_projectile: u32,
    next_bomb: u32,
    paused: bool,
    phase: LevelPhase,
    tick_index: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world that waits for its first level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: 0,
            grid: Grid::new(0, 0),
            player: None,
            enemies: EnemyRegistry::default(),
            projectiles: Vec::new(),
            bombs: Vec::new(),
            next_projectile: 0,
            next_bomb: 0,
            paused: true,
            phase: LevelPhase::Idle,
            tick_index: 0,
        }
    }

    fn accepts_actor_commands(&self) -> bool {
        !self.paused && self.phase == LevelPhase::Playing
    }

    fn load_level(
        &mut self,
        layout: &LevelLayout,
        loadout: PlayerLoadout,
        profile: DifficultyProfile,
        out_events: &mut Vec<Event>,
    ) {
        self.level = layout.level;
        self.grid = Grid::new(layout.columns, layout.rows);
        self.enemies.clear();
        self.projectiles.clear();
        self.bombs.clear();
        self.next_projectile = 0;
        self.next_bomb = 0;
        self.phase = LevelPhase::Playing;

        out_events.push(Event::LevelLoaded {
            level: layout.level,
            columns: layout.columns,
            rows: layout.rows,
        });

        let player = Player::spawn(PLAYER_SPAWN, loadout, PlayerStats::from_profile(&profile));
        let _ = self.grid.occupy(PLAYER_SPAWN, Occupant::Player);
        out_events.push(Event::PlayerSpawned {
            cell: PLAYER_SPAWN,
            food: player.food,
        });
        if let Some(held) = player.held_item {
            out_events.push(Event::ItemEquipped {
                kind: held.kind,
                uses: held.uses,
            });
        }
        self.player = Some(player);

        let mut registration_index = 0;
        for placement in &layout.placements {
            let cell = placement.cell;
            if !self.grid.contains(cell) || cell == PLAYER_SPAWN {
                debug!(
                    column = cell.column(),
                    row = cell.row(),
                    "placement outside the playable board skipped"
                );
                continue;
            }

            let tile = match placement.spawn {
                Spawn::Wall => Tile::Wall { hp: WALL_HP },
                Spawn::Food(kind) => Tile::Pickup(Pickup::Food(kind)),
                Spawn::Item(kind) => Tile::Pickup(Pickup::Item(kind)),
                Spawn::Collectible(index) => Tile::Pickup(Pickup::Collectible(index)),
                Spawn::Powerup(kind) => Tile::Pickup(Pickup::Powerup(kind)),
                Spawn::Exit => Tile::Exit,
                Spawn::Supplies => Tile::Supplies,
                Spawn::Enemy(tier) => {
                    if !self.grid.can_enter(cell) {
                        debug!(
                            column = cell.column(),
                            row = cell.row(),
                            "enemy placement on a blocked cell skipped"
                        );
                        continue;
                    }
                    let stats = profile.enemy_stats(tier);
                    let enemy = self.enemies.register(tier, cell, stats);
                    let _ = self.grid.occupy(cell, Occupant::Enemy(enemy));
                    out_events.push(Event::EnemySpawned {
                        enemy,
                        tier,
                        cell,
                        registration_index,
                        wait_time: stats.wait_time,
                    });
                    registration_index += 1;
                    continue;
                }
            };
            let _ = self.grid.set_tile(cell, tile);
        }

        self.paused = true;
        out_events.push(Event::PauseChanged { paused: true });
        debug!(
            level = layout.level,
            columns = layout.columns,
            rows = layout.rows,
            enemies = registration_index,
            "level loaded"
        );
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.phase == LevelPhase::GameOver {
            trace!("tick ignored after game over");
            return;
        }
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        if self.paused || self.phase != LevelPhase::Playing {
            return;
        }

        let due = self.player.as_mut().map_or(0, |player| player.advance(dt));
        for _ in 0..due {
            self.lose_food(1, out_events);
        }
        if self.check_starvation(out_events) {
            return;
        }

        self.advance_bombs(dt, out_events);
        if self.phase != LevelPhase::Playing {
            return;
        }
        self.advance_projectiles(dt, out_events);
    }

    fn set_paused(&mut self, paused: bool, out_events: &mut Vec<Event>) {
        match self.phase {
            LevelPhase::GameOver => {
                trace!(paused, "pause change ignored after game over");
                return;
            }
            LevelPhase::Completed if !paused => {
                debug!("completed level cannot be resumed");
                return;
            }
            LevelPhase::Idle | LevelPhase::Playing | LevelPhase::Completed => {}
        }
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        out_events.push(Event::PauseChanged { paused });
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.accepts_actor_commands() {
            trace!(?direction, "player move ignored while inactive");
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if !player.move_ready() {
            trace!(?direction, "player move ignored during cooldown");
            return;
        }
        player.start_move_cooldown();
        let from = player.cell;
        let wall_damage = player.wall_damage();
        let enemy_damage = player.enemy_damage();

        match attempt_move(&self.grid, from, direction, Interactions::PLAYER) {
            MoveOutcome::Moved { from, to } => {
                self.grid.relocate(from, to);
                if let Some(player) = self.player.as_mut() {
                    player.cell = to;
                }
                out_events.push(Event::PlayerMoved {
                    from,
                    to,
                    move_time: MOVE_TIME,
                });
                out_events.push(Event::Sound {
                    cue: SoundCue::Footstep,
                });
                self.enter_tile(to, out_events);
            }
            MoveOutcome::Blocked {
                cell,
                blocker: Blocker::Interactable(target),
            } => {
                out_events.push(Event::PlayerAttacked { cell, target });
                out_events.push(Event::Sound {
                    cue: SoundCue::Chop,
                });
                match target {
                    Obstacle::Wall => self.damage_wall(cell, wall_damage, out_events),
                    Obstacle::Enemy => {
                        if let Some(Occupant::Enemy(enemy)) = self.grid.occupant(cell) {
                            self.damage_enemy(enemy, enemy_damage, out_events);
                        }
                    }
                    Obstacle::Player => {}
                }
            }
            MoveOutcome::Blocked {
                cell,
                blocker: Blocker::Inert,
            } => {
                out_events.push(Event::PlayerBlocked { cell });
            }
        }

        if self.phase == LevelPhase::Playing {
            self.lose_food(1, out_events);
            let _ = self.check_starvation(out_events);
        }
    }

    fn enter_tile(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        match self.grid.tile(cell) {
            Tile::Pickup(pickup) => {
                let _ = self.grid.set_tile(cell, Tile::Floor);
                self.collect(cell, pickup, out_events);
            }
            Tile::Supplies => {
                let _ = self.grid.set_tile(cell, Tile::Floor);
                if let Some(player) = self.player.as_mut() {
                    player.supplies_collected = true;
                }
                out_events.push(Event::SuppliesCollected { cell });
                out_events.push(Event::Sound {
                    cue: SoundCue::ItemPickup,
                });
            }
            Tile::Exit => {
                let unlocked = self
                    .player
                    .as_ref()
                    .map_or(false, |player| player.supplies_collected);
                if unlocked {
                    self.complete_level(out_events);
                } else {
                    debug!("exit stays locked until the supplies are collected");
                }
            }
            Tile::Floor | Tile::Wall { .. } | Tile::Boundary => {}
        }
    }

    fn collect(&mut self, cell: CellCoord, pickup: Pickup, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        out_events.push(Event::PickupCollected { cell, pickup });

        match pickup {
            Pickup::Food(kind) => {
                let gain = player.food_gain(kind);
                player.food += gain;
                out_events.push(Event::FoodChanged {
                    food: player.food,
                    delta: gain,
                });
                let cue = match kind {
                    FoodKind::Food => SoundCue::Eat,
                    FoodKind::Soda => SoundCue::Drink,
                };
                out_events.push(Event::Sound { cue });
            }
            Pickup::Item(kind) => {
                let uses = player.equip(kind);
                out_events.push(Event::ItemEquipped { kind, uses });
                out_events.push(Event::Sound {
                    cue: SoundCue::ItemPickup,
                });
            }
            Pickup::Collectible(index) => {
                out_events.push(Event::CollectibleFound { index });
                out_events.push(Event::Sound {
                    cue: SoundCue::CollectiblePickup,
                });
            }
            Pickup::Powerup(kind) => {
                let factor = kind.boost_factor();
                match kind {
                    PowerupKind::MeleeBoost => player.melee_multiplier *= factor,
                    PowerupKind::ArmorBoost => player.armor *= factor,
                }
                out_events.push(Event::PowerupActivated { kind, factor });
                out_events.push(Event::Sound {
                    cue: SoundCue::ItemPickup,
                });
            }
        }
    }

    fn complete_level(&mut self, out_events: &mut Vec<Event>) {
        self.phase = LevelPhase::Completed;
        if !self.paused {
            self.paused = true;
            out_events.push(Event::PauseChanged { paused: true });
        }

        let mut destroyed = Vec::new();
        self.projectiles.retain(|projectile| {
            if projectile.kind.is_hostile() {
                destroyed.push(projectile.id);
                false
            } else {
                true
            }
        });
        for projectile in destroyed {
            out_events.push(Event::ProjectileDestroyed { projectile });
        }

        let (food, held_item) = self
            .player
            .as_ref()
            .map_or((0, None), |player| (player.food, player.held_item));
        info!(level = self.level, food, "level completed");
        out_events.push(Event::LevelCompleted {
            level: self.level,
            food,
            held_item,
        });
    }

    fn lose_food(&mut self, amount: i32, out_events: &mut Vec<Event>) {
        if let Some(player) = self.player.as_mut() {
            player.food -= amount;
            out_events.push(Event::FoodChanged {
                food: player.food,
                delta: -amount,
            });
        }
    }

    /// Enters game over when the player starved; returns whether the world is frozen.
    fn check_starvation(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.phase == LevelPhase::GameOver {
            return true;
        }
        if self.phase != LevelPhase::Playing {
            return false;
        }
        let starved = self.player.as_ref().map_or(false, |player| player.food <= 0);
        if starved {
            self.phase = LevelPhase::GameOver;
            info!(level = self.level, "player starved");
            out_events.push(Event::Sound {
                cue: SoundCue::GameOver,
            });
            out_events.push(Event::GameOver { level: self.level });
        }
        starved
    }

    fn hit_player(&mut self, amount: i32, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let damage = armored_damage(amount, player.armor);
        player.food -= damage;
        out_events.push(Event::PlayerHit {
            damage,
            food: player.food,
        });
        out_events.push(Event::FoodChanged {
            food: player.food,
            delta: -damage,
        });
        let _ = self.check_starvation(out_events);
    }

    fn damage_wall(&mut self, cell: CellCoord, damage: i32, out_events: &mut Vec<Event>) {
        let Tile::Wall { hp } = self.grid.tile(cell) else {
            debug!(
                column = cell.column(),
                row = cell.row(),
                "wall damage on a cell without a wall ignored"
            );
            return;
        };
        let remaining_hp = hp - damage;
        if remaining_hp <= 0 {
            let _ = self.grid.set_tile(cell, Tile::Floor);
            out_events.push(Event::WallDestroyed { cell });
        } else {
            let _ = self.grid.set_tile(cell, Tile::Wall { hp: remaining_hp });
            out_events.push(Event::WallDamaged {
                cell,
                damage,
                remaining_hp,
            });
        }
    }

    fn damage_enemy(&mut self, enemy: EnemyId, damage: i32, out_events: &mut Vec<Event>) {
        let Some(target) = self.enemies.get_mut(enemy) else {
            debug!(enemy = enemy.get(), "damage to a removed enemy ignored");
            return;
        };
        target.hp -= damage;
        if target.hp <= 0 {
            self.kill_enemy(enemy, out_events);
        } else {
            out_events.push(Event::EnemyDamaged {
                enemy,
                damage,
                remaining_hp: target.hp,
            });
        }
    }

    fn kill_enemy(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(removed) = self.enemies.remove(enemy) else {
            debug!(enemy = enemy.get(), "enemy already removed");
            return;
        };
        if self.grid.occupant(removed.cell) == Some(Occupant::Enemy(enemy)) {
            let _ = self.grid.vacate(removed.cell);
        }
        out_events.push(Event::EnemyDied {
            enemy,
            cell: removed.cell,
        });
    }

    fn fire_weapon(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.accepts_actor_commands() {
            trace!(?direction, "fire ignored while inactive");
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if !player.item_ready() {
            trace!(?direction, "fire ignored during item cooldown");
            return;
        }
        let Some(held) = player.held_item else {
            debug!("fire ignored without an equipped item");
            return;
        };
        let Some(kind) = held.kind.projectile() else {
            debug!(item = held.kind.name(), "equipped item cannot be fired");
            return;
        };
        player.start_item_cooldown(held.kind);

        let heading = direction_vector(direction);
        let origin = cell_vector(player.cell) + heading * MUZZLE_OFFSET;
        let velocity = heading * kind.speed();
        let projectile = self.spawn_projectile(kind, origin, velocity, None, 0, 0);
        out_events.push(Event::ProjectileFired {
            projectile,
            kind,
            origin: to_point(origin),
            velocity: to_point(velocity),
            rotation_degrees: launch_rotation(kind, direction),
        });
        out_events.push(Event::Sound {
            cue: SoundCue::Shot,
        });
        self.use_item(out_events);
    }

    fn drop_bomb(&mut self, out_events: &mut Vec<Event>) {
        if !self.accepts_actor_commands() {
            trace!("bomb drop ignored while inactive");
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if !player.item_ready() {
            trace!("bomb drop ignored during item cooldown");
            return;
        }
        if player.held_item.map(|held| held.kind) != Some(WeaponKind::Bomb) {
            debug!("bomb drop ignored without a bomb equipped");
            return;
        }
        player.start_item_cooldown(WeaponKind::Bomb);
        let cell = player.cell;

        let bomb = BombId::new(self.next_bomb);
        self.next_bomb = self.next_bomb.saturating_add(1);
        self.bombs.push(Bomb {
            id: bomb,
            cell,
            fuse: BOMB_FUSE,
        });
        out_events.push(Event::BombDropped {
            bomb,
            cell,
            fuse: BOMB_FUSE,
        });
        self.use_item(out_events);
    }

    fn use_item(&mut self, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if let Some((kind, remaining_uses)) = player.consume_use() {
            out_events.push(Event::ItemUsed {
                kind,
                remaining_uses,
            });
        }
        self.lose_food(1, out_events);
        let _ = self.check_starvation(out_events);
    }

    fn step_enemy(&mut self, enemy: EnemyId, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.accepts_actor_commands() {
            trace!(enemy = enemy.get(), "enemy step ignored while inactive");
            return;
        }
        let Some(actor) = self.enemies.get(enemy) else {
            debug!(enemy = enemy.get(), "step for a removed enemy ignored");
            return;
        };
        if actor.tier.attack() != AttackStyle::Melee {
            debug!(enemy = enemy.get(), "step requested by a ranged enemy ignored");
            return;
        }
        let from = actor.cell;
        let stats = actor.stats;

        match attempt_move(&self.grid, from, direction, Interactions::ENEMY) {
            MoveOutcome::Moved { from, to } => {
                self.grid.relocate(from, to);
                if let Some(actor) = self.enemies.get_mut(enemy) {
                    actor.cell = to;
                }
                out_events.push(Event::EnemyMoved {
                    enemy,
                    from,
                    to,
                    move_time: MOVE_TIME,
                });
            }
            MoveOutcome::Blocked {
                cell,
                blocker: Blocker::Interactable(target),
            } => {
                out_events.push(Event::EnemyAttacked {
                    enemy,
                    cell,
                    target,
                });
                match target {
                    Obstacle::Player => {
                        out_events.push(Event::Sound {
                            cue: SoundCue::EnemyAttack,
                        });
                        self.hit_player(stats.player_damage, out_events);
                    }
                    Obstacle::Wall => self.damage_wall(cell, stats.wall_damage, out_events),
                    Obstacle::Enemy => {}
                }
            }
            MoveOutcome::Blocked {
                blocker: Blocker::Inert,
                ..
            } => {
                trace!(enemy = enemy.get(), ?direction, "enemy step blocked");
            }
        }
    }

    fn throw_projectile(&mut self, enemy: EnemyId, heading: CellPoint, out_events: &mut Vec<Event>) {
        if !self.accepts_actor_commands() {
            trace!(enemy = enemy.get(), "throw ignored while inactive");
            return;
        }
        let Some(thrower) = self.enemies.get(enemy) else {
            debug!(enemy = enemy.get(), "throw for a removed enemy ignored");
            return;
        };
        if thrower.tier.attack() != AttackStyle::Ranged {
            debug!(enemy = enemy.get(), "throw requested by a melee enemy ignored");
            return;
        }
        let Some(heading) = heading.normalized() else {
            debug!(enemy = enemy.get(), "throw without a heading ignored");
            return;
        };
        let kind = ProjectileKind::Brain;
        let origin = cell_vector(thrower.cell);
        let velocity = Vec2::new(heading.x(), heading.y()) * kind.speed();
        let stats = thrower.stats;

        let projectile = self.spawn_projectile(
            kind,
            origin,
            velocity,
            Some(enemy),
            stats.player_damage,
            stats.wall_damage,
        );
        out_events.push(Event::ProjectileFired {
            projectile,
            kind,
            origin: to_point(origin),
            velocity: to_point(velocity),
            rotation_degrees: 0.0,
        });
    }

    fn spawn_projectile(
        &mut self,
        kind: ProjectileKind,
        position: Vec2,
        velocity: Vec2,
        spawner: Option<EnemyId>,
        player_damage: i32,
        wall_damage: i32,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.saturating_add(1);
        self.projectiles.push(Projectile {
            id,
            kind,
            position,
            velocity,
            spawner,
            player_damage,
            wall_damage,
            struck: Vec::new(),
        });
        id
    }

    fn advance_bombs(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut detonating = Vec::new();
        for bomb in &mut self.bombs {
            bomb.fuse = bomb.fuse.saturating_sub(dt);
            if bomb.fuse.is_zero() {
                detonating.push(bomb.id);
            }
        }

        for id in detonating {
            let Some(index) = self.bombs.iter().position(|bomb| bomb.id == id) else {
                continue;
            };
            let bomb = self.bombs.remove(index);
            self.explode(&bomb, out_events);
            if self.phase != LevelPhase::Playing {
                break;
            }
        }
    }

    fn explode(&mut self, bomb: &Bomb, out_events: &mut Vec<Event>) {
        out_events.push(Event::BombExploded {
            bomb: bomb.id,
            cell: bomb.cell,
        });
        out_events.push(Event::Sound {
            cue: SoundCue::Explosion,
        });

        let footprint = blast_footprint(bomb.cell);
        let mut player_caught = false;
        for cell in footprint {
            match self.grid.occupant(cell) {
                Some(Occupant::Enemy(enemy)) => self.kill_enemy(enemy, out_events),
                Some(Occupant::Player) => player_caught = true,
                None => {}
            }
            match self.grid.tile(cell) {
                Tile::Wall { .. } => {
                    let _ = self.grid.set_tile(cell, Tile::Floor);
                    out_events.push(Event::WallDestroyed { cell });
                }
                Tile::Pickup(_) => {
                    let _ = self.grid.set_tile(cell, Tile::Floor);
                    out_events.push(Event::TileCleared { cell });
                }
                Tile::Floor | Tile::Exit | Tile::Supplies | Tile::Boundary => {}
            }
        }

        let mut cleared_bombs = Vec::new();
        self.bombs.retain(|other| {
            if footprint.contains(&other.cell) {
                cleared_bombs.push(other.cell);
                false
            } else {
                true
            }
        });
        for cell in cleared_bombs {
            out_events.push(Event::TileCleared { cell });
        }

        let mut destroyed = Vec::new();
        self.projectiles.retain(|projectile| {
            if footprint.contains(&projectile.cell()) {
                destroyed.push(projectile.id);
                false
            } else {
                true
            }
        });
        for projectile in destroyed {
            out_events.push(Event::ProjectileDestroyed { projectile });
        }

        if player_caught {
            self.hit_player(BOMB_PLAYER_DAMAGE, out_events);
        }
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut projectiles = std::mem::take(&mut self.projectiles);
        let mut removed: Vec<ProjectileId> = Vec::new();

        for index in 0..projectiles.len() {
            if self.phase != LevelPhase::Playing {
                break;
            }
            if removed.contains(&projectiles[index].id) {
                continue;
            }
            self.fly(&mut projectiles, index, dt, &mut removed, out_events);
        }

        projectiles.retain(|projectile| !removed.contains(&projectile.id));
        self.projectiles = projectiles;
    }

    fn fly(
        &mut self,
        projectiles: &mut [Projectile],
        index: usize,
        dt: Duration,
        removed: &mut Vec<ProjectileId>,
        out_events: &mut Vec<Event>,
    ) {
        let travel = projectiles[index].velocity * dt.as_secs_f32();
        let steps = (travel.length() / PROJECTILE_SUBSTEP).ceil().max(1.0) as u32;
        let step = travel / steps as f32;

        for _ in 0..steps {
            projectiles[index].position += step;
            let cell = projectiles[index].cell();

            for touch in self.touches(projectiles, index, cell, removed) {
                let projectile = &mut projectiles[index];
                let Some(impact) = resolve_impact(projectile.kind, touch.contact) else {
                    continue;
                };
                if let Some(struck) = touch.target.struck() {
                    projectile.struck.push(struck);
                }
                let id = projectile.id;
                let at = to_point(projectile.position);
                let player_damage = projectile.player_damage;
                let wall_damage = projectile.wall_damage;

                match impact.effect {
                    Effect::None => {}
                    Effect::DamageWall => self.damage_wall(cell, wall_damage, out_events),
                    Effect::KillEnemy => {
                        if let Target::Enemy(enemy) = touch.target {
                            self.kill_enemy(enemy, out_events);
                        }
                    }
                    Effect::EnrageEnemy => {
                        if let Target::Enemy(enemy) = touch.target {
                            if let Some(actor) = self.enemies.get_mut(enemy) {
                                let wait_time = actor.enrage();
                                out_events.push(Event::EnemyEnraged { enemy, wait_time });
                            }
                        }
                    }
                    Effect::DestroyProjectile => {
                        if let Target::Projectile(other) = touch.target {
                            removed.push(other);
                            out_events.push(Event::ProjectileDestroyed { projectile: other });
                        }
                    }
                    Effect::HitPlayer => self.hit_player(player_damage, out_events),
                }

                match impact.aftermath {
                    Aftermath::Continue => {}
                    Aftermath::Stop => {
                        removed.push(id);
                        out_events.push(Event::ProjectileStopped { projectile: id, at });
                        return;
                    }
                    Aftermath::Destroy => {
                        removed.push(id);
                        out_events.push(Event::ProjectileDestroyed { projectile: id });
                        return;
                    }
                }
                if self.phase != LevelPhase::Playing {
                    return;
                }
            }
        }
    }

    fn touches(
        &self,
        projectiles: &[Projectile],
        index: usize,
        cell: CellCoord,
        removed: &[ProjectileId],
    ) -> Vec<Touch> {
        let projectile = &projectiles[index];
        let mut touches = Vec::new();

        match self.grid.tile(cell) {
            Tile::Boundary => touches.push(Touch {
                contact: Contact::Boundary,
                target: Target::Cell,
            }),
            Tile::Wall { .. } => touches.push(Touch {
                contact: Contact::Wall,
                target: Target::Cell,
            }),
            Tile::Floor | Tile::Pickup(_) | Tile::Exit | Tile::Supplies => {}
        }

        match self.grid.occupant(cell) {
            Some(Occupant::Enemy(enemy))
                if projectile.spawner != Some(enemy)
                    && !projectile.has_struck(Struck::Enemy(enemy)) =>
            {
                if let Some(actor) = self.enemies.get(enemy) {
                    touches.push(Touch {
                        contact: Contact::Enemy(actor.tier),
                        target: Target::Enemy(enemy),
                    });
                }
            }
            Some(Occupant::Player) if !projectile.has_struck(Struck::Player) => {
                touches.push(Touch {
                    contact: Contact::Player,
                    target: Target::Player,
                });
            }
            Some(_) | None => {}
        }

        if !projectile.kind.is_hostile() {
            for other in projectiles {
                if other.kind.is_hostile()
                    && !removed.contains(&other.id)
                    && !projectile.has_struck(Struck::Projectile(other.id))
                    && other.position.distance(projectile.position) < HOSTILE_CONTACT_RADIUS
                {
                    touches.push(Touch {
                        contact: Contact::HostileProjectile,
                        target: Target::Projectile(other.id),
                    });
                }
            }
        }

        touches
    }
}

#[derive(Clone, Copy, Debug)]
struct Touch {
    contact: Contact,
    target: Target,
}

#[derive(Clone, Copy, Debug)]
enum Target {
    Cell,
    Enemy(EnemyId),
    Projectile(ProjectileId),
    Player,
}

impl Target {
    fn struck(self) -> Option<Struck> {
        match self {
            Self::Cell => None,
            Self::Enemy(enemy) => Some(Struck::Enemy(enemy)),
            Self::Projectile(projectile) => Some(Struck::Projectile(projectile)),
            Self::Player => Some(Struck::Player),
        }
    }
}

fn direction_vector(direction: Direction) -> Vec2 {
    let (dx, dy) = direction.delta();
    Vec2::new(dx as f32, dy as f32)
}

fn cell_vector(cell: CellCoord) -> Vec2 {
    Vec2::new(cell.column() as f32, cell.row() as f32)
}

fn to_point(vector: Vec2) -> CellPoint {
    CellPoint::new(vector.x, vector.y)
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::GenerateLevel { level } => {
            trace!(level, "level generation is handled outside the world");
        }
        Command::LoadLevel {
            layout,
            loadout,
            profile,
        } => world.load_level(&layout, loadout, profile, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetPaused { paused } => world.set_paused(paused, out_events),
        Command::MovePlayer { direction } => world.move_player(direction, out_events),
        Command::FireWeapon { direction } => world.fire_weapon(direction, out_events),
        Command::DropBomb => world.drop_bomb(out_events),
        Command::StepEnemy { enemy, direction } => world.step_enemy(enemy, direction, out_events),
        Command::ThrowProjectile { enemy, heading } => {
            world.throw_projectile(enemy, heading, out_events)
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Grid, LevelPhase, World};
    use scavenger_core::{
        BombId, CellCoord, CellPoint, EnemyView, PlayerSnapshot, ProjectileId, ProjectileKind,
    };

    /// Lifecycle phase of the loaded level.
    #[must_use]
    pub fn phase(world: &World) -> LevelPhase {
        world.phase
    }

    /// Whether actor timers are suspended.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Captures the player's state, if a level is loaded.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.player.as_ref().map(|player| player.snapshot())
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.snapshots())
    }

    /// Captures the projectiles in flight in identifier order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        let mut snapshots: Vec<ProjectileSnapshot> = world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                kind: projectile.kind,
                position: CellPoint::new(projectile.position.x, projectile.position.y),
                velocity: CellPoint::new(projectile.velocity.x, projectile.velocity.y),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Captures the bombs waiting to explode.
    #[must_use]
    pub fn bombs(world: &World) -> Vec<BombSnapshot> {
        world
            .bombs
            .iter()
            .map(|bomb| BombSnapshot {
                id: bomb.id,
                cell: bomb.cell,
                fuse: bomb.fuse,
            })
            .collect()
    }

    /// Immutable representation of a projectile in flight.
    #[derive(Clone, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Unique identifier assigned to the projectile.
        pub id: ProjectileId,
        /// Kind of projectile.
        pub kind: ProjectileKind,
        /// Current position in cell units.
        pub position: CellPoint,
        /// Velocity in cells per second.
        pub velocity: CellPoint,
    }

    /// Immutable representation of a bomb waiting to explode.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct BombSnapshot {
        /// Unique identifier assigned to the bomb.
        pub id: BombId,
        /// Cell the bomb lies on.
        pub cell: CellCoord,
        /// Time left until detonation.
        pub fuse: Duration,
    }
}
