//! Difficulty presets and the profile that parameterises generation and actors.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{scale_duration, EnemyStats, EnemyTier, WeaponKind};

const MIN_ENEMY_WAIT: Duration = Duration::from_millis(1_100);

/// Named difficulty presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyPreset {
    /// Generous food, weaker enemies, every item unlocked.
    Easy,
    /// Baseline tuning.
    Normal,
    /// Tougher enemies and every enemy tier from the first level.
    Hard,
    /// Hand-edited values that match no preset.
    Custom,
}

/// Multipliers applied to the spawn quotas of each tile kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnFactors {
    /// Multiplier for destructible walls.
    pub wall: f32,
    /// Multiplier for food pickups.
    pub food: f32,
    /// Multiplier for item pickups.
    pub item: f32,
    /// Multiplier for enemies.
    pub enemy: f32,
}

/// Levels from which each weapon kind and enemy tier may appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockLevels {
    /// First level with bombs.
    pub bomb: u32,
    /// First level with crossbows.
    pub crossbow: u32,
    /// First level with pistols.
    pub pistol: u32,
    /// First level with rifles.
    pub rifle: u32,
    /// First level with tier one enemies.
    pub enemy_tier1: u32,
    /// First level with tier two enemies.
    pub enemy_tier2: u32,
    /// First level with tier three enemies.
    pub enemy_tier3: u32,
}

impl UnlockLevels {
    /// First level at which `kind` may be placed.
    #[must_use]
    pub const fn weapon(&self, kind: WeaponKind) -> u32 {
        match kind {
            WeaponKind::Bomb => self.bomb,
            WeaponKind::Crossbow => self.crossbow,
            WeaponKind::Pistol => self.pistol,
            WeaponKind::Rifle => self.rifle,
        }
    }

    /// First level at which `tier` may be placed.
    #[must_use]
    pub const fn tier(&self, tier: EnemyTier) -> u32 {
        match tier {
            EnemyTier::One => self.enemy_tier1,
            EnemyTier::Two => self.enemy_tier2,
            EnemyTier::Three => self.enemy_tier3,
        }
    }

    /// Lowest unlock level among all weapon kinds.
    #[must_use]
    pub fn min_weapon(&self) -> u32 {
        WeaponKind::ALL
            .iter()
            .map(|kind| self.weapon(*kind))
            .min()
            .unwrap_or(u32::MAX)
    }

    /// Lowest unlock level among all enemy tiers.
    #[must_use]
    pub fn min_tier(&self) -> u32 {
        EnemyTier::ALL
            .iter()
            .map(|tier| self.tier(*tier))
            .min()
            .unwrap_or(u32::MAX)
    }
}

/// Multipliers applied to enemy statistics on spawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyModifiers {
    /// Multiplier for the cooldown between actions.
    pub wait_time: f32,
    /// Multiplier for damage dealt to the player.
    pub player_damage: f32,
    /// Multiplier for damage dealt to walls.
    pub wall_damage: f32,
    /// Multiplier for hit points.
    pub hp: f32,
}

impl EnemyModifiers {
    /// Scales base tier statistics.
    ///
    /// Integral statistics round up and the cooldown never drops below 1.1 s.
    #[must_use]
    pub fn scale(&self, base: EnemyStats) -> EnemyStats {
        let wait = scale_duration(base.wait_time, self.wait_time).max(MIN_ENEMY_WAIT);
        EnemyStats {
            hp: scale_ceil(base.hp, self.hp),
            player_damage: scale_ceil(base.player_damage, self.player_damage),
            wall_damage: scale_ceil(base.wall_damage, self.wall_damage),
            wait_time: wait,
            sense_distance: base.sense_distance,
        }
    }
}

/// Multipliers applied to the player's statistics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerModifiers {
    /// Multiplier for the move and item cooldowns.
    pub wait_time: f32,
    /// Multiplier for food restored by pickups.
    pub food_intake: f32,
    /// Multiplier for melee damage dealt to enemies.
    pub enemy_damage: f32,
    /// Multiplier for melee damage dealt to walls.
    pub wall_damage: f32,
    /// Multiplier for the interval between passive food losses.
    pub food_depletion_time: f32,
}

/// Full set of tunables selected by the player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Preset the values were derived from.
    pub preset: DifficultyPreset,
    /// Level a fresh run starts on.
    pub start_level: u32,
    /// Food a fresh run starts with.
    pub initial_food: i32,
    /// Speed at which boards grow with the level number.
    pub level_growth_rate: f32,
    /// Spawn quota multipliers.
    pub spawn: SpawnFactors,
    /// Unlock levels for items and enemy tiers.
    pub unlocks: UnlockLevels,
    /// Enemy statistic multipliers.
    pub enemy: EnemyModifiers,
    /// Player statistic multipliers.
    pub player: PlayerModifiers,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::preset(DifficultyPreset::Normal)
    }
}

impl DifficultyProfile {
    /// Builds the literal values of a preset.
    ///
    /// `Custom` has no literal values of its own and yields the normal values
    /// relabelled as custom.
    #[must_use]
    pub fn preset(preset: DifficultyPreset) -> Self {
        let mut profile = Self {
            preset,
            start_level: 1,
            initial_food: 100,
            level_growth_rate: 1.0,
            spawn: SpawnFactors {
                wall: 1.0,
                food: 1.0,
                item: 1.0,
                enemy: 1.0,
            },
            unlocks: UnlockLevels {
                bomb: 3,
                crossbow: 10,
                pistol: 20,
                rifle: 30,
                enemy_tier1: 1,
                enemy_tier2: 10,
                enemy_tier3: 20,
            },
            enemy: EnemyModifiers {
                wait_time: 1.0,
                player_damage: 1.0,
                wall_damage: 1.0,
                hp: 1.0,
            },
            player: PlayerModifiers {
                wait_time: 1.0,
                food_intake: 1.0,
                enemy_damage: 1.0,
                wall_damage: 1.0,
                food_depletion_time: 1.0,
            },
        };

        match preset {
            DifficultyPreset::Normal | DifficultyPreset::Custom => {}
            DifficultyPreset::Easy => {
                profile.initial_food = 200;
                profile.level_growth_rate = 0.5;
                profile.spawn.food = 1.5;
                profile.spawn.item = 1.5;
                profile.spawn.enemy = 0.75;
                profile.unlocks.bomb = 1;
                profile.unlocks.crossbow = 1;
                profile.unlocks.pistol = 1;
                profile.unlocks.rifle = 1;
                profile.enemy = EnemyModifiers {
                    wait_time: 2.0,
                    player_damage: 0.5,
                    wall_damage: 0.5,
                    hp: 0.5,
                };
                profile.player = PlayerModifiers {
                    wait_time: 1.0,
                    food_intake: 2.0,
                    enemy_damage: 2.0,
                    wall_damage: 2.0,
                    food_depletion_time: 2.0,
                };
            }
            DifficultyPreset::Hard => {
                profile.level_growth_rate = 1.5;
                profile.spawn.item = 0.75;
                profile.unlocks.enemy_tier2 = 1;
                profile.unlocks.enemy_tier3 = 1;
                profile.enemy = EnemyModifiers {
                    wait_time: 1.0,
                    player_damage: 1.5,
                    wall_damage: 1.5,
                    hp: 1.5,
                };
                profile.player.wall_damage = 0.5;
                profile.player.food_depletion_time = 0.75;
            }
        }
        profile
    }

    /// Switches the profile to another preset in place.
    ///
    /// Choosing `Custom` keeps every current value and only changes the label.
    pub fn apply_preset(&mut self, preset: DifficultyPreset) {
        if preset == DifficultyPreset::Custom {
            self.preset = DifficultyPreset::Custom;
        } else {
            *self = Self::preset(preset);
        }
    }

    /// Statistics of an enemy of `tier` under this profile.
    #[must_use]
    pub fn enemy_stats(&self, tier: EnemyTier) -> EnemyStats {
        self.enemy.scale(tier.base_stats())
    }

    /// Checks every invariant and reports the first violation.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.start_level == 0 {
            return Err(ProfileError::ZeroStartLevel);
        }
        if self.initial_food <= 0 {
            return Err(ProfileError::NonPositiveFood(self.initial_food));
        }

        let factors = [
            ("level_growth_rate", self.level_growth_rate),
            ("spawn.wall", self.spawn.wall),
            ("spawn.food", self.spawn.food),
            ("spawn.item", self.spawn.item),
            ("spawn.enemy", self.spawn.enemy),
            ("enemy.wait_time", self.enemy.wait_time),
            ("enemy.player_damage", self.enemy.player_damage),
            ("enemy.wall_damage", self.enemy.wall_damage),
            ("enemy.hp", self.enemy.hp),
            ("player.wait_time", self.player.wait_time),
            ("player.food_intake", self.player.food_intake),
            ("player.enemy_damage", self.player.enemy_damage),
            ("player.wall_damage", self.player.wall_damage),
            ("player.food_depletion_time", self.player.food_depletion_time),
        ];
        for (field, value) in factors {
            if !(value.is_finite() && value > 0.0) {
                return Err(ProfileError::NonPositiveFactor { field, value });
            }
        }

        let unlocks = [
            ("unlocks.bomb", self.unlocks.bomb),
            ("unlocks.crossbow", self.unlocks.crossbow),
            ("unlocks.pistol", self.unlocks.pistol),
            ("unlocks.rifle", self.unlocks.rifle),
            ("unlocks.enemy_tier1", self.unlocks.enemy_tier1),
            ("unlocks.enemy_tier2", self.unlocks.enemy_tier2),
            ("unlocks.enemy_tier3", self.unlocks.enemy_tier3),
        ];
        for (field, level) in unlocks {
            if level == 0 {
                return Err(ProfileError::ZeroUnlock { field });
            }
        }
        Ok(())
    }
}

/// Invariant violations reported by [`DifficultyProfile::validate`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ProfileError {
    /// The start level must be at least one.
    #[error("start level must be at least 1")]
    ZeroStartLevel,
    /// Initial food must be positive.
    #[error("initial food must be positive, got {0}")]
    NonPositiveFood(i32),
    /// A modifier or factor was zero, negative or not finite.
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositiveFactor {
        /// Name of the offending field.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// An unlock level was zero.
    #[error("{field} must be at least 1")]
    ZeroUnlock {
        /// Name of the offending field.
        field: &'static str,
    },
}

fn scale_ceil(base: i32, factor: f32) -> i32 {
    (base as f32 * factor).ceil() as i32
}
