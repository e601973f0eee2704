#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy scheduling system that decides when and how each enemy acts.
//!
//! Every enemy starts dormant and wakes after its wait time plus a small
//! stagger derived from its registration index. Once active it takes one turn
//! per wait time: melee enemies step toward the player and ranged enemies
//! throw at it, provided the player is within their sense distance.

use std::{collections::BTreeMap, time::Duration};

use scavenger_core::{
    AttackStyle, CellCoord, CellPoint, Command, Direction, EnemyId, EnemySnapshot, EnemyView,
    Event, PlayerSnapshot,
};

const DEFAULT_STAGGER_PERCENT: u32 = 20;
const DEFAULT_STAGGER_WINDOW: Duration = Duration::from_secs(1);

/// Configuration parameters required to construct the enemy behavior system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    stagger_percent: u32,
    stagger_window: Duration,
}

impl Config {
    /// Creates a configuration with the given wake stagger.
    ///
    /// Each enemy's wake-up is delayed by `stagger_percent` of its wait time
    /// per registration index, wrapped into `stagger_window`.
    #[must_use]
    pub const fn new(stagger_percent: u32, stagger_window: Duration) -> Self {
        Self {
            stagger_percent,
            stagger_window,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_STAGGER_PERCENT, DEFAULT_STAGGER_WINDOW)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Dormant { wake_delay: Duration },
    Active,
}

#[derive(Clone, Copy, Debug)]
struct Schedule {
    phase: Phase,
    wait_time: Duration,
    elapsed: Duration,
}

impl Schedule {
    /// Advances the schedule and reports whether a turn is due.
    ///
    /// At most one turn is taken per call; time owed beyond that carries
    /// over so the next call acts on fresh positions.
    fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);

        if let Phase::Dormant { wake_delay } = self.phase {
            if self.elapsed < wake_delay {
                return false;
            }
            self.elapsed -= wake_delay;
            self.phase = Phase::Active;
        }

        if self.wait_time.is_zero() || self.elapsed < self.wait_time {
            return false;
        }
        self.elapsed -= self.wait_time;
        true
    }
}

/// Pure system that emits enemy step and throw commands.
#[derive(Debug)]
pub struct EnemyBehavior {
    config: Config,
    paused: bool,
    schedules: BTreeMap<EnemyId, Schedule>,
}

impl EnemyBehavior {
    /// Creates a new enemy behavior system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            paused: true,
            schedules: BTreeMap::new(),
        }
    }

    /// Number of enemies currently tracked.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.schedules.len()
    }

    /// Reports whether the enemy has finished its wake-up delay.
    #[must_use]
    pub fn is_active(&self, enemy: EnemyId) -> bool {
        self.schedules
            .get(&enemy)
            .map_or(false, |schedule| schedule.phase == Phase::Active)
    }

    /// Consumes world events and immutable views to emit enemy commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        player: Option<&PlayerSnapshot>,
        out: &mut Vec<Command>,
    ) {
        let mut due: Vec<EnemyId> = Vec::new();

        for event in events {
            match event {
                Event::LevelLoaded { .. } => self.schedules.clear(),
                Event::EnemySpawned {
                    enemy,
                    registration_index,
                    wait_time,
                    ..
                } => {
                    let wake_delay = self.wake_delay(*wait_time, *registration_index);
                    let _ = self.schedules.insert(
                        *enemy,
                        Schedule {
                            phase: Phase::Dormant { wake_delay },
                            wait_time: *wait_time,
                            elapsed: Duration::ZERO,
                        },
                    );
                }
                Event::EnemyEnraged { enemy, wait_time } => {
                    if let Some(schedule) = self.schedules.get_mut(enemy) {
                        schedule.wait_time = *wait_time;
                    }
                }
                Event::EnemyDied { enemy, .. } => {
                    let _ = self.schedules.remove(enemy);
                    due.retain(|id| id != enemy);
                }
                Event::PauseChanged { paused } => self.paused = *paused,
                Event::TimeAdvanced { dt } if !self.paused => {
                    for (id, schedule) in &mut self.schedules {
                        if schedule.advance(*dt) {
                            due.push(*id);
                        }
                    }
                }
                _ => {}
            }
        }

        let Some(player) = player else {
            return;
        };

        for id in due {
            if let Some(enemy) = enemies.get(id) {
                if let Some(command) = take_turn(enemy, player.cell) {
                    out.push(command);
                }
            }
        }
    }

    fn wake_delay(&self, wait_time: Duration, registration_index: u32) -> Duration {
        let window = self.config.stagger_window.as_nanos();
        if window == 0 {
            return wait_time;
        }
        let stagger = wait_time.as_nanos() * u128::from(self.config.stagger_percent)
            * u128::from(registration_index)
            / 100
            % window;
        wait_time.saturating_add(Duration::from_nanos(stagger as u64))
    }
}

/// Decides the command an enemy issues on its turn, if any.
#[must_use]
pub fn take_turn(enemy: &EnemySnapshot, target: CellCoord) -> Option<Command> {
    if enemy.cell.distance(target) >= enemy.sense_distance {
        return None;
    }

    match enemy.tier.attack() {
        AttackStyle::Melee => chase_direction(enemy.cell, target).map(|direction| {
            Command::StepEnemy {
                enemy: enemy.id,
                direction,
            }
        }),
        AttackStyle::Ranged => {
            let heading = CellPoint::new(
                (target.column() - enemy.cell.column()) as f32,
                (target.row() - enemy.cell.row()) as f32,
            )
            .normalized()?;
            Some(Command::ThrowProjectile {
                enemy: enemy.id,
                heading,
            })
        }
    }
}

/// Cardinal step toward the target, preferring the horizontal axis.
#[must_use]
pub fn chase_direction(from: CellCoord, target: CellCoord) -> Option<Direction> {
    let dx = target.column() - from.column();
    if dx != 0 {
        return Direction::from_delta(dx.signum(), 0);
    }
    let dy = if target.row() > from.row() { 1 } else { -1 };
    Direction::from_delta(0, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scavenger_core::EnemyTier;

    fn snapshot(id: u32, tier: EnemyTier, cell: CellCoord) -> EnemySnapshot {
        let stats = tier.base_stats();
        EnemySnapshot {
            id: EnemyId::new(id),
            tier,
            cell,
            hp: stats.hp,
            wait_time: stats.wait_time,
            sense_distance: stats.sense_distance,
            enraged: false,
        }
    }

    fn spawned(id: u32, index: u32, wait_time: Duration) -> Event {
        Event::EnemySpawned {
            enemy: EnemyId::new(id),
            tier: EnemyTier::One,
            cell: CellCoord::new(3, 0),
            registration_index: index,
            wait_time,
        }
    }

    fn tick(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    #[test]
    fn wake_delay_wraps_the_stagger_into_one_second() {
        let behavior = EnemyBehavior::new(Config::default());
        let wait = Duration::from_secs(2);
        assert_eq!(behavior.wake_delay(wait, 0), wait);
        assert_eq!(behavior.wake_delay(wait, 1), Duration::from_millis(2_400));
        assert_eq!(behavior.wake_delay(wait, 3), Duration::from_millis(2_200));
    }

    #[test]
    fn schedule_wakes_then_acts_every_wait_time() {
        let mut schedule = Schedule {
            phase: Phase::Dormant {
                wake_delay: Duration::from_secs(2),
            },
            wait_time: Duration::from_secs(2),
            elapsed: Duration::ZERO,
        };
        assert!(!schedule.advance(Duration::from_millis(1_999)));
        assert!(!schedule.advance(Duration::from_millis(1)));
        assert_eq!(schedule.phase, Phase::Active);
        assert!(schedule.advance(Duration::from_secs(2)));
        assert!(!schedule.advance(Duration::from_secs(1)));
    }

    #[test]
    fn long_ticks_take_one_turn_and_carry_the_rest() {
        let mut schedule = Schedule {
            phase: Phase::Active,
            wait_time: Duration::from_secs(2),
            elapsed: Duration::ZERO,
        };
        assert!(schedule.advance(Duration::from_secs(5)));
        assert_eq!(schedule.elapsed, Duration::from_secs(3));
        assert!(schedule.advance(Duration::ZERO));
        assert!(!schedule.advance(Duration::ZERO));
        assert_eq!(schedule.elapsed, Duration::from_secs(1));
    }

    #[test]
    fn enraged_enemies_act_on_the_shorter_cadence() {
        let mut behavior = EnemyBehavior::new(Config::default());
        let enemies = EnemyView::from_snapshots(vec![snapshot(
            0,
            EnemyTier::One,
            CellCoord::new(3, 0),
        )]);
        let player = PlayerSnapshot {
            cell: CellCoord::new(0, 0),
            food: 100,
            move_ready: true,
            item_ready: true,
            held_item: None,
            armor: 1.0,
            supplies_collected: false,
        };
        let mut out = Vec::new();

        behavior.handle(
            &[
                spawned(0, 0, Duration::from_secs(2)),
                Event::PauseChanged { paused: false },
                tick(2_000),
                Event::EnemyEnraged {
                    enemy: EnemyId::new(0),
                    wait_time: Duration::from_millis(1_600),
                },
                tick(1_600),
            ],
            &enemies,
            Some(&player),
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::StepEnemy {
                enemy: EnemyId::new(0),
                direction: Direction::West,
            }]
        );
    }

    #[test]
    fn dead_enemies_lose_their_schedule_and_pending_turns() {
        let mut behavior = EnemyBehavior::new(Config::default());
        let mut out = Vec::new();

        behavior.handle(
            &[
                spawned(0, 0, Duration::from_secs(2)),
                Event::PauseChanged { paused: false },
                tick(4_000),
                Event::EnemyDied {
                    enemy: EnemyId::new(0),
                    cell: CellCoord::new(3, 0),
                },
            ],
            &EnemyView::default(),
            None,
            &mut out,
        );

        assert!(out.is_empty());
        assert_eq!(behavior.tracked(), 0);
    }

    #[test]
    fn chase_prefers_the_horizontal_axis() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(
            chase_direction(origin, CellCoord::new(5, 0)),
            Some(Direction::East)
        );
        assert_eq!(
            chase_direction(origin, CellCoord::new(2, 0)),
            Some(Direction::South)
        );
        assert_eq!(
            chase_direction(origin, CellCoord::new(2, 6)),
            Some(Direction::North)
        );
    }
}
