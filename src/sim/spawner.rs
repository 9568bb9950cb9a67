//! Time-accumulator spawners for enemies, barrels and the boss
//!
//! Each spawner accumulates frame time and fires once the accumulator
//! reaches the interval for the current level. Firing resets the
//! accumulator to zero instead of subtracting the interval, so a long frame
//! can never produce a burst of catch-up spawns.

use glam::Vec2;
use rand::Rng;

use super::entity::{EntityId, EntityKind, Playfield};
use super::kinds::{EnemyKind, barrel, enemy};
use super::level::{LevelConfig, LevelManager};
use super::manager::EntityManager;
use crate::consts::*;

/// Shared accumulator logic
#[derive(Debug, Clone, Copy, Default)]
pub struct Cadence {
    accumulator: f32,
}

impl Cadence {
    /// Add `dt`; true (and reset) once `interval` has been reached
    pub fn tick(&mut self, dt: f32, interval: f32) -> bool {
        self.accumulator += dt;
        if self.accumulator >= interval {
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }

    /// Fire at `rate` events per second; a non-positive rate never fires
    pub fn tick_rate(&mut self, dt: f32, rate: f32) -> bool {
        if rate <= 0.0 {
            self.accumulator += dt;
            return false;
        }
        self.tick(dt, 1.0 / rate)
    }

    pub fn elapsed(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Random x along the top edge that keeps `width` clear of the side margins
fn spawn_x(field: &Playfield, width: f32, rng: &mut impl Rng) -> f32 {
    let margin = SPAWN_SIDE_MARGIN + width / 2.0;
    if field.width <= margin * 2.0 {
        return field.width / 2.0;
    }
    rng.random_range(margin..field.width - margin)
}

/// Share of special enemies that come out fast (the rest are heavy)
fn fast_share(level: u32) -> f32 {
    match level {
        0..=4 => 0.7,
        5..=9 => 0.5,
        _ => 0.4,
    }
}

/// Pick basic / fast / heavy from the level's special-enemy chance
pub fn pick_enemy_kind(config: &LevelConfig, rng: &mut impl Rng) -> EnemyKind {
    if rng.random::<f32>() >= config.special_chance {
        return EnemyKind::Basic;
    }
    if rng.random::<f32>() < fast_share(config.level) {
        EnemyKind::Fast
    } else {
        EnemyKind::Heavy
    }
}

#[derive(Debug, Default)]
pub struct EnemySpawner {
    cadence: Cadence,
}

impl EnemySpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        dt: f32,
        manager: &mut EntityManager,
        levels: &LevelManager,
        level: u32,
        field: &Playfield,
        rng: &mut impl Rng,
    ) -> Option<EntityId> {
        let config = levels.level_config(level);
        if !self.cadence.tick_rate(dt, config.spawn_rate) {
            return None;
        }
        let kind = pick_enemy_kind(&config, rng);
        let size = kind.stats().size;
        let pos = Vec2::new(spawn_x(field, size.x, rng), -size.y / 2.0);
        log::debug!("Spawning {:?} enemy at x={:.0}", kind, pos.x);
        Some(manager.add(enemy::spawn(kind, pos, &config)))
    }

    pub fn reset(&mut self) {
        self.cadence.reset();
    }
}

#[derive(Debug, Default)]
pub struct BarrelSpawner {
    cadence: Cadence,
}

impl BarrelSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        dt: f32,
        manager: &mut EntityManager,
        levels: &LevelManager,
        level: u32,
        field: &Playfield,
        rng: &mut impl Rng,
    ) -> Option<EntityId> {
        if !self.cadence.tick_rate(dt, levels.barrel_spawn_rate(level)) {
            return None;
        }
        let pos = Vec2::new(spawn_x(field, BARREL_SIZE, rng), -BARREL_SIZE / 2.0);
        let entity = barrel::spawn(pos, rng);
        if let Some(b) = entity.as_barrel() {
            log::debug!("Spawning barrel ({:?}) at x={:.0}", b.contents, pos.x);
        }
        Some(manager.add(entity))
    }

    pub fn reset(&mut self) {
        self.cadence.reset();
    }
}

/// Fires on a fixed interval from level 3 on, at most one boss alive
#[derive(Debug, Default)]
pub struct BossSpawner {
    cadence: Cadence,
}

impl BossSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        dt: f32,
        manager: &mut EntityManager,
        levels: &LevelManager,
        level: u32,
        field: &Playfield,
        rng: &mut impl Rng,
    ) -> Option<EntityId> {
        if level < BOSS_MIN_LEVEL {
            return None;
        }
        if boss_alive(manager) {
            return None;
        }
        if !self.cadence.tick(dt, BOSS_SPAWN_INTERVAL) {
            return None;
        }

        let half = EnemyKind::Boss.stats().size.x / 2.0;
        let x = if rng.random_bool(0.5) {
            -half
        } else {
            field.width + half
        };
        let pos = Vec2::new(x, EnemyKind::Boss.stats().size.y);
        log::info!("Boss incoming at level {} from x={:.0}", level, x);
        Some(manager.add(enemy::spawn_boss(pos, field, &levels.level_config(level))))
    }

    pub fn reset(&mut self) {
        self.cadence.reset();
    }

    /// Seconds accumulated toward the next boss
    pub fn elapsed(&self) -> f32 {
        self.cadence.elapsed()
    }
}

/// An active boss is already on the field
fn boss_alive(manager: &EntityManager) -> bool {
    manager
        .by_kind(EntityKind::Enemy)
        .any(|e| e.is_active() && e.is_boss())
}
