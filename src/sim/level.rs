//! Difficulty curve and level-advance policy
//!
//! Levels 1-10 come from a hand-tuned table. Past that, multipliers grow
//! geometrically from the last tuned row and saturate at hard caps.

use serde::{Deserialize, Serialize};

use crate::consts::{LEVEL_BONUS_PER_LEVEL, LEVEL_DURATION};

/// Hard caps for generated levels
pub const MAX_SPAWN_RATE: f32 = 8.0;
pub const MAX_SPEED_MULTIPLIER: f32 = 4.0;
pub const MAX_HEALTH_MULTIPLIER: f32 = 10.0;
/// Growth per level past the tuned table
pub const LEVEL_GROWTH: f32 = 1.1;
/// Special chance added per level past the tuned table
const SPECIAL_CHANCE_STEP: f32 = 0.05;

/// Barrel cadence
const BARREL_BASE_RATE: f32 = 0.12;
const BARREL_RATE_PER_LEVEL: f32 = 0.01;
const BARREL_MAX_RATE: f32 = 0.3;

/// Kills required for level 1 and per additional level
const BASE_KILLS: u32 = 10;
const KILLS_PER_LEVEL: u32 = 5;

/// Difficulty parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level: u32,
    /// Enemies per second
    pub spawn_rate: f32,
    pub speed_multiplier: f32,
    pub health_multiplier: f32,
    /// Probability that a spawned enemy is fast or heavy instead of basic
    pub special_chance: f32,
}

const fn row(level: u32, spawn_rate: f32, speed: f32, health: f32, special: f32) -> LevelConfig {
    LevelConfig {
        level,
        spawn_rate,
        speed_multiplier: speed,
        health_multiplier: health,
        special_chance: special,
    }
}

/// Tuned difficulty for the first levels
const TUNED: [LevelConfig; 10] = [
    row(1, 0.8, 1.0, 1.0, 0.0),
    row(2, 1.0, 1.1, 1.0, 0.1),
    row(3, 1.2, 1.2, 1.2, 0.15),
    row(4, 1.4, 1.3, 1.3, 0.2),
    row(5, 1.6, 1.4, 1.5, 0.25),
    row(6, 1.8, 1.5, 1.7, 0.3),
    row(7, 2.0, 1.6, 1.9, 0.35),
    row(8, 2.3, 1.7, 2.1, 0.4),
    row(9, 2.6, 1.85, 2.4, 0.45),
    row(10, 3.0, 2.0, 2.7, 0.5),
];

impl LevelConfig {
    /// Level 1
    pub const BASE: LevelConfig = TUNED[0];
}

/// Stateless difficulty lookups
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelManager;

impl LevelManager {
    /// Number of hand-tuned levels
    pub const TUNED_LEVELS: u32 = TUNED.len() as u32;

    pub fn new() -> Self {
        Self
    }

    /// Difficulty for `level` (levels below 1 are treated as 1)
    pub fn level_config(&self, level: u32) -> LevelConfig {
        let level = level.max(1);
        if level <= Self::TUNED_LEVELS {
            return TUNED[(level - 1) as usize];
        }

        let last = TUNED[TUNED.len() - 1];
        let beyond = level - Self::TUNED_LEVELS;
        let growth = LEVEL_GROWTH.powi(beyond as i32);
        LevelConfig {
            level,
            spawn_rate: (last.spawn_rate * growth).min(MAX_SPAWN_RATE),
            speed_multiplier: (last.speed_multiplier * growth).min(MAX_SPEED_MULTIPLIER),
            health_multiplier: (last.health_multiplier * growth).min(MAX_HEALTH_MULTIPLIER),
            special_chance: (last.special_chance + SPECIAL_CHANCE_STEP * beyond as f32).min(1.0),
        }
    }

    /// Barrels per second at `level`
    pub fn barrel_spawn_rate(&self, level: u32) -> f32 {
        (BARREL_BASE_RATE + BARREL_RATE_PER_LEVEL * level.max(1) as f32).min(BARREL_MAX_RATE)
    }

    /// Kills needed to clear `level` early
    pub fn required_kills(&self, level: u32) -> u32 {
        BASE_KILLS + KILLS_PER_LEVEL * level
    }

    /// Advance when the level timer runs out or enough kills are in
    pub fn should_advance(&self, level: u32, time_elapsed: f32, kills: u32) -> bool {
        time_elapsed >= LEVEL_DURATION || kills >= self.required_kills(level)
    }

    /// Progress toward the next level in 0..=1 (UI only)
    pub fn level_progress(&self, level: u32, time_elapsed: f32, kills: u32) -> f32 {
        let by_time = time_elapsed / LEVEL_DURATION;
        let by_kills = kills as f32 / self.required_kills(level) as f32;
        by_time.max(by_kills).clamp(0.0, 1.0)
    }

    /// Bonus for reaching `new_level`
    pub fn completion_bonus(&self, new_level: u32) -> u64 {
        LEVEL_BONUS_PER_LEVEL * new_level as u64
    }
}
