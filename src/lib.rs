//! Barrage - a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation core (entities, collisions, spawning, power-ups, engine)
//! - `render`: Render sink trait and a vertex-batch tessellator
//! - `audio`: Fire-and-forget sound cue sinks
//! - `input`: Polled action state with edge detection
//! - `runner`: Frame loop with dt capping and cooperative stop
//! - `settings`: Data-driven configuration

pub mod audio;
pub mod error;
pub mod highscores;
pub mod input;
pub mod render;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::EngineError;
pub use highscores::HighScores;
pub use runner::{GameLoop, StopHandle};
pub use settings::{RevertPolicy, Settings};
pub use sim::{GameEngine, GamePhase};

use glam::Vec2;

use crate::sim::Vec2Ext;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (equivalent of 30 fps)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// Default playfield dimensions
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_HEALTH: i32 = 3;
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Seconds between shots
    pub const PLAYER_FIRE_RATE: f32 = 0.3;
    /// Fire rate can never drop below this
    pub const PLAYER_MIN_FIRE_RATE: f32 = 0.08;
    /// Invulnerability window after a hit or a respawn
    pub const PLAYER_INVULNERABLE_TIME: f32 = 1.0;
    /// Distance of the spawn point above the bottom edge
    pub const PLAYER_SPAWN_OFFSET: f32 = 60.0;
    /// Fire rate multiplier applied on every level advance
    pub const FIRE_RATE_CREEP: f32 = 0.98;
    pub const STARTING_LIVES: u32 = 3;

    /// Projectiles
    pub const PLAYER_PROJECTILE_SPEED: f32 = 500.0;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 250.0;
    pub const PROJECTILE_BASE_DAMAGE: i32 = 1;
    /// Total fan angle for multi-shot (radians, 30 degrees)
    pub const MULTI_SHOT_SPREAD: f32 = std::f32::consts::PI / 6.0;

    /// Enemies crossing the bottom edge deal this much damage to the player
    pub const ESCAPE_DAMAGE: i32 = 1;

    /// Barrels
    pub const BARREL_SIZE: f32 = 36.0;
    pub const BARREL_FALL_SPEED: f32 = 60.0;

    /// Power-up pickups
    pub const PICKUP_SIZE: f32 = 24.0;
    pub const PICKUP_FALL_SPEED: f32 = 40.0;
    pub const PICKUP_LIFETIME: f32 = 8.0;
    pub const PICKUP_RADIUS: f32 = 30.0;

    /// Spawning
    pub const SPAWN_SIDE_MARGIN: f32 = 30.0;
    pub const BOSS_SPAWN_INTERVAL: f32 = 45.0;
    pub const BOSS_MIN_LEVEL: u32 = 3;

    /// Entities further than this outside the playfield are culled
    pub const CULL_MARGIN: f32 = 100.0;
    /// Enemies this close to the respawn point are cleared on respawn
    pub const RESPAWN_CLEAR_RADIUS: f32 = 150.0;

    /// Levels
    pub const LEVEL_DURATION: f32 = 30.0;
    pub const LEVEL_BONUS_PER_LEVEL: u64 = 100;

    /// Particles
    pub const MAX_PARTICLES: usize = 256;
}

/// Unit direction for an angle measured from straight up (screen space, y down)
#[inline]
pub fn direction_from_up(angle: f32) -> Vec2 {
    Vec2::NEG_Y.rotated(angle)
}

/// Evenly spread `count` shot directions across `spread` radians, centred on straight up
pub fn fan_directions(count: u32, spread: f32) -> Vec<Vec2> {
    if count <= 1 {
        return vec![direction_from_up(0.0)];
    }
    let step = spread / (count - 1) as f32;
    (0..count)
        .map(|i| direction_from_up(-spread / 2.0 + step * i as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_up() {
        let up = direction_from_up(0.0);
        assert!((up - Vec2::new(0.0, -1.0)).length() < 1e-6);

        let right = direction_from_up(std::f32::consts::FRAC_PI_2);
        assert!((right - Vec2::new(1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_fan_single_shot_is_straight_up() {
        let dirs = fan_directions(1, consts::MULTI_SHOT_SPREAD);
        assert_eq!(dirs.len(), 1);
        assert!((dirs[0] - Vec2::new(0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_fan_is_symmetric() {
        let dirs = fan_directions(3, consts::MULTI_SHOT_SPREAD);
        assert_eq!(dirs.len(), 3);
        assert!((dirs[1] - Vec2::new(0.0, -1.0)).length() < 1e-6);
        assert!((dirs[0].x + dirs[2].x).abs() < 1e-6);
        assert!((dirs[0].y - dirs[2].y).abs() < 1e-6);

        let total = dirs[0].angle_to(dirs[2]).abs();
        assert!((total - consts::MULTI_SHOT_SPREAD).abs() < 1e-5);
    }
}
