//! Simulation core
//!
//! All gameplay logic lives here and is platform-free:
//! - dt is supplied by the caller (already capped)
//! - randomness comes from the engine's seeded RNG only
//! - no rendering, audio or input capture happens in here; those are sinks
//!   and providers handed in by the caller

pub mod collision;
pub mod effects;
pub mod engine;
pub mod entity;
pub mod geometry;
pub mod kinds;
pub mod level;
pub mod manager;
pub mod particles;
pub mod pool;
pub mod spawner;

pub use collision::{PhysicsSystem, can_collide};
pub use effects::{PowerUpEffect, PowerUpManager};
pub use engine::{GameEngine, GamePhase};
pub use entity::{Body, DespawnReason, Entity, EntityId, EntityKind, Playfield, Transform};
pub use geometry::{Aabb, Vec2Ext};
pub use kinds::{EnemyKind, Owner, PowerUpKind};
pub use level::{LevelConfig, LevelManager};
pub use manager::EntityManager;
pub use particles::ParticleSystem;
pub use pool::Pool;
pub use spawner::{BarrelSpawner, BossSpawner, EnemySpawner};
