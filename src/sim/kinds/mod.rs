//! Per-kind payloads and behaviour
//!
//! Each module owns one `Body` variant: its payload type, a `spawn`
//! constructor, the per-frame `update`, and (where the kind reacts to
//! contact) an `on_collision` handler.

pub mod barrel;
pub mod enemy;
pub mod particle;
pub mod pickup;
pub mod player;
pub mod projectile;

pub use barrel::Barrel;
pub use enemy::{BossBrain, BossPhase, Enemy, EnemyKind, EnemyStats};
pub use particle::Particle;
pub use pickup::{Pickup, PowerUpConfig, PowerUpKind};
pub use player::Player;
pub use projectile::{Owner, Projectile};
