//! Power-up pickups and the catalogue of power-up kinds

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::render::{RenderStyle, Shape, colors};
use crate::sim::entity::{Body, DespawnReason, Entity, EntityKind, Playfield, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Shorter time between shots
    RapidFire,
    /// Fan of several shots per trigger
    MultiShot,
    /// Blocks all damage
    Shield,
    /// Projectile damage multiplier
    DamageBoost,
    /// Faster movement
    SpeedBoost,
    /// Instant heal
    HealthRestore,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::RapidFire,
        PowerUpKind::MultiShot,
        PowerUpKind::Shield,
        PowerUpKind::DamageBoost,
        PowerUpKind::SpeedBoost,
        PowerUpKind::HealthRestore,
    ];

    /// Relative drop weight for barrel contents
    pub fn weight(self) -> u32 {
        match self {
            PowerUpKind::RapidFire => 25,
            PowerUpKind::MultiShot => 20,
            PowerUpKind::Shield => 15,
            PowerUpKind::DamageBoost => 15,
            PowerUpKind::SpeedBoost => 10,
            PowerUpKind::HealthRestore => 15,
        }
    }

    /// Weighted random pick
    pub fn roll(rng: &mut impl Rng) -> Self {
        let total: u32 = Self::ALL.iter().map(|k| k.weight()).sum();
        let mut roll = rng.random_range(0..total);
        for kind in Self::ALL {
            if roll < kind.weight() {
                return kind;
            }
            roll -= kind.weight();
        }
        PowerUpKind::HealthRestore
    }

    /// Default duration and magnitude for this kind
    pub fn config(self) -> PowerUpConfig {
        let (duration, magnitude) = match self {
            PowerUpKind::RapidFire => (8.0, 0.5),
            PowerUpKind::MultiShot => (10.0, 3.0),
            PowerUpKind::Shield => (8.0, 1.0),
            PowerUpKind::DamageBoost => (10.0, 2.0),
            PowerUpKind::SpeedBoost => (8.0, 1.5),
            PowerUpKind::HealthRestore => (0.0, 1.0),
        };
        PowerUpConfig {
            kind: self,
            duration,
            magnitude,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::MultiShot => "Multi Shot",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::DamageBoost => "Damage Up",
            PowerUpKind::SpeedBoost => "Speed Up",
            PowerUpKind::HealthRestore => "Repair",
        }
    }
}

/// Gameplay parameters of a power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpConfig {
    pub kind: PowerUpKind,
    /// Seconds the effect lasts; 0 means instantaneous
    pub duration: f32,
    /// Kind-specific strength (multiplier, shot count, heal amount)
    pub magnitude: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub config: PowerUpConfig,
    /// Seconds on the field
    pub age: f32,
}

impl Pickup {
    pub fn kind(&self) -> PowerUpKind {
        self.config.kind
    }
}

/// Drop a pickup of `kind` at `pos`
pub fn spawn(kind: PowerUpKind, pos: Vec2) -> Entity {
    let mut entity = Entity::new(
        Body::PowerUp(Pickup {
            config: kind.config(),
            age: 0.0,
        }),
        pos,
        Vec2::splat(PICKUP_SIZE),
        1,
    );
    entity.transform.vel = Vec2::new(0.0, PICKUP_FALL_SPEED);
    entity
}

pub fn update(
    pickup: &mut Pickup,
    t: &mut Transform,
    dt: f32,
    field: &Playfield,
) -> Option<DespawnReason> {
    pickup.age += dt;
    if pickup.age >= PICKUP_LIFETIME {
        return Some(DespawnReason::Expired);
    }
    if t.below(field) {
        return Some(DespawnReason::Escaped);
    }
    None
}

/// Vanish on player contact; the engine applies the effect
pub fn on_collision(this: &mut Entity, other: &mut Entity) {
    if other.kind() == EntityKind::Player {
        this.destroy(DespawnReason::Collected);
    }
}

/// Colored by kind; fades over the last two seconds of its lifetime
pub fn render_style(pickup: &Pickup) -> RenderStyle {
    let color = match pickup.kind() {
        PowerUpKind::RapidFire => colors::RAPID_FIRE,
        PowerUpKind::MultiShot => colors::MULTI_SHOT,
        PowerUpKind::Shield => colors::SHIELD,
        PowerUpKind::DamageBoost => colors::DAMAGE_BOOST,
        PowerUpKind::SpeedBoost => colors::SPEED_BOOST,
        PowerUpKind::HealthRestore => colors::HEALTH_RESTORE,
    };
    let left = PICKUP_LIFETIME - pickup.age;
    RenderStyle::new(Shape::Diamond, color).faded(left / 2.0)
}
