//! Slow-falling barrels that break open into a power-up

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::render::{RenderStyle, Shape, colors};
use crate::sim::entity::{Body, DespawnReason, Entity, EntityKind, Playfield, Transform};
use crate::sim::kinds::{Owner, PowerUpKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrel {
    /// Power-up released on destruction, rolled at spawn
    pub contents: PowerUpKind,
}

/// Spawn a barrel with pre-rolled contents
pub fn spawn(pos: Vec2, rng: &mut impl Rng) -> Entity {
    spawn_with(pos, PowerUpKind::roll(rng))
}

/// Spawn a barrel holding a specific power-up
pub fn spawn_with(pos: Vec2, contents: PowerUpKind) -> Entity {
    let mut entity = Entity::new(
        Body::Barrel(Barrel { contents }),
        pos,
        Vec2::splat(BARREL_SIZE),
        1,
    );
    entity.transform.vel = Vec2::new(0.0, BARREL_FALL_SPEED);
    entity
}

pub fn update(
    _barrel: &mut Barrel,
    t: &mut Transform,
    _dt: f32,
    field: &Playfield,
) -> Option<DespawnReason> {
    if t.below(field) {
        return Some(DespawnReason::Escaped);
    }
    None
}

/// Breaks on player contact or any player-owned projectile. Being shot
/// counts as a kill, the same reason the projectile's damage produces, so
/// the outcome doesn't depend on which callback runs first.
pub fn on_collision(this: &mut Entity, other: &mut Entity) {
    let reason = match other.kind() {
        EntityKind::Player => Some(DespawnReason::Collided),
        EntityKind::Projectile => other
            .as_projectile()
            .filter(|p| p.owner == Owner::Player)
            .map(|_| DespawnReason::Killed),
        _ => None,
    };
    if let Some(reason) = reason {
        this.destroy(reason);
    }
}

pub fn render_style(_barrel: &Barrel) -> RenderStyle {
    RenderStyle::new(Shape::Square, colors::BARREL)
}
