//! Cosmetic particles. They collide with nothing and only matter to the
//! core as entity-count load.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::render::{RenderStyle, Shape};
use crate::sim::entity::{Body, DespawnReason, Entity, Playfield, Transform};

/// Fraction of velocity kept per second
const DAMPING_PER_SEC: f32 = 0.2;
/// Fraction of size kept per second
const SHRINK_PER_SEC: f32 = 0.35;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub color: [f32; 4],
}

impl Particle {
    /// Remaining life in 0..=1, for fading
    pub fn life_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

pub fn body(life: f32, color: [f32; 4]) -> Body {
    Body::Particle(Particle {
        life,
        max_life: life,
        color,
    })
}

/// Reuse a spent particle entity, refilling its body in place
pub fn respawn(entity: &mut Entity, pos: Vec2, vel: Vec2, size: f32, life: f32, color: [f32; 4]) {
    entity.rearm(pos, Vec2::splat(size), 1);
    entity.transform.vel = vel;
    match &mut entity.body {
        Body::Particle(p) => {
            p.life = life;
            p.max_life = life;
            p.color = color;
        }
        other => *other = body(life, color),
    }
}

pub fn spawn(pos: Vec2, vel: Vec2, size: f32, life: f32, color: [f32; 4]) -> Entity {
    let mut entity = Entity::new(body(life, color), pos, Vec2::splat(size), 1);
    entity.transform.vel = vel;
    entity
}

pub fn update(
    particle: &mut Particle,
    t: &mut Transform,
    dt: f32,
    _field: &Playfield,
) -> Option<DespawnReason> {
    particle.life -= dt;
    if particle.life <= 0.0 {
        return Some(DespawnReason::Expired);
    }
    t.vel *= DAMPING_PER_SEC.powf(dt);
    t.size *= SHRINK_PER_SEC.powf(dt);
    None
}

pub fn render_style(particle: &Particle) -> RenderStyle {
    RenderStyle::new(Shape::Circle, particle.color).faded(particle.life_fraction())
}
