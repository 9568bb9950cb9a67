//! The entity record shared by every simulated object
//!
//! An entity is one flat record (identity, transform, health, active flag)
//! plus a closed `Body` enum carrying the kind-specific payload. Per-kind
//! behaviour lives in `super::kinds` and is dispatched with exhaustive
//! matches, so adding a kind forces every update/collision/spawn site to
//! handle it.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use crate::render::RenderStyle;
use super::kinds::{Barrel, Enemy, Particle, Pickup, Player, Projectile};
use super::kinds::{barrel, enemy, particle, pickup, player, projectile};

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque unique entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Closed set of entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
    Barrel,
    PowerUp,
    Particle,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Player,
        EntityKind::Enemy,
        EntityKind::Projectile,
        EntityKind::Barrel,
        EntityKind::PowerUp,
        EntityKind::Particle,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Dense index for per-kind tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Why an entity left play. Ordered by priority: when an entity is
/// destroyed twice in one frame the higher reason wins, so the result
/// doesn't depend on which collision callback ran first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DespawnReason {
    /// Drifted far outside the playfield, or cleared by a respawn
    Culled,
    /// Lifetime ran out, or a projectile left the playfield
    Expired,
    /// Crossed the bottom edge
    Escaped,
    /// Picked up by the player
    Collected,
    /// Self-destructed on contact
    Collided,
    /// Health reached zero
    Killed,
}

/// Playfield dimensions; origin is the top-left corner, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::playfield(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Position, velocity and size; size spans the bounding box centred on pos
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Transform {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    /// Top edge has passed the bottom of the playfield
    #[inline]
    pub fn below(&self, field: &Playfield) -> bool {
        self.pos.y - self.size.y / 2.0 > field.height
    }
}

/// Kind-specific payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Body {
    Player(Player),
    Enemy(Enemy),
    Projectile(Projectile),
    Barrel(Barrel),
    PowerUp(Pickup),
    Particle(Particle),
}

impl Body {
    pub fn kind(&self) -> EntityKind {
        match self {
            Body::Player(_) => EntityKind::Player,
            Body::Enemy(_) => EntityKind::Enemy,
            Body::Projectile(_) => EntityKind::Projectile,
            Body::Barrel(_) => EntityKind::Barrel,
            Body::PowerUp(_) => EntityKind::PowerUp,
            Body::Particle(_) => EntityKind::Particle,
        }
    }
}

/// A simulated object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    pub transform: Transform,
    health: i32,
    max_health: i32,
    active: bool,
    despawn: Option<DespawnReason>,
    /// Set once the engine has turned this entity's despawn into an outcome
    #[serde(skip)]
    pub(crate) resolved: bool,
    pub body: Body,
}

impl Entity {
    pub fn new(body: Body, pos: Vec2, size: Vec2, health: i32) -> Self {
        let health = health.max(1);
        Self {
            id: EntityId::next(),
            transform: Transform::new(pos, size),
            health,
            max_health: health,
            active: true,
            despawn: None,
            resolved: false,
            body,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.body.kind()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.transform.pos
    }

    pub fn despawn_reason(&self) -> Option<DespawnReason> {
        self.despawn
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.transform.bounds()
    }

    /// Take the entity out of play. Inactive is final; calling again can
    /// only raise the recorded reason.
    pub fn destroy(&mut self, reason: DespawnReason) {
        self.active = false;
        self.health = 0;
        self.despawn = Some(self.despawn.map_or(reason, |r| r.max(reason)));
    }

    /// Apply damage. Returns the amount actually dealt.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if !self.active || amount <= 0 {
            return 0;
        }
        match &mut self.body {
            Body::Player(p) => {
                if !p.vulnerable() {
                    return 0;
                }
                p.on_hit();
            }
            Body::Enemy(e) => e.record_damage(amount.min(self.health)),
            _ => {}
        }

        let dealt = amount.min(self.health);
        self.health -= dealt;
        if self.health <= 0 {
            self.destroy(DespawnReason::Killed);
        }
        dealt
    }

    /// Restore health up to the maximum
    pub fn heal(&mut self, amount: i32) {
        if self.active && amount > 0 {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    /// Per-frame behaviour (timers, movement patterns, lifetime)
    pub fn update(&mut self, dt: f32, field: &Playfield) {
        if !self.active {
            return;
        }
        let t = &mut self.transform;
        let outcome = match &mut self.body {
            Body::Player(p) => player::update(p, t, dt, field),
            Body::Enemy(e) => enemy::update(e, t, dt, field),
            Body::Projectile(p) => projectile::update(p, t, dt, field),
            Body::Barrel(b) => barrel::update(b, t, dt, field),
            Body::PowerUp(p) => pickup::update(p, t, dt, field),
            Body::Particle(p) => particle::update(p, t, dt, field),
        };
        if let Some(reason) = outcome {
            self.destroy(reason);
        }
    }

    /// React to an overlap with `other`. Handlers decide only from kinds and
    /// their own payload, never from whether `other` is about to die.
    pub fn on_collision(&mut self, other: &mut Entity) {
        match self.kind() {
            EntityKind::Player => {}
            EntityKind::Enemy => enemy::on_collision(self, other),
            EntityKind::Projectile => projectile::on_collision(self, other),
            EntityKind::Barrel => barrel::on_collision(self, other),
            EntityKind::PowerUp => pickup::on_collision(self, other),
            EntityKind::Particle => {}
        }
    }

    /// Cosmetic look for this frame
    pub fn render_style(&self) -> RenderStyle {
        match &self.body {
            Body::Player(p) => player::render_style(p),
            Body::Enemy(e) => enemy::render_style(e),
            Body::Projectile(p) => projectile::render_style(p),
            Body::Barrel(b) => barrel::render_style(b),
            Body::PowerUp(p) => pickup::render_style(p),
            Body::Particle(p) => particle::render_style(p),
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.body {
            Body::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.body {
            Body::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.body {
            Body::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match &mut self.body {
            Body::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.body {
            Body::Projectile(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_barrel(&self) -> Option<&Barrel> {
        match &self.body {
            Body::Barrel(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_pickup(&self) -> Option<&Pickup> {
        match &self.body {
            Body::PowerUp(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_particle(&self) -> Option<&Particle> {
        match &self.body {
            Body::Particle(p) => Some(p),
            _ => None,
        }
    }

    /// Enemy in boss form
    pub fn is_boss(&self) -> bool {
        self.as_enemy().is_some_and(|e| e.is_boss())
    }

    /// Bring a spent entity back to life in place for pool reuse. It gets a
    /// fresh id and transform; the body is left for the caller to refill.
    pub(crate) fn rearm(&mut self, pos: Vec2, size: Vec2, health: i32) {
        let health = health.max(1);
        self.id = EntityId::next();
        self.transform = Transform::new(pos, size);
        self.health = health;
        self.max_health = health;
        self.active = true;
        self.despawn = None;
        self.resolved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::kinds::EnemyKind;
    use crate::sim::level::LevelConfig;

    fn enemy_with_health(health: i32) -> Entity {
        let mut e = enemy::spawn(EnemyKind::Basic, Vec2::new(100.0, 100.0), &LevelConfig::BASE);
        e.health = health;
        e.max_health = health;
        e
    }

    #[test]
    fn test_ids_are_unique() {
        let a = EntityId::next();
        let b = EntityId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_two_hits_kill_two_health_enemy() {
        let mut e = enemy_with_health(2);
        assert_eq!(e.take_damage(1), 1);
        assert!(e.is_active());
        assert_eq!(e.health(), 1);

        e.take_damage(1);
        assert!(!e.is_active());
        assert_eq!(e.health(), 0);
        assert_eq!(e.despawn_reason(), Some(DespawnReason::Killed));
    }

    #[test]
    fn test_destroy_is_final_and_zeroes_health() {
        let mut e = enemy_with_health(3);
        e.destroy(DespawnReason::Escaped);
        assert!(!e.is_active());
        assert_eq!(e.health(), 0);

        // No damage, no healing, no update brings it back
        assert_eq!(e.take_damage(1), 0);
        e.heal(5);
        e.update(0.1, &Playfield::new(800.0, 600.0));
        assert!(!e.is_active());
        assert_eq!(e.health(), 0);
    }

    #[test]
    fn test_despawn_reason_keeps_highest() {
        let mut e = enemy_with_health(1);
        e.destroy(DespawnReason::Collided);
        e.destroy(DespawnReason::Culled);
        assert_eq!(e.despawn_reason(), Some(DespawnReason::Collided));
        e.destroy(DespawnReason::Killed);
        assert_eq!(e.despawn_reason(), Some(DespawnReason::Killed));
    }

    #[test]
    fn test_heal_is_capped() {
        let mut e = enemy_with_health(4);
        e.take_damage(3);
        e.heal(10);
        assert_eq!(e.health(), 4);
    }

    #[test]
    fn test_kind_matches_body() {
        let p = player::spawn(Vec2::new(10.0, 10.0));
        assert_eq!(p.kind(), EntityKind::Player);
        assert!(p.as_player().is_some());
        assert!(p.as_enemy().is_none());
    }
}
