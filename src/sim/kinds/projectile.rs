//! Single-hit projectiles fired by the player or by the boss

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::render::{RenderStyle, Shape, colors};
use crate::sim::entity::{Body, DespawnReason, Entity, EntityKind, Playfield, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

impl Owner {
    /// Whether a projectile from this owner can hurt an entity of `kind`
    pub fn hits(self, kind: EntityKind) -> bool {
        match self {
            Owner::Player => matches!(kind, EntityKind::Enemy | EntityKind::Barrel),
            Owner::Enemy => kind == EntityKind::Player,
        }
    }

    fn speed(self) -> f32 {
        match self {
            Owner::Player => PLAYER_PROJECTILE_SPEED,
            Owner::Enemy => ENEMY_PROJECTILE_SPEED,
        }
    }

    fn size(self) -> Vec2 {
        match self {
            Owner::Player => Vec2::new(6.0, 14.0),
            Owner::Enemy => Vec2::new(8.0, 8.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: Owner,
    pub damage: i32,
}

/// Fire a projectile from `pos` along `direction`. Velocity is fixed here;
/// a zero direction yields a stationary (but valid) projectile.
pub fn spawn(owner: Owner, pos: Vec2, direction: Vec2, damage: i32) -> Entity {
    let mut entity = Entity::new(
        Body::Projectile(Projectile { owner, damage }),
        pos,
        owner.size(),
        1,
    );
    entity.transform.vel = direction.normalize_or_zero() * owner.speed();
    entity
}

pub fn update(
    _projectile: &mut Projectile,
    t: &mut Transform,
    _dt: f32,
    field: &Playfield,
) -> Option<DespawnReason> {
    let reach = t.size.max_element();
    if !field.bounds().expanded(reach).contains(t.pos) {
        return Some(DespawnReason::Expired);
    }
    None
}

/// Damage the first valid target and disappear
pub fn on_collision(this: &mut Entity, other: &mut Entity) {
    let Some(shot) = this.as_projectile() else { return };
    if !shot.owner.hits(other.kind()) {
        return;
    }
    let damage = shot.damage;
    other.take_damage(damage);
    this.destroy(DespawnReason::Collided);
}

pub fn render_style(projectile: &Projectile) -> RenderStyle {
    match projectile.owner {
        Owner::Player => RenderStyle::new(Shape::Square, colors::PLAYER_SHOT),
        Owner::Enemy => RenderStyle::new(Shape::Circle, colors::ENEMY_SHOT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::kinds::{EnemyKind, enemy, player};
    use crate::sim::level::LevelConfig;

    #[test]
    fn test_velocity_fixed_at_spawn() {
        let p = spawn(Owner::Player, Vec2::new(100.0, 100.0), Vec2::new(0.0, -2.0), 1);
        assert_eq!(p.transform.vel, Vec2::new(0.0, -PLAYER_PROJECTILE_SPEED));
    }

    #[test]
    fn test_zero_direction_is_stationary() {
        let p = spawn(Owner::Enemy, Vec2::new(100.0, 100.0), Vec2::ZERO, 1);
        assert_eq!(p.transform.vel, Vec2::ZERO);
        assert!(p.is_active());
    }

    #[test]
    fn test_expires_outside_field() {
        let field = Playfield::new(800.0, 600.0);
        let mut p = spawn(Owner::Player, Vec2::new(100.0, -40.0), Vec2::NEG_Y, 1);
        p.update(0.016, &field);
        assert_eq!(p.despawn_reason(), Some(DespawnReason::Expired));
    }

    #[test]
    fn test_player_shot_damages_enemy_once() {
        let mut shot = spawn(Owner::Player, Vec2::ZERO, Vec2::NEG_Y, 1);
        let mut e = enemy::spawn(EnemyKind::Heavy, Vec2::ZERO, &LevelConfig::BASE);
        shot.on_collision(&mut e);
        assert!(!shot.is_active());
        assert_eq!(e.health(), e.max_health() - 1);
    }

    #[test]
    fn test_friendly_fire_ignored() {
        let mut shot = spawn(Owner::Player, Vec2::ZERO, Vec2::NEG_Y, 1);
        let mut p = player::spawn(Vec2::ZERO);
        shot.on_collision(&mut p);
        assert!(shot.is_active());
        assert_eq!(p.health(), PLAYER_HEALTH);

        let mut enemy_shot = spawn(Owner::Enemy, Vec2::ZERO, Vec2::Y, 1);
        let mut e = enemy::spawn(EnemyKind::Basic, Vec2::ZERO, &LevelConfig::BASE);
        enemy_shot.on_collision(&mut e);
        assert!(enemy_shot.is_active());
        assert!(e.is_active());
    }

    #[test]
    fn test_enemy_shot_hits_player() {
        let mut shot = spawn(Owner::Enemy, Vec2::ZERO, Vec2::Y, 1);
        let mut p = player::spawn(Vec2::ZERO);
        shot.on_collision(&mut p);
        assert!(!shot.is_active());
        assert_eq!(p.health(), PLAYER_HEALTH - 1);
    }
}
