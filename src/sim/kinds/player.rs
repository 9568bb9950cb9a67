//! The player's ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::render::{RenderStyle, Shape, colors};
use crate::sim::Vec2Ext;
use crate::sim::entity::{Body, DespawnReason, Entity, Playfield, Transform};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Movement speed (units/sec)
    pub move_speed: f32,
    /// Seconds between shots
    fire_rate: f32,
    /// Blocks all damage while set
    pub shield_active: bool,
    /// Seconds since the last shot
    pub last_shot: f32,
    /// Remaining post-hit invulnerability (seconds)
    pub invulnerable: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            move_speed: PLAYER_SPEED,
            fire_rate: PLAYER_FIRE_RATE,
            shield_active: false,
            last_shot: PLAYER_FIRE_RATE, // ready to fire immediately
            invulnerable: 0.0,
        }
    }
}

impl Player {
    pub fn fire_rate(&self) -> f32 {
        self.fire_rate
    }

    /// Set seconds between shots, floored at the minimum
    pub fn set_fire_rate(&mut self, seconds: f32) {
        self.fire_rate = seconds.max(PLAYER_MIN_FIRE_RATE);
    }

    /// Cooldown has elapsed
    pub fn can_shoot(&self) -> bool {
        self.last_shot >= self.fire_rate
    }

    /// Restart the cooldown after firing
    pub fn mark_shot(&mut self) {
        self.last_shot = 0.0;
    }

    /// Damage gets through neither the shield nor the invulnerability window
    pub fn vulnerable(&self) -> bool {
        !self.shield_active && self.invulnerable <= 0.0
    }

    pub(crate) fn on_hit(&mut self) {
        self.invulnerable = PLAYER_INVULNERABLE_TIME;
    }

    /// Point velocity along the held movement axis, slowed so the next
    /// `dt` step stops at the playfield edge instead of crossing it
    pub fn steer(&self, transform: &mut Transform, axis: Vec2, dt: f32, field: &Playfield) {
        let vel = axis.normalize_or_zero() * self.move_speed;
        let next = transform.pos + vel * dt;
        let clamped = clamp_to_field(next, transform.size, field);
        transform.vel = if clamped == next {
            vel
        } else {
            // Zero dt moves nothing
            (clamped - transform.pos)
                .checked_div(dt)
                .unwrap_or(Vec2::ZERO)
        };
    }
}

/// Create a fresh player at `pos`
pub fn spawn(pos: Vec2) -> Entity {
    Entity::new(
        Body::Player(Player::default()),
        pos,
        Vec2::splat(PLAYER_SIZE),
        PLAYER_HEALTH,
    )
}

/// Where a (re)spawned player appears
pub fn spawn_point(field: &Playfield) -> Vec2 {
    Vec2::new(field.width / 2.0, field.height - PLAYER_SPAWN_OFFSET)
}

pub fn update(
    player: &mut Player,
    t: &mut Transform,
    dt: f32,
    field: &Playfield,
) -> Option<DespawnReason> {
    player.last_shot += dt;
    player.invulnerable = (player.invulnerable - dt).max(0.0);

    t.pos = clamp_to_field(t.pos, t.size, field);
    None
}

/// Centre position that keeps a box of `size` entirely on screen
pub fn clamp_to_field(pos: Vec2, size: Vec2, field: &Playfield) -> Vec2 {
    let half = size / 2.0;
    Vec2::new(
        pos.x.clamp(half.x, (field.width - half.x).max(half.x)),
        pos.y.clamp(half.y, (field.height - half.y).max(half.y)),
    )
}

/// Blinks while invulnerable; tinted while shielded
pub fn render_style(player: &Player) -> RenderStyle {
    let color = if player.shield_active {
        colors::PLAYER_SHIELDED
    } else {
        colors::PLAYER
    };
    let style = RenderStyle::new(Shape::Triangle, color);
    if player.invulnerable > 0.0 && (player.invulnerable * 10.0) as u32 % 2 == 0 {
        style.faded(0.35)
    } else {
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_rate_floor() {
        let mut p = Player::default();
        p.set_fire_rate(0.01);
        assert_eq!(p.fire_rate(), PLAYER_MIN_FIRE_RATE);
        p.set_fire_rate(0.5);
        assert_eq!(p.fire_rate(), 0.5);
    }

    #[test]
    fn test_cooldown() {
        let mut p = Player::default();
        assert!(p.can_shoot());
        p.mark_shot();
        assert!(!p.can_shoot());

        let field = Playfield::new(800.0, 600.0);
        let mut t = Transform::new(Vec2::new(400.0, 500.0), Vec2::splat(PLAYER_SIZE));
        update(&mut p, &mut t, 0.2, &field);
        assert!(!p.can_shoot());
        update(&mut p, &mut t, 0.1, &field);
        assert!(p.can_shoot());
    }

    #[test]
    fn test_shield_blocks_damage() {
        let mut e = spawn(Vec2::new(100.0, 100.0));
        e.as_player_mut().unwrap().shield_active = true;
        assert_eq!(e.take_damage(5), 0);
        assert_eq!(e.health(), PLAYER_HEALTH);
    }

    #[test]
    fn test_hit_grants_invulnerability() {
        let mut e = spawn(Vec2::new(100.0, 100.0));
        assert_eq!(e.take_damage(1), 1);
        assert_eq!(e.take_damage(1), 0);
        assert_eq!(e.health(), PLAYER_HEALTH - 1);

        let field = Playfield::new(800.0, 600.0);
        e.update(PLAYER_INVULNERABLE_TIME + 0.01, &field);
        assert_eq!(e.take_damage(1), 1);
    }

    #[test]
    fn test_position_clamped_to_field() {
        let mut p = Player::default();
        let field = Playfield::new(800.0, 600.0);
        let mut t = Transform::new(Vec2::new(-50.0, 900.0), Vec2::splat(PLAYER_SIZE));
        update(&mut p, &mut t, 0.016, &field);
        assert_eq!(t.pos, Vec2::new(PLAYER_SIZE / 2.0, 600.0 - PLAYER_SIZE / 2.0));
    }

    #[test]
    fn test_steer_normalizes_diagonal() {
        let p = Player::default();
        let field = Playfield::new(800.0, 600.0);
        let mut t = Transform::new(Vec2::new(400.0, 300.0), Vec2::splat(PLAYER_SIZE));
        p.steer(&mut t, Vec2::new(1.0, -1.0), 0.016, &field);
        assert!((t.vel.length() - PLAYER_SPEED).abs() < 1e-3);
        p.steer(&mut t, Vec2::ZERO, 0.016, &field);
        assert_eq!(t.vel, Vec2::ZERO);
    }

    #[test]
    fn test_steer_stops_at_wall() {
        let p = Player::default();
        let field = Playfield::new(800.0, 600.0);
        let half = PLAYER_SIZE / 2.0;
        let dt = 1.0 / 30.0;
        let mut t = Transform::new(Vec2::new(half + 2.0, 300.0), Vec2::splat(PLAYER_SIZE));

        p.steer(&mut t, Vec2::new(-1.0, 0.0), dt, &field);
        assert!(t.vel.length() < PLAYER_SPEED);
        t.pos += t.vel * dt;
        assert!((t.pos.x - half).abs() < 1e-3);

        // Held against the wall: no further motion
        p.steer(&mut t, Vec2::new(-1.0, 0.0), dt, &field);
        assert!(t.vel.x.abs() < 1e-2);

        // Zero dt never divides
        p.steer(&mut t, Vec2::new(-1.0, 0.0), 0.0, &field);
        assert!(t.vel.is_finite());
    }
}
