//! Enemies: basic, fast, heavy, and the multi-phase boss

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::fan_directions;
use crate::render::{RenderStyle, Shape, colors};
use crate::sim::Vec2Ext;
use crate::sim::entity::{Body, DespawnReason, Entity, EntityKind, Playfield, Transform};
use crate::sim::level::LevelConfig;

/// Horizontal weave frequency for fast enemies (radians/sec)
const WEAVE_FREQUENCY: f32 = 3.0;
/// Horizontal weave speed as a fraction of forward speed
const WEAVE_AMPLITUDE: f32 = 0.6;

/// Boss tuning
const BOSS_STATION_Y: f32 = 110.0;
const BOSS_RETREAT_RISE: f32 = 60.0;
const BOSS_ATTACK_TIME: f32 = 6.0;
const BOSS_RETREAT_TIME: f32 = 2.0;
const BOSS_FIRE_INTERVAL: f32 = 1.5;
const BOSS_SHOT_COUNT: u32 = 3;
const BOSS_SHOT_SPREAD: f32 = 0.6;
/// Close enough to the station to start attacking
const BOSS_ARRIVE_DISTANCE: f32 = 4.0;
/// Bonus points per point of damage the boss absorbed
pub const BOSS_POINTS_PER_DAMAGE: u64 = 20;

/// Enemy subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Heavy,
    Boss,
}

/// Base numbers for a subtype, before level multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub size: Vec2,
    pub health: i32,
    pub speed: f32,
    pub points: u64,
    pub contact_damage: i32,
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                size: Vec2::new(30.0, 30.0),
                health: 1,
                speed: 80.0,
                points: 100,
                contact_damage: 1,
            },
            EnemyKind::Fast => EnemyStats {
                size: Vec2::new(24.0, 24.0),
                health: 1,
                speed: 150.0,
                points: 150,
                contact_damage: 1,
            },
            EnemyKind::Heavy => EnemyStats {
                size: Vec2::new(40.0, 40.0),
                health: 3,
                speed: 50.0,
                points: 250,
                contact_damage: 2,
            },
            EnemyKind::Boss => EnemyStats {
                size: Vec2::new(120.0, 80.0),
                health: 40,
                speed: 60.0,
                points: 2000,
                contact_damage: 3,
            },
        }
    }
}

/// Boss behaviour phases; Attacking and Retreating alternate forever
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Entering,
    Attacking,
    Retreating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossBrain {
    pub phase: BossPhase,
    /// Seconds spent in the current phase
    pub phase_timer: f32,
    fire_timer: f32,
    /// Where the boss settles after entering
    pub station: Vec2,
    /// +1 sweeping right, -1 sweeping left
    sweep: f32,
    /// Shot directions waiting for the engine to turn into projectiles
    pending_shots: Vec<Vec2>,
}

impl BossBrain {
    fn new(station: Vec2) -> Self {
        Self {
            phase: BossPhase::Entering,
            phase_timer: 0.0,
            fire_timer: 0.0,
            station,
            sweep: 1.0,
            pending_shots: Vec::new(),
        }
    }

    fn enter(&mut self, phase: BossPhase) {
        log::debug!("Boss {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_timer = 0.0;
        self.fire_timer = 0.0;
    }

    fn update(&mut self, t: &mut Transform, speed: f32, dt: f32, field: &Playfield) {
        self.phase_timer += dt;
        match self.phase {
            BossPhase::Entering => {
                let to_station = self.station - t.pos;
                let dist = to_station.length();
                match to_station.checked_div(dist) {
                    Ok(dir) if dist > BOSS_ARRIVE_DISTANCE.max(speed * dt) => {
                        t.vel = dir * speed;
                    }
                    // Close enough, or sitting exactly on the station
                    _ => {
                        t.pos = self.station;
                        t.vel = Vec2::ZERO;
                        self.sweep = if t.pos.x < field.width / 2.0 { 1.0 } else { -1.0 };
                        self.enter(BossPhase::Attacking);
                    }
                }
            }
            BossPhase::Attacking => {
                let half = t.size.x / 2.0;
                if t.pos.x - half <= 0.0 {
                    self.sweep = 1.0;
                } else if t.pos.x + half >= field.width {
                    self.sweep = -1.0;
                }
                // Drift back down to the station line after a retreat
                let dy = (self.station.y - t.pos.y).clamp(-speed * 0.5, speed * 0.5);
                t.vel = Vec2::new(self.sweep * speed, dy);

                self.fire_timer += dt;
                if self.fire_timer >= BOSS_FIRE_INTERVAL {
                    self.fire_timer = 0.0;
                    self.pending_shots.extend(
                        fan_directions(BOSS_SHOT_COUNT, BOSS_SHOT_SPREAD)
                            .into_iter()
                            .map(|d| -d),
                    );
                }

                if self.phase_timer >= BOSS_ATTACK_TIME {
                    self.enter(BossPhase::Retreating);
                }
            }
            BossPhase::Retreating => {
                let ceiling = self.station.y - BOSS_RETREAT_RISE;
                t.vel = if t.pos.y > ceiling {
                    Vec2::new(0.0, -speed * 0.5)
                } else {
                    Vec2::ZERO
                };
                if self.phase_timer >= BOSS_RETREAT_TIME {
                    self.enter(BossPhase::Attacking);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Forward speed after level scaling
    pub speed: f32,
    pub points: u64,
    pub contact_damage: i32,
    /// Seconds alive
    pub age: f32,
    /// Total damage absorbed
    pub damage_taken: i32,
    pub boss: Option<BossBrain>,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    pub(crate) fn record_damage(&mut self, amount: i32) {
        self.damage_taken += amount;
    }

    /// Points awarded when this enemy is killed
    pub fn kill_points(&self) -> u64 {
        if self.is_boss() {
            self.points + BOSS_POINTS_PER_DAMAGE * self.damage_taken.max(0) as u64
        } else {
            self.points
        }
    }

    /// Take the shots the boss has queued since the last call
    pub fn drain_shots(&mut self) -> Vec<Vec2> {
        self.boss
            .as_mut()
            .map(|b| std::mem::take(&mut b.pending_shots))
            .unwrap_or_default()
    }

    pub fn boss_phase(&self) -> Option<BossPhase> {
        self.boss.as_ref().map(|b| b.phase)
    }
}

/// Build an enemy of `kind` at `pos`, scaled once by the level multipliers
pub fn spawn(kind: EnemyKind, pos: Vec2, level: &LevelConfig) -> Entity {
    let stats = kind.stats();
    let health = (stats.health as f32 * level.health_multiplier).round().max(1.0) as i32;
    let enemy = Enemy {
        kind,
        speed: stats.speed * level.speed_multiplier,
        points: stats.points,
        contact_damage: stats.contact_damage,
        age: 0.0,
        damage_taken: 0,
        boss: None,
    };
    let mut entity = Entity::new(Body::Enemy(enemy), pos, stats.size, health);
    if kind != EnemyKind::Boss {
        entity.transform.vel = Vec2::new(0.0, entity.as_enemy().map_or(0.0, |e| e.speed));
    }
    entity
}

/// Build a boss entering from `pos` toward its station near the top
pub fn spawn_boss(pos: Vec2, field: &Playfield, level: &LevelConfig) -> Entity {
    let mut entity = spawn(EnemyKind::Boss, pos, level);
    let station = Vec2::new(field.width / 2.0, BOSS_STATION_Y);
    if let Some(enemy) = entity.as_enemy_mut() {
        enemy.boss = Some(BossBrain::new(station));
    }
    entity
}

pub fn update(
    enemy: &mut Enemy,
    t: &mut Transform,
    dt: f32,
    field: &Playfield,
) -> Option<DespawnReason> {
    enemy.age += dt;
    match enemy.kind {
        EnemyKind::Basic | EnemyKind::Heavy => {
            t.vel = Vec2::new(0.0, enemy.speed);
        }
        EnemyKind::Fast => {
            let weave = (enemy.age * WEAVE_FREQUENCY).cos() * enemy.speed * WEAVE_AMPLITUDE;
            t.vel = Vec2::new(weave, enemy.speed);
        }
        EnemyKind::Boss => {
            if let Some(brain) = enemy.boss.as_mut() {
                brain.update(t, enemy.speed, dt, field);
            }
            return None;
        }
    }

    if t.below(field) {
        return Some(DespawnReason::Escaped);
    }
    None
}

/// Contact with the player hurts the player; regular enemies die on impact
pub fn on_collision(this: &mut Entity, other: &mut Entity) {
    let Some(enemy) = this.as_enemy() else { return };
    if other.kind() != EntityKind::Player {
        return;
    }
    let damage = enemy.contact_damage;
    let boss = enemy.is_boss();

    other.take_damage(damage);
    if !boss {
        this.destroy(DespawnReason::Collided);
    }
}

pub fn render_style(enemy: &Enemy) -> RenderStyle {
    match enemy.kind {
        EnemyKind::Basic => RenderStyle::new(Shape::Square, colors::ENEMY_BASIC),
        EnemyKind::Fast => RenderStyle::new(Shape::Diamond, colors::ENEMY_FAST),
        EnemyKind::Heavy => RenderStyle::new(Shape::Hexagon, colors::ENEMY_HEAVY),
        EnemyKind::Boss => {
            let style = RenderStyle::new(Shape::Hexagon, colors::BOSS);
            match enemy.boss_phase() {
                Some(BossPhase::Retreating) => style.faded(0.7),
                _ => style,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::kinds::player;

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    #[test]
    fn test_level_multipliers_applied_at_spawn() {
        let level = LevelConfig {
            level: 5,
            spawn_rate: 1.0,
            speed_multiplier: 2.0,
            health_multiplier: 1.5,
            special_chance: 0.0,
        };
        let e = spawn(EnemyKind::Heavy, Vec2::new(100.0, 0.0), &level);
        let stats = EnemyKind::Heavy.stats();
        assert_eq!(e.max_health(), 5); // 3 * 1.5 = 4.5, rounded
        assert_eq!(e.as_enemy().unwrap().speed, stats.speed * 2.0);
        assert_eq!(e.transform.size, stats.size);
    }

    #[test]
    fn test_escape_past_bottom() {
        let mut e = spawn(EnemyKind::Basic, Vec2::new(100.0, 640.0), &LevelConfig::BASE);
        e.update(0.016, &field());
        assert!(!e.is_active());
        assert_eq!(e.despawn_reason(), Some(DespawnReason::Escaped));
    }

    #[test]
    fn test_fast_enemy_weaves() {
        let mut e = spawn(EnemyKind::Fast, Vec2::new(100.0, 100.0), &LevelConfig::BASE);
        e.update(0.1, &field());
        assert!(e.transform.vel.x.abs() > 0.0);
        assert!(e.transform.vel.y > 0.0);
    }

    #[test]
    fn test_contact_kills_regular_enemy_and_hurts_player() {
        let mut enemy = spawn(EnemyKind::Heavy, Vec2::new(100.0, 100.0), &LevelConfig::BASE);
        let mut p = player::spawn(Vec2::new(100.0, 100.0));
        enemy.on_collision(&mut p);
        assert!(!enemy.is_active());
        assert_eq!(enemy.despawn_reason(), Some(DespawnReason::Collided));
        assert_eq!(p.health(), crate::consts::PLAYER_HEALTH - 2);
    }

    #[test]
    fn test_boss_survives_contact() {
        let mut boss = spawn_boss(Vec2::new(-60.0, 110.0), &field(), &LevelConfig::BASE);
        let mut p = player::spawn(Vec2::new(100.0, 100.0));
        boss.on_collision(&mut p);
        assert!(boss.is_active());
        assert!(p.health() < crate::consts::PLAYER_HEALTH);
    }

    #[test]
    fn test_boss_phase_cycle() {
        let f = field();
        let mut boss = spawn_boss(Vec2::new(-60.0, 110.0), &f, &LevelConfig::BASE);
        assert_eq!(boss.as_enemy().unwrap().boss_phase(), Some(BossPhase::Entering));

        // Glide in: the engine's physics pass integrates position
        for _ in 0..1000 {
            boss.update(0.05, &f);
            boss.transform.pos += boss.transform.vel * 0.05;
            if boss.as_enemy().unwrap().boss_phase() == Some(BossPhase::Attacking) {
                break;
            }
        }
        assert_eq!(boss.as_enemy().unwrap().boss_phase(), Some(BossPhase::Attacking));

        let mut shots = 0;
        let mut t = 0.0;
        while t < BOSS_ATTACK_TIME + 0.1 {
            boss.update(0.05, &f);
            boss.transform.pos += boss.transform.vel * 0.05;
            shots += boss.as_enemy_mut().unwrap().drain_shots().len();
            t += 0.05;
        }
        assert_eq!(boss.as_enemy().unwrap().boss_phase(), Some(BossPhase::Retreating));
        assert!(shots >= BOSS_SHOT_COUNT as usize);

        for _ in 0..((BOSS_RETREAT_TIME / 0.05) as usize + 2) {
            boss.update(0.05, &f);
        }
        assert_eq!(boss.as_enemy().unwrap().boss_phase(), Some(BossPhase::Attacking));
        assert!(boss.is_active());
    }

    #[test]
    fn test_boss_on_station_arrives_with_zero_dt() {
        let f = field();
        let mut boss = spawn_boss(Vec2::new(400.0, BOSS_STATION_Y), &f, &LevelConfig::BASE);
        boss.update(0.0, &f);
        assert_eq!(boss.as_enemy().unwrap().boss_phase(), Some(BossPhase::Attacking));
        assert!(boss.transform.vel.is_finite());
    }

    #[test]
    fn test_boss_shots_point_down() {
        let f = field();
        let mut boss = spawn_boss(Vec2::new(400.0, 110.0), &f, &LevelConfig::BASE);
        boss.update(0.01, &f); // arrives immediately
        boss.update(BOSS_FIRE_INTERVAL, &f);
        let shots = boss.as_enemy_mut().unwrap().drain_shots();
        assert_eq!(shots.len(), BOSS_SHOT_COUNT as usize);
        assert!(shots.iter().all(|d| d.y > 0.0));
        assert!(boss.as_enemy_mut().unwrap().drain_shots().is_empty());
    }

    #[test]
    fn test_boss_points_scale_with_damage() {
        let mut boss = spawn_boss(Vec2::new(400.0, 110.0), &field(), &LevelConfig::BASE);
        boss.take_damage(10);
        let enemy = boss.as_enemy().unwrap();
        assert_eq!(enemy.damage_taken, 10);
        assert_eq!(
            enemy.kill_points(),
            EnemyKind::Boss.stats().points + 10 * BOSS_POINTS_PER_DAMAGE
        );
    }
}
