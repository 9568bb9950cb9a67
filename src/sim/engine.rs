//! Top-level game orchestration
//!
//! One `update` call advances exactly one frame. The order of the steps
//! while playing is fixed and observable:
//!
//! 1. phase transitions from this frame's input
//! 2. player shooting and steering
//! 3. spawners
//! 4. entity manager cycle (promote, remove, per-entity update)
//! 5. boss shots and power-up timers
//! 6. culling of entities far outside the playfield
//! 7. physics (integration + collision dispatch)
//! 8. outcome resolution (score, drops, escape damage, pickups)
//! 9. pickup proximity check
//! 10. level advance
//! 11. player death: respawn or game over

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::PhysicsSystem;
use super::effects::{PowerUpEffect, PowerUpManager};
use super::entity::{Body, DespawnReason, Entity, EntityId, EntityKind, Playfield};
use super::kinds::{Owner, PowerUpKind, pickup, player, projectile};
use super::level::LevelManager;
use super::manager::EntityManager;
use super::particles::ParticleSystem;
use super::spawner::{BarrelSpawner, BossSpawner, EnemySpawner};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::error::EngineError;
use crate::fan_directions;
use crate::highscores::HighScores;
use crate::input::{Action, InputState};
use crate::render::{RenderSink, colors};
use crate::settings::Settings;

/// Particles per kill / per broken barrel
const KILL_BURST: usize = 12;
const BOSS_KILL_BURST: usize = 48;
const BARREL_BURST: usize = 8;

/// Current game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for Start
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended; Restart or Menu
    GameOver,
}

/// What a despawn turned into, collected before acting on it
enum Outcome {
    EnemyKilled { points: u64, pos: Vec2, boss: bool },
    EnemyEscaped,
    BarrelBroken { contents: PowerUpKind, pos: Vec2 },
    PickupCollected(PowerUpKind),
}

pub struct GameEngine {
    settings: Settings,
    field: Playfield,
    phase: GamePhase,
    seed: u64,
    rng: Pcg32,

    entities: EntityManager,
    physics: PhysicsSystem,
    levels: LevelManager,
    power_ups: PowerUpManager,
    particles: ParticleSystem,
    enemy_spawner: EnemySpawner,
    barrel_spawner: BarrelSpawner,
    boss_spawner: BossSpawner,

    score: u64,
    lives: u32,
    level: u32,
    /// Seconds spent in the current level
    level_time: f32,
    /// Kills in the current level
    level_kills: u32,
    total_kills: u32,
    /// Seconds of unpaused play this session
    play_time: f32,
    /// Product of every fire-rate creep so far; respawned ships inherit it
    fire_rate_scale: f32,

    high_scores: HighScores,
}

impl GameEngine {
    /// Build an engine sitting at the menu. Fails on an unusable playfield.
    pub fn new(settings: Settings) -> Result<Self, EngineError> {
        let field = validate_playfield(settings.width, settings.height)?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!(
            "Engine ready: {}x{} playfield, seed {}, revert policy {}",
            field.width,
            field.height,
            seed,
            settings.revert_policy.as_str()
        );

        Ok(Self {
            field,
            phase: GamePhase::Menu,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            entities: EntityManager::new(),
            physics: PhysicsSystem::new(),
            levels: LevelManager::new(),
            power_ups: PowerUpManager::new(settings.revert_policy),
            particles: ParticleSystem::new(settings.max_particles),
            enemy_spawner: EnemySpawner::new(),
            barrel_spawner: BarrelSpawner::new(),
            boss_spawner: BossSpawner::new(),
            score: 0,
            lives: settings.starting_lives.max(1),
            level: 1,
            level_time: 0.0,
            level_kills: 0,
            total_kills: 0,
            play_time: 0.0,
            fire_rate_scale: 1.0,
            high_scores: HighScores::new(),
            settings,
        })
    }

    /// Advance one frame. `dt` is clamped to `[0, max_dt]`.
    pub fn update(&mut self, dt: f32, input: &InputState, audio: &mut dyn AudioSink) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.settings.max_dt)
        } else {
            0.0
        };

        self.handle_transitions(input);
        if self.phase != GamePhase::Playing {
            return;
        }

        self.play_time += dt;
        self.level_time += dt;

        self.fire(input, audio);
        self.steer(input, dt);
        self.run_spawners(dt, audio);

        self.entities.update(dt, &self.field);
        self.particles.recycle(self.entities.drain_removed());

        self.fire_boss_shots();
        let ship = self.entities.player_mut().filter(|p| p.is_active());
        for kind in self.power_ups.update(dt, ship) {
            log::debug!("{} wore off", kind.label());
        }

        self.cull();

        let health_before = self.player_health();
        let contacts = self.physics.update(dt, self.entities.all_mut());
        if contacts > 0 {
            log::trace!("{contacts} contacts this frame");
        }
        self.resolve_outcomes(audio);
        self.collect_nearby_pickups(audio);
        if let Some((id, before)) = health_before {
            let hurt = self
                .entities
                .get(id)
                .is_some_and(|ship| ship.health() < before);
            if hurt {
                audio.play(SoundEffect::PlayerDamaged);
            }
        }

        self.advance_level(audio);
        self.check_player(audio);
    }

    /// Draw every active entity. Never mutates gameplay state.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        sink.begin_frame(&self.field);
        for entity in self.entities.all().iter().filter(|e| e.is_active()) {
            sink.draw(entity);
        }
        sink.end_frame();
    }

    /// New playfield dimensions; the player is clamped back in on its next update
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), EngineError> {
        self.field = validate_playfield(width, height)?;
        log::debug!("Playfield resized to {}x{}", width, height);
        Ok(())
    }

    // === Phase handling ===

    fn handle_transitions(&mut self, input: &InputState) {
        let next = match self.phase {
            GamePhase::Menu if input.pressed(Action::Start) => {
                self.start_session();
                GamePhase::Playing
            }
            GamePhase::Playing if input.pressed(Action::Pause) => GamePhase::Paused,
            GamePhase::Paused if input.pressed(Action::Pause) => GamePhase::Playing,
            GamePhase::Paused | GamePhase::GameOver if input.pressed(Action::Menu) => {
                self.clear_field();
                GamePhase::Menu
            }
            GamePhase::GameOver
                if input.pressed(Action::Restart) || input.pressed(Action::Start) =>
            {
                self.start_session();
                GamePhase::Playing
            }
            phase => phase,
        };
        if next != self.phase {
            log::info!("Phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    fn clear_field(&mut self) {
        self.entities.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.enemy_spawner.reset();
        self.barrel_spawner.reset();
        self.boss_spawner.reset();
    }

    fn start_session(&mut self) {
        self.clear_field();
        self.score = 0;
        self.lives = self.settings.starting_lives.max(1);
        self.level = 1;
        self.level_time = 0.0;
        self.level_kills = 0;
        self.total_kills = 0;
        self.play_time = 0.0;
        self.fire_rate_scale = 1.0;
        self.entities.add(player::spawn(player::spawn_point(&self.field)));
        log::info!("New session with {} lives", self.lives);
    }

    // === Player control ===

    fn fire(&mut self, input: &InputState, audio: &mut dyn AudioSink) {
        if !(self.settings.auto_fire || input.held(Action::Shoot)) {
            return;
        }
        let Some(ship) = self.entities.player_mut().filter(|p| p.is_active()) else {
            return;
        };
        let muzzle = ship.pos() - Vec2::new(0.0, ship.transform.size.y / 2.0);
        let Some(p) = ship.as_player_mut() else { return };
        if !p.can_shoot() {
            return;
        }
        p.mark_shot();

        let damage = (PROJECTILE_BASE_DAMAGE as f32 * self.power_ups.damage_multiplier())
            .round()
            .max(1.0) as i32;
        for direction in fan_directions(self.power_ups.multi_shot_count(), MULTI_SHOT_SPREAD) {
            self.entities
                .add(projectile::spawn(Owner::Player, muzzle, direction, damage));
        }
        audio.play(SoundEffect::Shot);
    }

    fn steer(&mut self, input: &InputState, dt: f32) {
        let axis = input.movement();
        let field = self.field;
        if let Some(ship) = self.entities.player_mut() {
            if let Body::Player(p) = &ship.body {
                p.steer(&mut ship.transform, axis, dt, &field);
            }
        }
    }

    fn run_spawners(&mut self, dt: f32, audio: &mut dyn AudioSink) {
        let (entities, levels, field) = (&mut self.entities, &self.levels, &self.field);
        let rng = &mut self.rng;
        self.enemy_spawner.update(dt, entities, levels, self.level, field, rng);
        self.barrel_spawner.update(dt, entities, levels, self.level, field, rng);
        if self
            .boss_spawner
            .update(dt, entities, levels, self.level, field, rng)
            .is_some()
        {
            audio.play(SoundEffect::BossIncoming);
        }
    }

    /// Turn queued boss shots into enemy projectiles
    fn fire_boss_shots(&mut self) {
        let mut volleys = Vec::new();
        for boss in self.entities.by_kind_mut(EntityKind::Enemy) {
            if !boss.is_active() {
                continue;
            }
            let muzzle = boss.pos() + Vec2::new(0.0, boss.transform.size.y / 2.0);
            if let Some(enemy) = boss.as_enemy_mut() {
                let shots = enemy.drain_shots();
                if !shots.is_empty() {
                    volleys.push((muzzle, shots));
                }
            }
        }
        for (muzzle, shots) in volleys {
            for direction in shots {
                self.entities.add(projectile::spawn(
                    Owner::Enemy,
                    muzzle,
                    direction,
                    PROJECTILE_BASE_DAMAGE,
                ));
            }
        }
    }

    /// Deactivate anything that drifted past the cull margin (never the
    /// player or a boss)
    fn cull(&mut self) {
        let keep = self.field.bounds().expanded(CULL_MARGIN);
        for entity in self.entities.all_mut() {
            if entity.is_active()
                && entity.kind() != EntityKind::Player
                && !entity.is_boss()
                && !keep.contains(entity.pos())
            {
                entity.destroy(DespawnReason::Culled);
                entity.resolved = true;
            }
        }
    }

    fn player_health(&self) -> Option<(EntityId, i32)> {
        self.entities
            .player()
            .filter(|p| p.is_active())
            .map(|p| (p.id(), p.health()))
    }

    // === Outcomes ===

    fn resolve_outcomes(&mut self, audio: &mut dyn AudioSink) {
        let mut outcomes = Vec::new();
        for entity in self.entities.all_mut() {
            if entity.is_active() || entity.resolved || entity.kind() == EntityKind::Player {
                continue;
            }
            entity.resolved = true;
            if let Some(outcome) = outcome_of(entity) {
                outcomes.push(outcome);
            }
        }

        for outcome in outcomes {
            match outcome {
                Outcome::EnemyKilled { points, pos, boss } => {
                    self.score += points;
                    self.level_kills += 1;
                    self.total_kills += 1;
                    let burst = if boss { BOSS_KILL_BURST } else { KILL_BURST };
                    self.particles.emit(
                        &mut self.entities,
                        pos,
                        burst,
                        colors::EXPLOSION,
                        &mut self.rng,
                    );
                    if boss {
                        log::info!("Boss destroyed for {} points", points);
                    }
                    audio.play(SoundEffect::EnemyDestroyed);
                }
                Outcome::EnemyEscaped => {
                    if let Some(ship) = self.entities.player_mut() {
                        ship.take_damage(ESCAPE_DAMAGE);
                    }
                }
                Outcome::BarrelBroken { contents, pos } => {
                    log::debug!("Barrel dropped {}", contents.label());
                    self.entities.add(pickup::spawn(contents, pos));
                    self.particles.emit(
                        &mut self.entities,
                        pos,
                        BARREL_BURST,
                        colors::BARREL,
                        &mut self.rng,
                    );
                    audio.play(SoundEffect::BarrelBroken);
                }
                Outcome::PickupCollected(kind) => self.apply_power_up(kind, audio),
            }
        }
    }

    /// Collect any pickup within the pickup radius of the player
    fn collect_nearby_pickups(&mut self, audio: &mut dyn AudioSink) {
        let Some(center) = self
            .entities
            .player()
            .filter(|p| p.is_active())
            .map(|p| p.pos())
        else {
            return;
        };

        let mut collected = Vec::new();
        for item in self.entities.by_kind_mut(EntityKind::PowerUp) {
            if item.is_active() && item.pos().distance(center) < PICKUP_RADIUS {
                item.destroy(DespawnReason::Collected);
                item.resolved = true;
                if let Some(p) = item.as_pickup() {
                    collected.push(p.kind());
                }
            }
        }
        for kind in collected {
            self.apply_power_up(kind, audio);
        }
    }

    fn apply_power_up(&mut self, kind: PowerUpKind, audio: &mut dyn AudioSink) {
        let Some(ship) = self.entities.player_mut().filter(|p| p.is_active()) else {
            return;
        };
        self.power_ups.add_power_up(kind.config(), ship);
        audio.play(SoundEffect::PowerUpCollected);
    }

    fn advance_level(&mut self, audio: &mut dyn AudioSink) {
        if !self
            .levels
            .should_advance(self.level, self.level_time, self.level_kills)
        {
            return;
        }
        self.level += 1;
        let bonus = self.levels.completion_bonus(self.level);
        self.score += bonus;
        self.level_time = 0.0;
        self.level_kills = 0;

        self.fire_rate_scale *= FIRE_RATE_CREEP;
        if let Some(p) = self.entities.player_mut().and_then(|e| e.as_player_mut()) {
            let rate = p.fire_rate() * FIRE_RATE_CREEP;
            p.set_fire_rate(rate);
        }
        self.power_ups.rescale_fire_rate(FIRE_RATE_CREEP);
        log::info!("Level {} reached (+{} bonus)", self.level, bonus);
        audio.play(SoundEffect::LevelComplete);
    }

    /// A ship that is neither alive nor waiting to be promoted costs a life
    fn check_player(&mut self, audio: &mut dyn AudioSink) {
        let alive = self.entities.player().is_some_and(|p| p.is_active())
            || self.entities.pending_count(EntityKind::Player) > 0;
        if alive {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.power_ups.clear();
        if self.lives > 0 {
            self.respawn();
            return;
        }

        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {} at level {} after {:.1}s",
            self.score,
            self.level,
            self.play_time
        );
        if let Some(rank) = self
            .high_scores
            .add_score(self.score, self.level, self.play_time)
        {
            log::info!("New high score table entry at #{}", rank);
        }
        audio.play(SoundEffect::GameOver);
    }

    /// Fresh ship at the spawn point; nearby enemies are cleared so the new
    /// ship can't die on arrival
    fn respawn(&mut self) {
        let at = player::spawn_point(&self.field);
        let mut ship = player::spawn(at);
        if let Some(p) = ship.as_player_mut() {
            p.set_fire_rate(PLAYER_FIRE_RATE * self.fire_rate_scale);
            p.invulnerable = PLAYER_INVULNERABLE_TIME;
        }
        self.entities.add(ship);

        let mut cleared = 0;
        for enemy in self.entities.by_kind_mut(EntityKind::Enemy) {
            if enemy.is_active() && enemy.pos().distance(at) <= RESPAWN_CLEAR_RADIUS {
                enemy.destroy(DespawnReason::Culled);
                enemy.resolved = true;
                cleared += 1;
            }
        }
        log::info!("Respawned with {} lives left, cleared {} enemies", self.lives, cleared);
    }

    // === Queries ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Progress toward the next level in 0..=1
    pub fn level_progress(&self) -> f32 {
        self.levels
            .level_progress(self.level, self.level_time, self.level_kills)
    }

    pub fn level_kills(&self) -> u32 {
        self.level_kills
    }

    pub fn total_kills(&self) -> u32 {
        self.total_kills
    }

    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    /// Best score this session (0 before any game has ended)
    pub fn high_score(&self) -> u64 {
        self.high_scores.top_score()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn active_effects(&self) -> &[PowerUpEffect] {
        self.power_ups.active()
    }

    pub fn power_ups(&self) -> &PowerUpManager {
        &self.power_ups
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.player()
    }

    pub fn playfield(&self) -> Playfield {
        self.field
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

fn validate_playfield(width: f32, height: f32) -> Result<Playfield, EngineError> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(EngineError::InvalidPlayfield { width, height });
    }
    Ok(Playfield::new(width, height))
}

fn outcome_of(entity: &Entity) -> Option<Outcome> {
    let reason = entity.despawn_reason()?;
    match (&entity.body, reason) {
        (Body::Enemy(e), DespawnReason::Killed) => Some(Outcome::EnemyKilled {
            points: e.kill_points(),
            pos: entity.pos(),
            boss: e.is_boss(),
        }),
        (Body::Enemy(_), DespawnReason::Escaped) => Some(Outcome::EnemyEscaped),
        (Body::Barrel(b), DespawnReason::Killed | DespawnReason::Collided) => {
            Some(Outcome::BarrelBroken {
                contents: b.contents,
                pos: entity.pos(),
            })
        }
        (Body::PowerUp(p), DespawnReason::Collected) => Some(Outcome::PickupCollected(p.kind())),
        _ => None,
    }
}
