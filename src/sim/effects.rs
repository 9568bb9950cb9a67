//! Timed power-up effects on the player
//!
//! Per kind: absent -> active -> (expired | replaced) -> absent. At most one
//! effect per kind is active; re-collecting a kind reverts the old effect
//! and starts the new one with its full duration.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::kinds::{Player, PowerUpConfig, PowerUpKind};
use crate::consts::{PLAYER_FIRE_RATE, PLAYER_SPEED};
use crate::settings::RevertPolicy;

/// Player attribute value captured when an effect was applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Snapshot {
    FireRate(f32),
    MoveSpeed(f32),
    Nothing,
}

/// An active timed effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpEffect {
    pub kind: PowerUpKind,
    pub duration: f32,
    pub remaining: f32,
    pub magnitude: f32,
    snapshot: Snapshot,
}

#[derive(Debug, Clone, Default)]
pub struct PowerUpManager {
    /// Active effects in application order; kinds are unique
    effects: Vec<PowerUpEffect>,
    policy: RevertPolicy,
}

impl PowerUpManager {
    pub fn new(policy: RevertPolicy) -> Self {
        Self {
            effects: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RevertPolicy {
        self.policy
    }

    /// Apply a power-up to `player`, replacing any active effect of the same kind
    pub fn add_power_up(&mut self, config: PowerUpConfig, player: &mut Entity) {
        if player.as_player().is_none() {
            log::warn!("Power-up {:?} applied to a non-player entity", config.kind);
            return;
        }

        if config.duration <= 0.0 {
            apply_instant(&config, player);
            return;
        }

        if let Some(i) = self.effects.iter().position(|e| e.kind == config.kind) {
            let old = self.effects.remove(i);
            log::debug!("Replacing {:?} ({:.1}s left)", old.kind, old.remaining);
            self.revert(&old, player);
        }

        let snapshot = match player.as_player_mut() {
            Some(p) => apply(&config, p),
            None => Snapshot::Nothing,
        };
        log::debug!("Applied {:?} for {:.1}s", config.kind, config.duration);
        self.effects.push(PowerUpEffect {
            kind: config.kind,
            duration: config.duration,
            remaining: config.duration,
            magnitude: config.magnitude,
            snapshot,
        });
    }

    /// Count down every effect; expired ones are reverted on `player` (when
    /// there is one) and dropped. Returns the kinds that expired.
    pub fn update(&mut self, dt: f32, mut player: Option<&mut Entity>) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for effect in &mut self.effects {
            if effect.duration > 0.0 {
                effect.remaining -= dt;
            }
        }

        let mut i = 0;
        while i < self.effects.len() {
            if self.effects[i].remaining <= 0.0 {
                let effect = self.effects.remove(i);
                if let Some(p) = player.as_deref_mut() {
                    self.revert(&effect, p);
                }
                log::debug!("{:?} expired", effect.kind);
                expired.push(effect.kind);
            } else {
                i += 1;
            }
        }
        expired
    }

    fn revert(&self, effect: &PowerUpEffect, player: &mut Entity) {
        let Some(p) = player.as_player_mut() else { return };
        let baseline = self.policy == RevertPolicy::Baseline;
        match (effect.kind, effect.snapshot) {
            (PowerUpKind::RapidFire, Snapshot::FireRate(before)) => {
                p.set_fire_rate(if baseline { PLAYER_FIRE_RATE } else { before });
            }
            (PowerUpKind::SpeedBoost, Snapshot::MoveSpeed(before)) => {
                p.move_speed = if baseline { PLAYER_SPEED } else { before };
            }
            (PowerUpKind::Shield, _) => p.shield_active = false,
            _ => {}
        }
    }

    /// Scale the fire rate an active rapid-fire will restore, so a permanent
    /// change made while it runs survives its expiry
    pub fn rescale_fire_rate(&mut self, factor: f32) {
        for effect in &mut self.effects {
            if let Snapshot::FireRate(before) = &mut effect.snapshot {
                *before *= factor;
            }
        }
    }

    /// Drop every effect without touching any player (respawn, restart)
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn has_effect(&self, kind: PowerUpKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn effect(&self, kind: PowerUpKind) -> Option<&PowerUpEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Shots per trigger (1 without multi-shot)
    pub fn multi_shot_count(&self) -> u32 {
        self.effect(PowerUpKind::MultiShot)
            .map(|e| e.magnitude.round().max(1.0) as u32)
            .unwrap_or(1)
    }

    /// Projectile damage multiplier (1 without a boost)
    pub fn damage_multiplier(&self) -> f32 {
        self.effect(PowerUpKind::DamageBoost)
            .map(|e| e.magnitude)
            .unwrap_or(1.0)
    }

    pub fn shield_active(&self) -> bool {
        self.has_effect(PowerUpKind::Shield)
    }

    /// Active effects, oldest first
    pub fn active(&self) -> &[PowerUpEffect] {
        &self.effects
    }
}

fn apply(config: &PowerUpConfig, p: &mut Player) -> Snapshot {
    match config.kind {
        PowerUpKind::RapidFire => {
            let before = p.fire_rate();
            p.set_fire_rate(before * config.magnitude);
            Snapshot::FireRate(before)
        }
        PowerUpKind::SpeedBoost => {
            let before = p.move_speed;
            p.move_speed = before * config.magnitude;
            Snapshot::MoveSpeed(before)
        }
        PowerUpKind::Shield => {
            p.shield_active = true;
            Snapshot::Nothing
        }
        PowerUpKind::MultiShot | PowerUpKind::DamageBoost | PowerUpKind::HealthRestore => {
            Snapshot::Nothing
        }
    }
}

fn apply_instant(config: &PowerUpConfig, player: &mut Entity) {
    match config.kind {
        PowerUpKind::HealthRestore => {
            player.heal(config.magnitude.round() as i32);
            log::debug!("Restored health to {}", player.health());
        }
        kind => log::warn!("{kind:?} has no instant form; ignored"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_HEALTH;
    use crate::sim::kinds::player;
    use glam::Vec2;

    fn new_player() -> Entity {
        player::spawn(Vec2::new(400.0, 540.0))
    }

    fn fire_rate(e: &Entity) -> f32 {
        e.as_player().unwrap().fire_rate()
    }

    #[test]
    fn test_defaults_without_effects() {
        let m = PowerUpManager::default();
        assert_eq!(m.multi_shot_count(), 1);
        assert_eq!(m.damage_multiplier(), 1.0);
        assert!(!m.shield_active());
        assert!(m.effect(PowerUpKind::Shield).is_none());
    }

    #[test]
    fn test_same_kind_replaces_and_resets_timer() {
        let mut m = PowerUpManager::default();
        let mut p = new_player();
        let cfg = PowerUpKind::RapidFire.config();

        m.add_power_up(cfg, &mut p);
        m.update(5.0, Some(&mut p));
        m.add_power_up(cfg, &mut p);

        assert_eq!(m.active().len(), 1);
        assert_eq!(m.effect(PowerUpKind::RapidFire).unwrap().remaining, cfg.duration);
        // Not compounded: one application of the multiplier
        assert!((fire_rate(&p) - PLAYER_FIRE_RATE * cfg.magnitude).abs() < 1e-6);

        // Second effect's full duration counts from the second add
        m.update(cfg.duration - 0.5, Some(&mut p));
        assert!(m.has_effect(PowerUpKind::RapidFire));
        m.update(1.0, Some(&mut p));
        assert!(!m.has_effect(PowerUpKind::RapidFire));
    }

    #[test]
    fn test_rapid_fire_reverts_to_default() {
        let mut m = PowerUpManager::default();
        let mut p = new_player();
        m.add_power_up(PowerUpKind::RapidFire.config(), &mut p);
        assert!(fire_rate(&p) < PLAYER_FIRE_RATE);

        let expired = m.update(PowerUpKind::RapidFire.config().duration + 0.1, Some(&mut p));
        assert_eq!(expired, vec![PowerUpKind::RapidFire]);
        assert_eq!(fire_rate(&p), PLAYER_FIRE_RATE);
    }

    #[test]
    fn test_snapshot_policy_restores_pre_effect_value() {
        let mut m = PowerUpManager::new(RevertPolicy::Snapshot);
        let mut p = new_player();
        p.as_player_mut().unwrap().set_fire_rate(0.25);
        m.add_power_up(PowerUpKind::RapidFire.config(), &mut p);
        m.update(100.0, Some(&mut p));
        assert_eq!(fire_rate(&p), 0.25);
    }

    #[test]
    fn test_rescaled_snapshot_keeps_permanent_change() {
        let mut m = PowerUpManager::new(RevertPolicy::Snapshot);
        let mut p = new_player();
        m.add_power_up(PowerUpKind::RapidFire.config(), &mut p);
        m.add_power_up(PowerUpKind::SpeedBoost.config(), &mut p);
        m.rescale_fire_rate(0.5);
        m.update(100.0, Some(&mut p));
        assert_eq!(fire_rate(&p), PLAYER_FIRE_RATE * 0.5);
        assert_eq!(p.as_player().unwrap().move_speed, PLAYER_SPEED);
    }

    #[test]
    fn test_baseline_policy_restores_constant() {
        let mut m = PowerUpManager::new(RevertPolicy::Baseline);
        let mut p = new_player();
        p.as_player_mut().unwrap().set_fire_rate(0.25);
        m.add_power_up(PowerUpKind::RapidFire.config(), &mut p);
        m.update(100.0, Some(&mut p));
        assert_eq!(fire_rate(&p), PLAYER_FIRE_RATE);
    }

    #[test]
    fn test_shield_toggles_player_flag() {
        let mut m = PowerUpManager::default();
        let mut p = new_player();
        m.add_power_up(PowerUpKind::Shield.config(), &mut p);
        assert!(m.shield_active());
        assert!(p.as_player().unwrap().shield_active);
        assert_eq!(p.take_damage(1), 0);

        m.update(100.0, Some(&mut p));
        assert!(!m.shield_active());
        assert!(!p.as_player().unwrap().shield_active);
    }

    #[test]
    fn test_health_restore_is_instant() {
        let mut m = PowerUpManager::default();
        let mut p = new_player();
        p.take_damage(2);
        m.add_power_up(PowerUpKind::HealthRestore.config(), &mut p);
        assert_eq!(p.health(), PLAYER_HEALTH - 1);
        assert!(!m.has_effect(PowerUpKind::HealthRestore));
        assert!(m.active().is_empty());
    }

    #[test]
    fn test_multi_shot_and_damage_queries() {
        let mut m = PowerUpManager::default();
        let mut p = new_player();
        m.add_power_up(PowerUpKind::MultiShot.config(), &mut p);
        m.add_power_up(PowerUpKind::DamageBoost.config(), &mut p);
        assert_eq!(m.multi_shot_count(), 3);
        assert_eq!(m.damage_multiplier(), 2.0);
        assert_eq!(m.active().len(), 2);
    }

    #[test]
    fn test_speed_boost_round_trip() {
        let mut m = PowerUpManager::default();
        let mut p = new_player();
        m.add_power_up(PowerUpKind::SpeedBoost.config(), &mut p);
        assert!(p.as_player().unwrap().move_speed > PLAYER_SPEED);
        m.update(100.0, Some(&mut p));
        assert_eq!(p.as_player().unwrap().move_speed, PLAYER_SPEED);
    }

    #[test]
    fn test_expiry_without_player_and_clear() {
        let mut m = PowerUpManager::default();
        let mut p = new_player();
        m.add_power_up(PowerUpKind::Shield.config(), &mut p);
        m.add_power_up(PowerUpKind::MultiShot.config(), &mut p);
        assert_eq!(m.update(9.0, None), vec![PowerUpKind::Shield]);
        m.clear();
        assert!(m.active().is_empty());
    }
}
