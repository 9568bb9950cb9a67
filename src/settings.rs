//! Game settings and tuning knobs
//!
//! Loaded from JSON; every field has a default so partial files work.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::EngineError;

/// What a timed power-up restores when it expires or is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RevertPolicy {
    /// Restore the value captured when the effect was applied
    #[default]
    Snapshot,
    /// Restore the documented default constant
    Baseline,
}

impl RevertPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevertPolicy::Snapshot => "snapshot",
            RevertPolicy::Baseline => "baseline",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub width: f32,
    pub height: f32,

    // === Session ===
    pub starting_lives: u32,
    /// RNG seed; `None` picks one at startup
    pub seed: Option<u64>,
    /// Fire whenever the cooldown allows, without holding Shoot
    pub auto_fire: bool,
    pub revert_policy: RevertPolicy,

    // === Loop ===
    /// Upper bound on a single frame's delta time (seconds)
    pub max_dt: f32,

    // === Effects ===
    /// Cap on live particles (0 disables particles)
    pub max_particles: usize,

    // === Audio ===
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,

            starting_lives: STARTING_LIVES,
            seed: None,
            auto_fire: false,
            revert_policy: RevertPolicy::Snapshot,

            max_dt: MAX_FRAME_DT,

            max_particles: MAX_PARTICLES,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Clamp values that would otherwise break the frame loop
    fn sanitized(mut self) -> Self {
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            log::warn!("max_dt {} is invalid, using {}", self.max_dt, MAX_FRAME_DT);
            self.max_dt = MAX_FRAME_DT;
        }
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Effective sound volume (respects mute)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{ "width": 1024.0, "auto_fire": true }"#).unwrap();
        assert_eq!(s.width, 1024.0);
        assert_eq!(s.height, DEFAULT_HEIGHT);
        assert!(s.auto_fire);
        assert_eq!(s.starting_lives, STARTING_LIVES);
        assert_eq!(s.revert_policy, RevertPolicy::Snapshot);
    }

    #[test]
    fn test_revert_policy_names() {
        let s = Settings::from_json(r#"{ "revert_policy": "baseline" }"#).unwrap();
        assert_eq!(s.revert_policy, RevertPolicy::Baseline);
        assert_eq!(s.revert_policy.as_str(), "baseline");
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_invalid_max_dt_is_replaced() {
        let s = Settings::from_json(r#"{ "max_dt": -1.0, "master_volume": 3.0 }"#).unwrap();
        assert_eq!(s.max_dt, MAX_FRAME_DT);
        assert_eq!(s.master_volume, 1.0);
    }

    #[test]
    fn test_round_trip_json() {
        let mut s = Settings::default();
        s.seed = Some(7);
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back.seed, Some(7));
    }

    #[test]
    fn test_effective_volume_respects_mute() {
        let mut s = Settings::default();
        assert!(s.effective_volume() > 0.0);
        s.muted = true;
        assert_eq!(s.effective_volume(), 0.0);
    }
}
