//! Fire-and-forget sound cues
//!
//! The simulation only ever calls `AudioSink::play`; it never waits on or
//! inspects the result. On the web the cues are synthesized with Web Audio
//! oscillators, so there are no sound files to load.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fired
    Shot,
    /// Enemy killed
    EnemyDestroyed,
    /// Barrel broken open
    BarrelBroken,
    /// Power-up picked up
    PowerUpCollected,
    /// Player lost health
    PlayerDamaged,
    /// Level advanced
    LevelComplete,
    /// Boss entered the field
    BossIncoming,
    /// Last life lost
    GameOver,
}

/// One oscillator voice of a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub start_freq: f32,
    pub end_freq: f32,
    /// Peak gain before master/sfx volume
    pub gain: f32,
    /// Offset from the cue start (seconds)
    pub delay: f32,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

const fn tone(wave: Wave, start_freq: f32, end_freq: f32, gain: f32, delay: f32, duration: f32) -> Tone {
    Tone {
        wave,
        start_freq,
        end_freq,
        gain,
        delay,
        duration,
    }
}

use Wave::*;

const SHOT: &[Tone] = &[tone(Square, 880.0, 440.0, 0.12, 0.0, 0.06)];
const ENEMY_DESTROYED: &[Tone] = &[
    tone(Sawtooth, 100.0, 30.0, 0.5, 0.0, 0.4),
    tone(Square, 1500.0, 1500.0, 0.2, 0.0, 0.1),
];
const BARREL_BROKEN: &[Tone] = &[
    tone(Sine, 80.0, 40.0, 0.5, 0.0, 0.25),
    tone(Square, 400.0, 200.0, 0.25, 0.0, 0.2),
];
/// Rising arpeggio
const POWER_UP_COLLECTED: &[Tone] = &[
    tone(Sine, 523.0, 523.0, 0.3, 0.0, 0.08),
    tone(Sine, 659.0, 659.0, 0.3, 0.08, 0.08),
    tone(Sine, 784.0, 784.0, 0.3, 0.16, 0.12),
];
const PLAYER_DAMAGED: &[Tone] = &[tone(Sawtooth, 220.0, 55.0, 0.45, 0.0, 0.3)];
const LEVEL_COMPLETE: &[Tone] = &[
    tone(Triangle, 523.0, 523.0, 0.3, 0.0, 0.12),
    tone(Triangle, 659.0, 659.0, 0.3, 0.12, 0.12),
    tone(Triangle, 784.0, 784.0, 0.3, 0.24, 0.12),
    tone(Triangle, 1047.0, 1047.0, 0.35, 0.36, 0.3),
];
const BOSS_INCOMING: &[Tone] = &[
    tone(Sawtooth, 55.0, 110.0, 0.4, 0.0, 0.8),
    tone(Square, 110.0, 55.0, 0.2, 0.4, 0.8),
];
/// Falling three-note phrase
const GAME_OVER: &[Tone] = &[
    tone(Triangle, 392.0, 392.0, 0.35, 0.0, 0.25),
    tone(Triangle, 330.0, 330.0, 0.35, 0.25, 0.25),
    tone(Triangle, 262.0, 131.0, 0.4, 0.5, 0.6),
];

impl SoundEffect {
    /// Voices that make up the cue
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Shot => SHOT,
            SoundEffect::EnemyDestroyed => ENEMY_DESTROYED,
            SoundEffect::BarrelBroken => BARREL_BROKEN,
            SoundEffect::PowerUpCollected => POWER_UP_COLLECTED,
            SoundEffect::PlayerDamaged => PLAYER_DAMAGED,
            SoundEffect::LevelComplete => LEVEL_COMPLETE,
            SoundEffect::BossIncoming => BOSS_INCOMING,
            SoundEffect::GameOver => GAME_OVER,
        }
    }
}

/// Destination for sound cues
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Records cues in order (headless runs and tests)
#[derive(Debug, Default, Clone)]
pub struct CueLog {
    cues: Vec<SoundEffect>,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> &[SoundEffect] {
        &self.cues
    }

    pub fn count(&self, effect: SoundEffect) -> usize {
        self.cues.iter().filter(|c| **c == effect).count()
    }

    pub fn contains(&self, effect: SoundEffect) -> bool {
        self.cues.contains(&effect)
    }

    pub fn clear(&mut self) {
        self.cues.clear();
    }
}

impl AudioSink for CueLog {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("cue {effect:?}");
        self.cues.push(effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect, Tone, Wave};
    use crate::settings::Settings;

    /// Web Audio synthesizer. Silent (never failing) when no context could
    /// be created.
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            wave: Wave,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            });
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn voice(ctx: &AudioContext, tone: &Tone, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, tone.start_freq, tone.wave) else {
                return;
            };
            let t = ctx.current_time() + tone.delay as f64;
            let end = t + tone.duration as f64;

            gain.gain().set_value_at_time(vol * tone.gain, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            if tone.end_freq != tone.start_freq {
                osc.frequency().set_value_at_time(tone.start_freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(tone.end_freq, end)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(end + 0.05).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers start the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            for tone in effect.tones() {
                Self::voice(ctx, tone, self.volume);
            }
        }
    }
}
