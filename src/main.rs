//! Barrage entry point
//!
//! Runs a headless session with an autopilot at the controls and logs how
//! it went. Usage: `barrage [settings.json] [seconds]`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    use barrage::audio::CueLog;
    use barrage::input::{Action, InputState};
    use barrage::render::VertexBatch;
    use barrage::runner::{FrameClock, GameLoop, InputDriver};
    use barrage::sim::{EntityKind, GameEngine, GamePhase};
    use barrage::{EngineError, Settings};

    const DEFAULT_SECONDS: f64 = 20.0;
    const FRAME: Duration = Duration::from_micros(16_667);

    /// Real-time clock paced at ~60 fps for a fixed wall-clock duration
    struct WallClock {
        start: Instant,
        next: Instant,
        until: Duration,
    }

    impl WallClock {
        fn new(until: Duration) -> Self {
            let now = Instant::now();
            Self {
                start: now,
                next: now,
                until,
            }
        }
    }

    impl FrameClock for WallClock {
        fn next_frame(&mut self) -> Option<f64> {
            let now = Instant::now();
            if now < self.next {
                std::thread::sleep(self.next - now);
            }
            self.next += FRAME;
            let elapsed = self.start.elapsed();
            (elapsed < self.until).then(|| elapsed.as_secs_f64())
        }
    }

    /// Starts games, keeps shooting and drifts under the lowest enemy
    struct Autopilot;

    impl InputDriver for Autopilot {
        fn poll(&mut self, engine: &GameEngine, input: &mut InputState) {
            input.release_all();
            match engine.phase() {
                GamePhase::Menu => input.press(Action::Start),
                GamePhase::GameOver => input.press(Action::Restart),
                GamePhase::Paused => input.press(Action::Pause),
                GamePhase::Playing => {
                    input.press(Action::Shoot);
                    let Some(ship) = engine.player() else { return };
                    let target = engine
                        .entities()
                        .by_kind(EntityKind::Enemy)
                        .filter(|e| e.is_active())
                        .max_by(|a, b| a.pos().y.total_cmp(&b.pos().y));
                    if let Some(target) = target {
                        let dx = target.pos().x - ship.pos().x;
                        if dx < -4.0 {
                            input.press(Action::MoveLeft);
                        } else if dx > 4.0 {
                            input.press(Action::MoveRight);
                        }
                    }
                }
            }
        }
    }

    pub fn run() -> Result<(), EngineError> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let seconds = args
            .next()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_SECONDS);

        let engine = GameEngine::new(settings)?;
        let mut game = GameLoop::new(engine, Autopilot, CueLog::new(), VertexBatch::new());
        let frames = game.run(&mut WallClock::new(Duration::from_secs_f64(seconds)));

        let engine = game.engine();
        log::info!(
            "Ran {} frames: score {}, level {}, lives {}, kills {}, high score {}",
            frames,
            engine.score(),
            engine.level(),
            engine.lives(),
            engine.total_kills(),
            engine.high_score()
        );
        log::info!(
            "{} cues played, {} vertices in the last frame",
            game.audio().cues().len(),
            game.renderer().vertices().len()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        log::error!("{e}");
        eprintln!("barrage: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build is driven from the page through the library API
}
