//! Frame scheduling around the engine
//!
//! `GameLoop` is the explicit replacement for a self-rescheduling display
//! callback: every iteration checks the cooperative stop flag first, turns
//! the clock timestamp into a capped delta time, polls input, advances the
//! engine one frame and renders it.

use std::cell::Cell;
use std::rc::Rc;

use crate::audio::AudioSink;
use crate::input::InputState;
use crate::render::RenderSink;
use crate::sim::GameEngine;

/// Source of frame timestamps (seconds, monotonic)
pub trait FrameClock {
    /// Timestamp of the next frame, or `None` when the clock has run out
    fn next_frame(&mut self) -> Option<f64>;
}

/// Writes held action flags into the input state once per frame
pub trait InputDriver {
    fn poll(&mut self, engine: &GameEngine, input: &mut InputState);
}

/// Drivers that never press anything
impl InputDriver for () {
    fn poll(&mut self, _engine: &GameEngine, _input: &mut InputState) {}
}

/// Clock that advances by a fixed step, for a fixed number of frames
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: f64,
    step: f64,
    remaining: u64,
}

impl FixedClock {
    pub fn new(step: f64, frames: u64) -> Self {
        Self {
            now: 0.0,
            step,
            remaining: frames,
        }
    }
}

impl FrameClock for FixedClock {
    fn next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let t = self.now;
        self.now += self.step;
        Some(t)
    }
}

/// Cooperative cancellation flag shared with the loop
#[derive(Debug, Clone)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    /// Stop the loop; the very next `run_frame` does nothing
    pub fn stop(&self) {
        self.0.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.0.get()
    }
}

pub struct GameLoop<D, A, R> {
    engine: GameEngine,
    input: InputState,
    driver: D,
    audio: A,
    renderer: R,
    running: Rc<Cell<bool>>,
    last_time: Option<f64>,
    max_dt: f32,
    frames: u64,
}

impl<D: InputDriver, A: AudioSink, R: RenderSink> GameLoop<D, A, R> {
    pub fn new(engine: GameEngine, driver: D, audio: A, renderer: R) -> Self {
        let max_dt = engine.settings().max_dt;
        Self {
            engine,
            input: InputState::new(),
            driver,
            audio,
            renderer,
            running: Rc::new(Cell::new(true)),
            last_time: None,
            max_dt,
            frames: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Rc::clone(&self.running))
    }

    /// Run one frame at timestamp `now`. Returns false (and does nothing)
    /// once the loop has been stopped.
    pub fn run_frame(&mut self, now: f64) -> bool {
        if !self.running.get() {
            return false;
        }

        // The first frame has no predecessor and advances nothing
        let dt = match self.last_time {
            Some(last) => ((now - last) as f32).clamp(0.0, self.max_dt),
            None => 0.0,
        };
        self.last_time = Some(now);

        self.driver.poll(&self.engine, &mut self.input);
        self.engine.update(dt, &self.input, &mut self.audio);
        self.input.update();
        self.engine.render(&mut self.renderer);
        self.frames += 1;
        true
    }

    /// Run frames until stopped or the clock runs out. Returns frames run.
    pub fn run(&mut self, clock: &mut impl FrameClock) -> u64 {
        let start = self.frames;
        while let Some(now) = clock.next_frame() {
            if !self.run_frame(now) {
                break;
            }
        }
        let ran = self.frames - start;
        log::debug!("Loop finished after {} frames", ran);
        ran
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
