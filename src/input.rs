//! Polled input state
//!
//! Whatever captures keys or buttons writes held flags here; the frame loop
//! calls `update()` once per frame to snapshot the previous state, which is
//! what makes `pressed()` edge-triggered.

use serde::{Deserialize, Serialize};

/// Logical actions the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Shoot,
    Pause,
    Start,
    Restart,
    Menu,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::Shoot,
        Action::Pause,
        Action::Start,
        Action::Restart,
        Action::Menu,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Held state for every action, current and previous frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    current: [bool; Action::ALL.len()],
    previous: [bool; Action::ALL.len()],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action as held (or released)
    pub fn set(&mut self, action: Action, held: bool) {
        self.current[action.index()] = held;
    }

    pub fn press(&mut self, action: Action) {
        self.set(action, true);
    }

    pub fn release(&mut self, action: Action) {
        self.set(action, false);
    }

    /// Release everything (e.g. on focus loss)
    pub fn release_all(&mut self) {
        self.current = [false; Action::ALL.len()];
    }

    /// Snapshot the current state as "previous" for edge detection.
    /// Call once per frame, after the engine has read this frame's input.
    pub fn update(&mut self) {
        self.previous = self.current;
    }

    /// Level-triggered: action is held right now
    pub fn held(&self, action: Action) -> bool {
        self.current[action.index()]
    }

    /// Edge-triggered: action went down since the last snapshot
    pub fn pressed(&self, action: Action) -> bool {
        self.current[action.index()] && !self.previous[action.index()]
    }

    /// Movement axis from held directions (not normalized)
    pub fn movement(&self) -> glam::Vec2 {
        let mut dir = glam::Vec2::ZERO;
        if self.held(Action::MoveLeft) {
            dir.x -= 1.0;
        }
        if self.held(Action::MoveRight) {
            dir.x += 1.0;
        }
        if self.held(Action::MoveUp) {
            dir.y -= 1.0;
        }
        if self.held(Action::MoveDown) {
            dir.y += 1.0;
        }
        dir
    }
}
