//! Engine error types
//!
//! Only construction and configuration failures surface as errors. Everything
//! that can go wrong mid-frame is absorbed where it happens and logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Playfield dimensions must be positive and finite
    #[error("invalid playfield {width}x{height}")]
    InvalidPlayfield { width: f32, height: f32 },

    /// Explicit vector division by a zero scalar
    #[error("division of vector by zero")]
    DivisionByZero,

    #[error("invalid settings: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
