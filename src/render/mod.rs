//! Presentation boundary
//!
//! The core never draws. Each frame it hands every active entity to a
//! `RenderSink`; the sink asks the entity for its `RenderStyle` and turns
//! that into whatever it draws with. Shapes are cosmetic and never feed
//! back into collision.

pub mod batch;
pub mod shapes;
pub mod vertex;

pub use batch::VertexBatch;
pub use vertex::{Vertex, colors};

use serde::{Deserialize, Serialize};

use crate::sim::entity::{Entity, Playfield};

/// Silhouette drawn inside an entity's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Pointing up
    Triangle,
    Diamond,
    Hexagon,
    Square,
    Circle,
}

/// How one entity looks this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub shape: Shape,
    pub color: [f32; 4],
}

impl RenderStyle {
    pub const fn new(shape: Shape, color: [f32; 4]) -> Self {
        Self { shape, color }
    }

    /// Same style with alpha scaled by `factor`
    pub fn faded(mut self, factor: f32) -> Self {
        self.color[3] *= factor.clamp(0.0, 1.0);
        self
    }
}

/// Draw callback target
pub trait RenderSink {
    fn begin_frame(&mut self, _field: &Playfield) {}

    /// Called once per active entity, in manager order
    fn draw(&mut self, entity: &Entity);

    fn end_frame(&mut self) {}
}

/// Sink that only counts draw calls (headless runs, tests)
#[derive(Debug, Default)]
pub struct DrawCounter {
    pub frames: u64,
    pub last_frame_draws: usize,
    current: usize,
}

impl RenderSink for DrawCounter {
    fn begin_frame(&mut self, _field: &Playfield) {
        self.current = 0;
    }

    fn draw(&mut self, _entity: &Entity) {
        self.current += 1;
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        self.last_frame_draws = self.current;
    }
}
