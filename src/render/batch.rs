//! A render sink that collects one triangle list per frame

use super::shapes::tessellate;
use super::vertex::Vertex;
use super::RenderSink;
use crate::sim::entity::{Entity, Playfield};

/// Tessellates every drawn entity into a single GPU-ready vertex list
#[derive(Debug, Default)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
    draws: usize,
    field: Option<Playfield>,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertex data ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Entities drawn in the last frame
    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn playfield(&self) -> Option<Playfield> {
        self.field
    }
}

impl RenderSink for VertexBatch {
    fn begin_frame(&mut self, field: &Playfield) {
        self.vertices.clear();
        self.draws = 0;
        self.field = Some(*field);
    }

    fn draw(&mut self, entity: &Entity) {
        let style = entity.render_style();
        self.vertices
            .extend(tessellate(&style, entity.pos(), entity.transform.size));
        self.draws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::kinds::player;
    use glam::Vec2;

    #[test]
    fn test_batch_resets_each_frame() {
        let field = Playfield::new(800.0, 600.0);
        let ship = player::spawn(Vec2::new(400.0, 540.0));
        let mut batch = VertexBatch::new();

        batch.begin_frame(&field);
        batch.draw(&ship);
        batch.end_frame();
        assert_eq!(batch.draws(), 1);
        assert_eq!(batch.vertices().len(), 9);
        assert_eq!(batch.as_bytes().len(), 9 * Vertex::STRIDE);

        batch.begin_frame(&field);
        batch.end_frame();
        assert!(batch.vertices().is_empty());
    }
}
