//! Triangle-list tessellation for the entity silhouettes
//!
//! Every shape is fitted inside the entity's bounding box (`size` is the
//! full width/height), screen space with y down.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use super::{RenderStyle, Shape};

const CIRCLE_SEGMENTS: u32 = 16;

/// Triangles for `style` centred on `center`
pub fn tessellate(style: &RenderStyle, center: Vec2, size: Vec2) -> Vec<Vertex> {
    let half = size / 2.0;
    match style.shape {
        Shape::Triangle => fan(
            center,
            &[
                Vec2::new(0.0, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ],
            style.color,
        ),
        Shape::Diamond => fan(
            center,
            &[
                Vec2::new(0.0, -half.y),
                Vec2::new(half.x, 0.0),
                Vec2::new(0.0, half.y),
                Vec2::new(-half.x, 0.0),
            ],
            style.color,
        ),
        Shape::Square => fan(
            center,
            &[
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ],
            style.color,
        ),
        Shape::Hexagon => ellipse(center, half, style.color, 6),
        Shape::Circle => ellipse(center, half, style.color, CIRCLE_SEGMENTS),
    }
}

/// Fan of triangles from `center` around a convex outline given as offsets
fn fan(center: Vec2, outline: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        let (a, b) = (center + *a, center + b);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Filled ellipse (or regular polygon for small `segments`) inscribed in `half`
pub fn ellipse(center: Vec2, half: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + half.x * theta1.cos(),
            center.y + half.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + half.x * theta2.cos(),
            center.y + half.y * theta2.sin(),
            color,
        ));
    }

    vertices
}
