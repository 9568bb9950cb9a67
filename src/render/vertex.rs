//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in a packed buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const PLAYER_SHIELDED: [f32; 4] = [0.4, 0.9, 1.0, 1.0];
    pub const ENEMY_BASIC: [f32; 4] = [0.9, 0.25, 0.25, 1.0];
    pub const ENEMY_FAST: [f32; 4] = [1.0, 0.6, 0.2, 1.0];
    pub const ENEMY_HEAVY: [f32; 4] = [0.6, 0.3, 0.8, 1.0];
    pub const BOSS: [f32; 4] = [0.75, 0.05, 0.2, 1.0];
    pub const PLAYER_SHOT: [f32; 4] = [1.0, 1.0, 0.6, 1.0];
    pub const ENEMY_SHOT: [f32; 4] = [1.0, 0.4, 0.7, 1.0];
    pub const BARREL: [f32; 4] = [0.55, 0.35, 0.2, 1.0];
    pub const RAPID_FIRE: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    pub const MULTI_SHOT: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
    pub const SHIELD: [f32; 4] = [0.4, 0.9, 1.0, 1.0];
    pub const DAMAGE_BOOST: [f32; 4] = [1.0, 0.3, 0.3, 1.0];
    pub const SPEED_BOOST: [f32; 4] = [0.3, 1.0, 0.5, 1.0];
    pub const HEALTH_RESTORE: [f32; 4] = [1.0, 0.5, 0.8, 1.0];
    pub const EXPLOSION: [f32; 4] = [1.0, 0.7, 0.3, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 24);
        let verts = [Vertex::new(1.0, 2.0, colors::PLAYER); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 48);
    }
}
