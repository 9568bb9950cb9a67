//! Axis-aligned geometry for collision and bounds checks
//!
//! Every collision test in the game is a box test. Rendered silhouettes
//! (diamonds, hexagons, triangles) never feed back into collision.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Extra vector operations on top of `glam::Vec2`
pub trait Vec2Ext {
    /// Divide by a scalar, failing instead of producing infinities
    fn checked_div(self, scalar: f32) -> Result<Vec2, EngineError>;
    /// Rotate a vector by `angle` radians
    fn rotated(self, angle: f32) -> Vec2;
}

impl Vec2Ext for Vec2 {
    fn checked_div(self, scalar: f32) -> Result<Vec2, EngineError> {
        if scalar == 0.0 {
            return Err(EngineError::DivisionByZero);
        }
        Ok(self / scalar)
    }

    fn rotated(self, angle: f32) -> Vec2 {
        Vec2::from_angle(angle).rotate(self)
    }
}

/// Axis-aligned bounding box stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    /// Box of full `size` centred on `center`
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size.abs() * 0.5,
        }
    }

    /// Box covering a whole playfield, origin at the top-left
    pub fn playfield(width: f32, height: f32) -> Self {
        let size = Vec2::new(width, height);
        Self::from_center_size(size * 0.5, size)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap; boxes that only touch along an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }

    /// Point inside (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            center: self.center,
            half: self.half + Vec2::splat(margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checked_div() {
        let v = Vec2::new(4.0, -2.0);
        assert_eq!(v.checked_div(2.0).unwrap(), Vec2::new(2.0, -1.0));
        assert!(matches!(
            v.checked_div(0.0),
            Err(EngineError::DivisionByZero)
        ));
    }

    #[test]
    fn test_zero_vector_normalizes_to_zero() {
        assert_eq!(Vec2::ZERO.normalize_or_zero(), Vec2::ZERO);
    }

    #[test]
    fn test_rotated_quarter_turn() {
        let v = Vec2::new(1.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        assert!((v - Vec2::new(0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_overlap_and_touching() {
        let a = Aabb::from_center_size(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_center_size(Vec2::new(9.0, 0.0), Vec2::splat(10.0));
        let touching = Aabb::from_center_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&touching));
    }

    #[test]
    fn test_playfield_contains() {
        let field = Aabb::playfield(800.0, 600.0);
        assert!(field.contains(Vec2::new(0.0, 0.0)));
        assert!(field.contains(Vec2::new(800.0, 600.0)));
        assert!(!field.contains(Vec2::new(-1.0, 300.0)));
        assert!(field.expanded(10.0).contains(Vec2::new(-5.0, 300.0)));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            aw in 1.0f32..200.0, ah in 1.0f32..200.0,
            bw in 1.0f32..200.0, bh in 1.0f32..200.0,
        ) {
            let a = Aabb::from_center_size(Vec2::new(ax, ay), Vec2::new(aw, ah));
            let b = Aabb::from_center_size(Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
