//! Collision primitives for the lane field
//!
//! Cars are axis-aligned rectangles stored as center + half-extents, coins
//! are circles. Touching edges do not count as overlap.

use glam::Vec2;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap test between two rectangles
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    /// Closest point of the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }

    /// Circle-vs-rectangle: the circle overlaps when the closest point on the
    /// rectangle lies strictly inside its radius
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = self.closest_point(center);
        center.distance_squared(closest) < radius * radius
    }
}
