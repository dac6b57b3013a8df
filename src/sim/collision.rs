//! Collision detection and response for axis-aligned playfields
//!
//! Everything uses screen coordinates: origin at the top-left corner of the
//! playfield, y growing downward. All tests are closed intervals, so touching
//! an edge or a box counts as a hit.

use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Overlap test (touching counts)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Result of a collision check
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at collision (pointing toward the moving body, for reflection)
    pub normal: Vec2,
    /// Penetration depth along the normal
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball (tested by its bounding square) against a box
///
/// The bounce axis is the one with the smallest overlap: a ball clipping the
/// side of a brick reflects horizontally, one landing on top reflects
/// vertically. Ties go to the vertical axis.
pub fn circle_aabb_collision(center: Vec2, radius: f32, aabb: &Aabb) -> CollisionResult {
    let overlap_left = center.x + radius - aabb.min.x;
    let overlap_right = aabb.max.x - (center.x - radius);
    let overlap_top = center.y + radius - aabb.min.y;
    let overlap_bottom = aabb.max.y - (center.y - radius);

    if overlap_left < 0.0 || overlap_right < 0.0 || overlap_top < 0.0 || overlap_bottom < 0.0 {
        return CollisionResult::miss();
    }

    let min_x = overlap_left.min(overlap_right);
    let min_y = overlap_top.min(overlap_bottom);

    if min_x < min_y {
        let normal = if overlap_left < overlap_right {
            Vec2::NEG_X
        } else {
            Vec2::X
        };
        CollisionResult {
            hit: true,
            normal,
            penetration: min_x,
        }
    } else {
        let normal = if overlap_top < overlap_bottom {
            Vec2::NEG_Y
        } else {
            Vec2::Y
        };
        CollisionResult {
            hit: true,
            normal,
            penetration: min_y,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// A set of playfield edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Edges {
    pub const ALL: Edges = Edges {
        left: true,
        right: true,
        top: true,
        bottom: true,
    };
    /// Breakout: the floor is open
    pub const SIDES_AND_TOP: Edges = Edges {
        left: true,
        right: true,
        top: true,
        bottom: false,
    };
    /// Pong: left and right are goal lines
    pub const TOP_AND_BOTTOM: Edges = Edges {
        left: false,
        right: false,
        top: true,
        bottom: true,
    };

    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    fn intersect(self, other: Edges) -> Edges {
        Edges {
            left: self.left && other.left,
            right: self.right && other.right,
            top: self.top && other.top,
            bottom: self.bottom && other.bottom,
        }
    }
}

/// Which playfield edges a box centred at `pos` touches or crosses
pub fn touched_edges(pos: Vec2, half_extents: Vec2, bounds: Vec2) -> Edges {
    Edges {
        left: pos.x - half_extents.x <= 0.0,
        right: pos.x + half_extents.x >= bounds.x,
        top: pos.y - half_extents.y <= 0.0,
        bottom: pos.y + half_extents.y >= bounds.y,
    }
}

/// Reflect a moving box off the given walls
///
/// Position is clamped back onto the wall and the matching velocity component
/// is pointed into the playfield. Returns the walls that were touched.
pub fn bounce_off_walls(
    pos: &mut Vec2,
    vel: &mut Vec2,
    half_extents: Vec2,
    bounds: Vec2,
    walls: Edges,
) -> Edges {
    let touched = touched_edges(*pos, half_extents, bounds).intersect(walls);

    if touched.left {
        pos.x = half_extents.x;
        vel.x = vel.x.abs();
    } else if touched.right {
        pos.x = bounds.x - half_extents.x;
        vel.x = -vel.x.abs();
    }

    if touched.top {
        pos.y = half_extents.y;
        vel.y = vel.y.abs();
    } else if touched.bottom {
        pos.y = bounds.y - half_extents.y;
        vel.y = -vel.y.abs();
    }

    touched
}

/// Clamp a box centre so the whole box stays inside the playfield
pub fn clamp_to_bounds(pos: Vec2, half_extents: Vec2, bounds: Vec2) -> Vec2 {
    let lo = half_extents.min(bounds * 0.5);
    let hi = (bounds - half_extents).max(lo);
    pos.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_entity_reflects_at_left_edge() {
        // Entity at x=0 moving left one unit per tick
        let bounds = Vec2::new(100.0, 100.0);
        let mut pos = Vec2::new(0.0, 50.0);
        let mut vel = Vec2::new(-1.0, 0.0);

        pos += vel;
        let touched = bounce_off_walls(&mut pos, &mut vel, Vec2::ZERO, bounds, Edges::ALL);

        assert!(touched.left);
        assert_eq!(pos.x, 0.0);
        assert_eq!(vel.x, 1.0);
    }

    #[test]
    fn test_exact_edge_contact_is_a_hit() {
        let bounds = Vec2::new(100.0, 100.0);
        // Box of half-width 5 exactly touching the right edge
        let edges = touched_edges(Vec2::new(95.0, 50.0), Vec2::splat(5.0), bounds);
        assert!(edges.right);
        assert!(!edges.left);

        let edges = touched_edges(Vec2::new(94.9, 50.0), Vec2::splat(5.0), bounds);
        assert!(!edges.any());
    }

    #[test]
    fn test_bounce_ignores_open_edges() {
        let bounds = Vec2::new(100.0, 100.0);
        let mut pos = Vec2::new(50.0, 120.0);
        let mut vel = Vec2::new(0.0, 3.0);

        let touched =
            bounce_off_walls(&mut pos, &mut vel, Vec2::ZERO, bounds, Edges::SIDES_AND_TOP);
        assert!(!touched.any());
        assert_eq!(vel.y, 3.0);
    }

    #[test]
    fn test_circle_aabb_side_hit() {
        let brick = Aabb::new(100.0, 100.0, 50.0, 20.0);

        // Ball clipping the left side, vertically centred
        let result = circle_aabb_collision(Vec2::new(95.0, 110.0), 8.0, &brick);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_X);
    }

    #[test]
    fn test_circle_aabb_top_hit() {
        let brick = Aabb::new(100.0, 100.0, 50.0, 20.0);

        let result = circle_aabb_collision(Vec2::new(125.0, 94.0), 8.0, &brick);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        assert!((result.penetration - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_aabb_touching_counts() {
        let brick = Aabb::new(100.0, 100.0, 50.0, 20.0);
        let result = circle_aabb_collision(Vec2::new(125.0, 92.0), 8.0, &brick);
        assert!(result.hit);

        let result = circle_aabb_collision(Vec2::new(125.0, 91.0), 8.0, &brick);
        assert!(!result.hit);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_aabb_overlap_closed() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let c = Aabb::new(10.5, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = Vec2::new(100.0, 50.0);
        let clamped = clamp_to_bounds(Vec2::new(-20.0, 80.0), Vec2::new(5.0, 5.0), bounds);
        assert_eq!(clamped, Vec2::new(5.0, 45.0));
    }
}
