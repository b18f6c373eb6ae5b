//! Axis-aligned box collision
//!
//! The only collision the game needs: the player's box landing on top of a
//! platform's box.

use glam::Vec2;

/// Axis-aligned box, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict overlap on both axes
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Whether a falling body should land on `platform` this tick.
///
/// The body must overlap horizontally, its feet must be below the platform
/// top but no deeper than `tolerance` past the platform bottom, and it must
/// not be moving upward.
pub fn lands_on(body: &Aabb, vy: f32, platform: &Aabb, tolerance: f32) -> bool {
    vy >= 0.0
        && body.left() < platform.right()
        && body.right() > platform.left()
        && body.bottom() > platform.top()
        && body.bottom() < platform.bottom() + tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plat() -> Aabb {
        Aabb::new(Vec2::new(100.0, 400.0), Vec2::new(160.0, 24.0))
    }

    fn body_with_feet_at(x: f32, feet_y: f32) -> Aabb {
        Aabb::new(Vec2::new(x, feet_y - 40.0), Vec2::new(40.0, 40.0))
    }

    #[test]
    fn test_intersects() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(a.intersects(&Aabb::new(Vec2::splat(5.0), Vec2::splat(10.0))));
        // Touching edges do not overlap
        assert!(!a.intersects(&Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0))));
    }

    #[test]
    fn test_lands_when_falling_into_top() {
        assert!(lands_on(&body_with_feet_at(120.0, 405.0), 200.0, &plat(), 40.0));
        assert!(lands_on(&body_with_feet_at(120.0, 405.0), 0.0, &plat(), 40.0));
    }

    #[test]
    fn test_tolerance_catches_fast_fall() {
        // Feet 30px below the platform's bottom edge
        assert!(lands_on(&body_with_feet_at(120.0, 454.0), 900.0, &plat(), 40.0));
        assert!(!lands_on(&body_with_feet_at(120.0, 470.0), 900.0, &plat(), 40.0));
    }

    #[test]
    fn test_never_lands_while_rising() {
        assert!(!lands_on(&body_with_feet_at(120.0, 405.0), -10.0, &plat(), 40.0));
    }

    #[test]
    fn test_requires_horizontal_overlap() {
        assert!(!lands_on(&body_with_feet_at(260.0, 405.0), 100.0, &plat(), 40.0));
        assert!(!lands_on(&body_with_feet_at(60.0, 405.0), 100.0, &plat(), 40.0));
        assert!(lands_on(&body_with_feet_at(61.0, 405.0), 100.0, &plat(), 40.0));
    }

    #[test]
    fn test_feet_above_top_do_not_land() {
        assert!(!lands_on(&body_with_feet_at(120.0, 400.0), 100.0, &plat(), 40.0));
    }
}
