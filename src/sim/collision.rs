//! Collision detection and response against the ring wall
//!
//! The wall is a circle, so every contact is radial: the normal is the unit
//! vector from the center to the ball, and the ball is pushed back onto the
//! circle of radius `ring.radius - ball.radius` along that same direction.

use glam::Vec2;

use super::ring::{Ring, SegmentColor};
use crate::cartesian_to_polar;

/// Result of a wall contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the ball touched or crossed the wall
    pub hit: bool,
    /// Clamped ball center on the contact circle (if hit)
    pub point: Vec2,
    /// Outward unit radial vector at the contact
    pub normal: Vec2,
    /// World angle of the contact
    pub theta: f32,
    /// Ring color under the contact
    pub segment: SegmentColor,
    /// How far past the contact circle the ball was
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            theta: 0.0,
            segment: SegmentColor::Neutral,
            penetration: 0.0,
        }
    }
}

/// Check a ball against the ring wall at the ring's current rotation
pub fn ball_ring_collision(ball_pos: Vec2, ball_radius: f32, ring: &Ring) -> CollisionResult {
    let (r, theta) = cartesian_to_polar(ball_pos);
    let limit = ring.contact_radius(ball_radius);

    if r < limit {
        return CollisionResult::miss();
    }

    // r >= limit > 0, so the direction is well defined
    let normal = ball_pos / r;
    CollisionResult {
        hit: true,
        point: normal * limit,
        normal,
        theta,
        segment: ring.color_at(theta),
        penetration: r - limit,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
