//! Petri dish boundary geometry
//!
//! The dish is an origin-centered circle. Autonomous entities bounce off the
//! wall by reversing heading; the player is simply refused the move.

use glam::Vec2;

use crate::consts::{ARENA_RADIUS, PROJECTILE_KILL_RADIUS};

/// Distance of a point from the dish center
#[inline]
pub fn radius(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

/// Same as [`radius`] for a vector
#[inline]
pub fn radius_of(pos: Vec2) -> f32 {
    radius(pos.x, pos.y)
}

/// True if `pos` is strictly inside the containment wall
#[inline]
pub fn within_containment(pos: Vec2) -> bool {
    radius_of(pos) < ARENA_RADIUS
}

/// True if a projectile at `pos` has left the dish and should despawn
#[inline]
pub fn beyond_kill_radius(pos: Vec2) -> bool {
    radius_of(pos) > PROJECTILE_KILL_RADIUS
}

/// Heading to travel with this tick for an autonomous mover.
///
/// If stepping `step` along `heading` from `pos` would reach the wall, the
/// heading is flipped by π. This is a reversal, not a reflection about the
/// wall tangent.
#[inline]
pub fn bounce_heading(pos: Vec2, heading: f32, step: f32) -> f32 {
    let next = pos + crate::direction_from_angle(heading) * step;
    if radius_of(next) >= ARENA_RADIUS {
        crate::normalize_angle(heading + std::f32::consts::PI)
    } else {
        heading
    }
}
