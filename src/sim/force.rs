//! Geometry and force helpers
//!
//! Pure functions shared by the physics step and the cluster detector.

use glam::Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Impulse pulling a body at `pos` toward `target`
///
/// Falls off linearly from `strength` at the target to zero at `radius`.
/// Returns zero outside the radius and when the two points coincide, since
/// there is no direction to pull in.
pub fn attraction(pos: Vec2, target: Vec2, radius: f32, strength: f32) -> Vec2 {
    let delta = target - pos;
    let dist = delta.length();
    if dist <= 0.0 || dist >= radius {
        return Vec2::ZERO;
    }
    let force = (radius - dist) / radius * strength;
    delta / dist * force
}

/// Scale a velocity by a per-tick damping factor
#[inline]
pub fn damp(vel: Vec2, factor: f32) -> Vec2 {
    vel * factor
}
