//! Simulation tick
//!
//! One tick = physics step, then cluster detection. Rendering is separate
//! and never runs mid-tick.

use glam::Vec2;

use super::cluster::{Detonation, resolve_clusters};
use super::physics::step_physics;
use super::state::{Field, SurfaceState};
use crate::tuning::Tuning;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Last known pointer position (surface-local), None until the pointer
    /// has moved over the page
    pub pointer: Option<Vec2>,
}

/// Advance the field by one tick
///
/// Returns the detonation, if one happened. A zero-area surface leaves the
/// field untouched.
pub fn tick(
    field: &mut Field,
    surface: &SurfaceState,
    input: &TickInput,
    tuning: &Tuning,
) -> Option<Detonation> {
    if surface.is_empty() {
        return None;
    }

    field.time_ticks += 1;
    step_physics(field, surface, input.pointer, tuning);
    resolve_clusters(field, surface.bounds(), tuning)
}
