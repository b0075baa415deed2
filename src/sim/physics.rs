//! Physics step
//!
//! Advances every shape and spark by one tick: pointer pull, damping,
//! integration, and wraparound for shapes; drift and aging for sparks.

use glam::Vec2;

use super::force::{attraction, damp};
use super::state::{Field, SurfaceState};
use crate::tuning::Tuning;

/// Advance all shapes and sparks by one tick
///
/// Expired sparks are dropped at the end of the pass.
pub fn step_physics(
    field: &mut Field,
    surface: &SurfaceState,
    pointer: Option<Vec2>,
    tuning: &Tuning,
) {
    for particle in field.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    field.remove_expired_particles();

    let margin = tuning.wrap_margin;
    for i in 0..field.shapes.len() {
        let shape = &mut field.shapes[i];

        if let Some(target) = pointer {
            shape.vel += attraction(
                shape.pos,
                target,
                tuning.pointer_radius,
                tuning.pointer_strength,
            );
        }
        shape.vel = damp(shape.vel, tuning.damping);
        shape.pos += shape.vel;
        shape.angle += shape.spin();

        // Drifted off the top: re-enter from below at a random column
        if shape.pos.y < -margin {
            shape.pos.y = surface.height + margin;
            let x = field.random_x(surface.width);
            field.shapes[i].pos.x = x;
        }

        let shape = &mut field.shapes[i];
        shape.pos.x = wrap_x(shape.pos.x, surface.width, margin);
    }
}

/// Horizontal wraparound with `margin` units of slack past each edge
#[inline]
pub fn wrap_x(x: f32, width: f32, margin: f32) -> f32 {
    if x < -margin {
        width + margin
    } else if x > width + margin {
        -margin
    } else {
        x
    }
}
