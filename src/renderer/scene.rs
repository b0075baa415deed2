//! Render pass: turns the field into 2D canvas draw commands
//!
//! Reads simulation state only. Sparks are drawn first, then shapes, each
//! shape in its own translated and rotated frame.

use glam::Vec2;

use super::theme::Theme;
use crate::consts::PARTICLE_RADIUS;
use crate::sim::{Field, Shape, ShapeKind, SurfaceState};
use crate::tuning::Tuning;

/// Corner radius for square shapes
const SQUARE_CORNER: f32 = 4.0;
/// Pill length and thickness relative to shape radius
const PILL_LENGTH: f32 = 2.5;
const PILL_THICKNESS: f32 = 0.8;

/// One immediate-mode canvas operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole surface
    Clear { width: f32, height: f32 },
    /// Set fill color and global alpha for what follows
    Fill { color: &'static str, alpha: f32 },
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    /// Filled disk
    Circle { center: Vec2, radius: f32 },
    /// Filled rounded rectangle with top-left corner at `origin`
    RoundRect { origin: Vec2, size: Vec2, corner: f32 },
}

/// Build the draw commands for one frame
///
/// A zero-area surface yields no commands.
pub fn render_scene(
    field: &Field,
    surface: &SurfaceState,
    theme: Theme,
    tuning: &Tuning,
) -> Vec<DrawCommand> {
    if surface.is_empty() {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(2 + field.particles.len() * 2 + field.shapes.len() * 5);
    commands.push(DrawCommand::Clear {
        width: surface.width,
        height: surface.height,
    });

    for particle in &field.particles {
        commands.push(DrawCommand::Fill {
            color: theme.particle_color(),
            alpha: particle.fade() * tuning.particle_alpha,
        });
        commands.push(DrawCommand::Circle {
            center: particle.pos,
            radius: PARTICLE_RADIUS,
        });
    }

    if !field.shapes.is_empty() {
        commands.push(DrawCommand::Fill {
            color: theme.shape_color(),
            alpha: tuning.shape_alpha,
        });
    }
    for shape in &field.shapes {
        commands.push(DrawCommand::Save);
        commands.push(DrawCommand::Translate(shape.pos));
        commands.push(DrawCommand::Rotate(shape.angle));
        commands.push(shape_primitive(shape));
        commands.push(DrawCommand::Restore);
    }

    commands
}

/// The shape's outline in its local frame, centered on the origin
pub fn shape_primitive(shape: &Shape) -> DrawCommand {
    let r = shape.radius();
    match shape.kind() {
        ShapeKind::Circle => DrawCommand::Circle {
            center: Vec2::ZERO,
            radius: r,
        },
        ShapeKind::Square => DrawCommand::RoundRect {
            origin: Vec2::splat(-r),
            size: Vec2::splat(r * 2.0),
            corner: SQUARE_CORNER,
        },
        ShapeKind::Pill => {
            let size = Vec2::new(r * PILL_LENGTH, r * PILL_THICKNESS);
            DrawCommand::RoundRect {
                origin: -size / 2.0,
                size,
                corner: size.y / 2.0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> SurfaceState {
        SurfaceState::new(640.0, 480.0, 1.0)
    }

    #[test]
    fn test_clears_then_sparks_then_shapes() {
        let mut field = Field::new(3);
        field.insert_shape(ShapeKind::Circle, Vec2::new(10.0, 10.0));
        field.spawn_burst(Vec2::new(50.0, 50.0), 12, 30);

        let commands = render_scene(&field, &surface(), Theme::Light, &Tuning::default());

        assert_eq!(
            commands[0],
            DrawCommand::Clear {
                width: 640.0,
                height: 480.0
            }
        );
        let first_save = commands
            .iter()
            .position(|c| *c == DrawCommand::Save)
            .unwrap();
        let last_spark = commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Circle { radius, .. } if *radius == PARTICLE_RADIUS))
            .unwrap();
        assert!(last_spark < first_save);
        assert_eq!(commands.len(), 1 + 12 * 2 + 1 + 5);
    }

    #[test]
    fn test_spark_alpha_fades_with_life() {
        let mut field = Field::new(3);
        field.spawn_burst(Vec2::ZERO, 1, 30);
        field.particles[0].life = 15;

        let commands = render_scene(&field, &surface(), Theme::Dark, &Tuning::default());
        assert_eq!(
            commands[1],
            DrawCommand::Fill {
                color: "#ffffff",
                alpha: 0.5 * 0.6
            }
        );
    }

    #[test]
    fn test_shapes_drawn_in_rotated_frame() {
        let mut field = Field::new(3);
        field.insert_shape(ShapeKind::Square, Vec2::new(30.0, 40.0));
        field.shapes[0].angle = 1.25;

        let commands = render_scene(&field, &surface(), Theme::Light, &Tuning::default());
        assert_eq!(
            &commands[1..],
            &[
                DrawCommand::Fill {
                    color: "#18181b",
                    alpha: 0.15
                },
                DrawCommand::Save,
                DrawCommand::Translate(Vec2::new(30.0, 40.0)),
                DrawCommand::Rotate(1.25),
                DrawCommand::RoundRect {
                    origin: Vec2::splat(-7.0),
                    size: Vec2::splat(14.0),
                    corner: 4.0
                },
                DrawCommand::Restore,
            ]
        );
    }

    #[test]
    fn test_pill_proportions() {
        let shape = Shape::new(1, ShapeKind::Pill, Vec2::ZERO);
        let DrawCommand::RoundRect {
            origin,
            size,
            corner,
        } = shape_primitive(&shape)
        else {
            panic!("pill should be a rounded rect");
        };
        assert!((size.x - 7.0 * 2.5).abs() < 1e-5);
        assert!((size.y - 7.0 * 0.8).abs() < 1e-5);
        assert_eq!(origin, -size / 2.0);
        assert_eq!(corner, size.y / 2.0);
    }

    #[test]
    fn test_empty_surface_draws_nothing() {
        let field = Field::populated(3, 10, Vec2::new(100.0, 100.0));
        let flat = SurfaceState::new(0.0, 0.0, 1.0);
        assert!(render_scene(&field, &flat, Theme::Light, &Tuning::default()).is_empty());
    }

    #[test]
    fn test_render_does_not_touch_state() {
        let field = Field::populated(8, 20, Vec2::new(640.0, 480.0));
        let before = field.shapes.clone();
        let _ = render_scene(&field, &surface(), Theme::Dark, &Tuning::default());
        assert_eq!(field.shapes, before);
    }
}
