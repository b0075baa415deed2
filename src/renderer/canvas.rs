//! Replays draw commands on a browser 2D canvas context

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::DrawCommand;

/// Execute `commands` in order on `ctx`
pub fn replay(ctx: &CanvasRenderingContext2d, commands: &[DrawCommand]) -> Result<(), JsValue> {
    for command in commands {
        match *command {
            DrawCommand::Clear { width, height } => {
                ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
            }
            DrawCommand::Fill { color, alpha } => {
                ctx.set_fill_style_str(color);
                ctx.set_global_alpha(alpha as f64);
            }
            DrawCommand::Save => ctx.save(),
            DrawCommand::Restore => ctx.restore(),
            DrawCommand::Translate(offset) => ctx.translate(offset.x as f64, offset.y as f64)?,
            DrawCommand::Rotate(angle) => ctx.rotate(angle as f64)?,
            DrawCommand::Circle { center, radius } => {
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)?;
                ctx.fill();
            }
            DrawCommand::RoundRect {
                origin,
                size,
                corner,
            } => {
                ctx.begin_path();
                ctx.round_rect_with_f64(
                    origin.x as f64,
                    origin.y as f64,
                    size.x as f64,
                    size.y as f64,
                    corner as f64,
                )?;
                ctx.fill();
            }
        }
    }
    Ok(())
}
