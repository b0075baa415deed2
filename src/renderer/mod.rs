//! 2D canvas rendering module
//!
//! The render pass is pure: it turns simulation state into `DrawCommand`s.
//! On the web those commands are replayed on a `CanvasRenderingContext2d`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;
pub mod theme;

pub use scene::{DrawCommand, render_scene};
pub use theme::Theme;
