//! Platform abstraction layer
//!
//! `driver` is host-agnostic and runs anywhere (tests, native headless runs).
//! `web` binds it to the browser: canvas, DOM events, animation frames.

pub mod driver;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::{DriverStats, Frame, LoopDriver, PointerHandle, ResizeHandle, register_all};
#[cfg(target_arch = "wasm32")]
pub use web::GravityHero;
