//! Gravity Hero - an interactive canvas background
//!
//! Small shapes drift upward, lean toward the pointer, and burst when one of
//! each kind gathers in the same spot.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity pool, physics, cluster detection)
//! - `renderer`: Pure render pass producing 2D canvas draw commands
//! - `platform`: Loop driver and browser wiring
//! - `tuning`: Data-driven simulation parameters

pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::{EngineError, EngineResult};
pub use tuning::Tuning;

/// Simulation constants
pub mod consts {
    /// Shapes created on activation
    pub const INITIAL_POPULATION: usize = 50;

    /// Pointer attraction reaches this far (surface units)
    pub const POINTER_RADIUS: f32 = 150.0;
    /// Impulse added per tick when a shape sits right on the pointer
    pub const POINTER_STRENGTH: f32 = 0.2;
    /// Velocity multiplier applied every tick
    pub const DAMPING: f32 = 0.96;

    /// How far past an edge a shape may drift before it wraps
    pub const WRAP_MARGIN: f32 = 50.0;

    /// Shapes closer than this count as neighbors
    pub const CLUSTER_RADIUS: f32 = 60.0;

    /// Spark count per detonation
    pub const BURST_PARTICLES: usize = 12;
    /// Spark lifetime in ticks
    pub const BURST_LIFE: u32 = 30;
    /// Spark speed range (surface units per tick)
    pub const BURST_MIN_SPEED: f32 = 1.0;
    pub const BURST_MAX_SPEED: f32 = 3.0;

    /// Shape radius range
    pub const SHAPE_MIN_RADIUS: f32 = 4.0;
    pub const SHAPE_MAX_RADIUS: f32 = 10.0;
    /// Horizontal spawn velocity is drawn from [-MAX_DRIFT_X, MAX_DRIFT_X)
    pub const MAX_DRIFT_X: f32 = 0.2;
    /// Vertical spawn velocity is drawn from [-MAX_RISE, -MIN_RISE)
    pub const MIN_RISE: f32 = 0.1;
    pub const MAX_RISE: f32 = 0.3;
    /// Angular velocity is drawn from [-MAX_SPIN, MAX_SPIN)
    pub const MAX_SPIN: f32 = 0.01;

    /// Render opacity for shapes
    pub const SHAPE_ALPHA: f32 = 0.15;
    /// Render opacity for a fresh spark (fades with remaining life)
    pub const PARTICLE_ALPHA: f32 = 0.6;
    /// Spark disk radius
    pub const PARTICLE_RADIUS: f32 = 1.5;
}
