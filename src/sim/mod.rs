//! Deterministic simulation module
//!
//! All behavior lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (dense shape array)
//! - No rendering or platform dependencies

pub mod cluster;
pub mod force;
pub mod grid;
pub mod physics;
pub mod state;
pub mod tick;

pub use cluster::{Cluster, Detonation, find_cluster, resolve_clusters};
pub use force::{attraction, damp, distance};
pub use grid::SpatialGrid;
pub use physics::{step_physics, wrap_x};
pub use state::{BurstParticle, Field, Shape, ShapeKind, SurfaceState};
pub use tick::{TickInput, tick};
