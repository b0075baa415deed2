//! Simulation state and entity pool
//!
//! Everything the tick mutates lives in [`Field`]: the shape population, the
//! live burst sparks, and the RNG that generates both.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Shape kinds. A detonation needs one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Square,
    Pill,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Pill];

    /// Dense index for per-kind lookup tables
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ShapeKind::Circle => 0,
            ShapeKind::Square => 1,
            ShapeKind::Pill => 2,
        }
    }

    /// Weighted pick: 40% circle, 30% square, 30% pill
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        if rng.random::<f32>() > 0.6 {
            ShapeKind::Circle
        } else if rng.random::<f32>() > 0.5 {
            ShapeKind::Square
        } else {
            ShapeKind::Pill
        }
    }
}

/// A drifting shape
///
/// Kind, radius and spin are fixed at spawn and only readable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rotation (radians, unwrapped)
    pub angle: f32,
    kind: ShapeKind,
    radius: f32,
    spin: f32,
    born_tick: u64,
}

impl Shape {
    /// A motionless shape at `pos`
    pub fn new(id: u32, kind: ShapeKind, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            kind,
            radius: (SHAPE_MIN_RADIUS + SHAPE_MAX_RADIUS) / 2.0,
            spin: 0.0,
            born_tick: 0,
        }
    }

    /// Same shape with a fixed angular velocity
    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    /// A freshly generated shape somewhere inside `bounds`
    pub fn random<R: Rng>(id: u32, bounds: Vec2, born_tick: u64, rng: &mut R) -> Self {
        let x = rng.random::<f32>() * bounds.x;
        let y = rng.random::<f32>() * bounds.y;
        let vx = (rng.random::<f32>() - 0.5) * 2.0 * MAX_DRIFT_X;
        let vy = -(rng.random::<f32>() * (MAX_RISE - MIN_RISE) + MIN_RISE);
        let radius = rng.random::<f32>() * (SHAPE_MAX_RADIUS - SHAPE_MIN_RADIUS) + SHAPE_MIN_RADIUS;
        let kind = ShapeKind::roll(rng);
        let angle = rng.random::<f32>() * TAU;
        let spin = (rng.random::<f32>() - 0.5) * 2.0 * MAX_SPIN;

        Self {
            id,
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            angle,
            kind,
            radius,
            spin,
            born_tick,
        }
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Angular velocity (radians per tick)
    #[inline]
    pub fn spin(&self) -> f32 {
        self.spin
    }

    /// Tick the shape was spawned on
    #[inline]
    pub fn born_tick(&self) -> u64 {
        self.born_tick
    }
}

/// A spark thrown out by a detonation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left to live
    pub life: u32,
    /// Ticks it was born with
    pub max_life: u32,
}

impl BurstParticle {
    /// Remaining life as a fraction of the total, 1.0 when fresh
    #[inline]
    pub fn fade(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.life == 0
    }
}

/// Size of the drawing surface, in device-independent units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceState {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl SurfaceState {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Zero-area surfaces get neither physics nor rendering
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    #[inline]
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Backing-store size in physical pixels
    pub fn backing_size(&self) -> (u32, u32) {
        let ratio = if self.pixel_ratio > 0.0 {
            self.pixel_ratio
        } else {
            1.0
        };
        (
            (self.width.max(0.0) * ratio).round() as u32,
            (self.height.max(0.0) * ratio).round() as u32,
        )
    }
}

/// The entity pool: shapes, sparks, and the RNG that spawns them
#[derive(Debug, Clone)]
pub struct Field {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Ticks advanced so far
    pub time_ticks: u64,
    /// Live shapes, dense. Removal swaps the last shape into the hole.
    pub shapes: Vec<Shape>,
    /// Live sparks
    pub particles: Vec<BurstParticle>,
    rng: Pcg32,
    next_id: u32,
}

impl Field {
    /// Create an empty field with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            time_ticks: 0,
            shapes: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Create a field with `count` random shapes inside `bounds`
    pub fn populated(seed: u64, count: usize, bounds: Vec2) -> Self {
        let mut field = Self::new(seed);
        for _ in 0..count {
            field.spawn_shape(bounds);
        }
        field
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn one random shape inside `bounds`, returning its id
    pub fn spawn_shape(&mut self, bounds: Vec2) -> u32 {
        let id = self.next_entity_id();
        let shape = Shape::random(id, bounds, self.time_ticks, &mut self.rng);
        self.shapes.push(shape);
        id
    }

    /// Place a motionless shape of a given kind, returning its id
    pub fn insert_shape(&mut self, kind: ShapeKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let mut shape = Shape::new(id, kind, pos);
        shape.born_tick = self.time_ticks;
        self.shapes.push(shape);
        id
    }

    /// Throw `count` sparks out of `center` in an evenly spaced ring
    pub fn spawn_burst(&mut self, center: Vec2, count: usize, life: u32) {
        self.particles.reserve(count);
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let speed = self.rng.random::<f32>() * (BURST_MAX_SPEED - BURST_MIN_SPEED)
                + BURST_MIN_SPEED;
            self.particles.push(BurstParticle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life,
                max_life: life,
            });
        }
    }

    /// Remove shapes by index, returning them
    ///
    /// Duplicate and out-of-range indices are ignored. Indices are handled
    /// highest first so each swap only moves a shape that is being kept.
    pub fn remove_shapes_at(&mut self, indices: &[usize]) -> Vec<Shape> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut removed = Vec::with_capacity(sorted.len());
        for idx in sorted {
            if idx < self.shapes.len() {
                removed.push(self.shapes.swap_remove(idx));
            }
        }
        removed
    }

    /// Drop sparks with no life left, returning how many went
    pub fn remove_expired_particles(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_expired());
        before - self.particles.len()
    }

    /// Find a shape by id
    pub fn shape(&self, id: u32) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Uniform random x within `[0, width)`
    pub(crate) fn random_x(&mut self, width: f32) -> f32 {
        self.rng.random::<f32>() * width
    }
}
