//! Simulation tuning parameters
//!
//! Read from LocalStorage on the web; loaded from a JSON file on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{EngineError, EngineResult};

/// How the cluster detector finds neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NeighborIndex {
    /// Pairwise scan, O(n²)
    #[default]
    BruteForce,
    /// Uniform bucket grid with cells the size of the cluster radius
    Grid,
}

impl NeighborIndex {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeighborIndex::BruteForce => "brute_force",
            NeighborIndex::Grid => "grid",
        }
    }
}

/// Data-driven simulation and render parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Shapes created on activation
    pub population: usize,
    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,

    // === Physics ===
    /// Pointer attraction radius
    pub pointer_radius: f32,
    /// Peak attraction impulse per tick
    pub pointer_strength: f32,
    /// Per-tick velocity multiplier
    pub damping: f32,
    /// Off-screen distance before wraparound
    pub wrap_margin: f32,

    // === Clusters ===
    /// Neighbor distance for cluster detection
    pub cluster_radius: f32,
    /// Neighbor search strategy
    pub neighbor_index: NeighborIndex,
    /// Sparks per detonation
    pub burst_particles: usize,
    /// Spark lifetime in ticks
    pub burst_life: u32,

    // === Render ===
    pub shape_alpha: f32,
    pub particle_alpha: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            population: INITIAL_POPULATION,
            seed: None,

            pointer_radius: POINTER_RADIUS,
            pointer_strength: POINTER_STRENGTH,
            damping: DAMPING,
            wrap_margin: WRAP_MARGIN,

            cluster_radius: CLUSTER_RADIUS,
            neighbor_index: NeighborIndex::BruteForce,
            burst_particles: BURST_PARTICLES,
            burst_life: BURST_LIFE,

            shape_alpha: SHAPE_ALPHA,
            particle_alpha: PARTICLE_ALPHA,
        }
    }
}

impl Tuning {
    /// Tuning with a fixed seed, everything else default
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reject parameters the simulation can't run with
    pub fn validate(&self) -> EngineResult<()> {
        check(
            "pointer_radius",
            self.pointer_radius,
            self.pointer_radius > 0.0,
            "(0, ∞)",
        )?;
        check(
            "pointer_strength",
            self.pointer_strength,
            self.pointer_strength >= 0.0,
            "[0, ∞)",
        )?;
        check(
            "damping",
            self.damping,
            self.damping > 0.0 && self.damping <= 1.0,
            "(0, 1]",
        )?;
        check(
            "wrap_margin",
            self.wrap_margin,
            self.wrap_margin >= 0.0,
            "[0, ∞)",
        )?;
        check(
            "cluster_radius",
            self.cluster_radius,
            self.cluster_radius >= MIN_CLUSTER_RADIUS,
            "[1, ∞)",
        )?;
        check(
            "burst_particles",
            self.burst_particles as f32,
            self.burst_particles > 0,
            "[1, ∞)",
        )?;
        check(
            "burst_life",
            self.burst_life as f32,
            self.burst_life > 0,
            "[1, ∞)",
        )?;
        check(
            "shape_alpha",
            self.shape_alpha,
            (0.0..=1.0).contains(&self.shape_alpha),
            "[0, 1]",
        )?;
        check(
            "particle_alpha",
            self.particle_alpha,
            (0.0..=1.0).contains(&self.particle_alpha),
            "[0, 1]",
        )
    }

    /// Parse and validate a JSON tuning document. Missing fields take defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gravity_hero_tuning";

    /// Environment variable naming a JSON tuning file (used only on native)
    #[allow(dead_code)]
    const ENV_PATH: &'static str = "GRAVITY_HERO_TUNING";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Load tuning from the file named by `GRAVITY_HERO_TUNING`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_PATH) else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Smallest cluster radius the grid index can bucket without overflowing cell
/// coordinates
const MIN_CLUSTER_RADIUS: f32 = 1.0;

/// Non-finite values fail every range
fn check(name: &'static str, value: f32, ok: bool, expected: &'static str) -> EngineResult<()> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidTuning {
            name,
            value,
            expected,
        })
    }
}
