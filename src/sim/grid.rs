//! Uniform bucket grid for neighbor queries
//!
//! Cells are as wide as the query radius, so every neighbor of a point lies
//! in the 3×3 block of cells around it. Results come back in ascending shape
//! index, which keeps cluster selection identical to the pairwise scan.

use std::collections::HashMap;

use glam::Vec2;

use super::force::distance;
use super::state::Shape;

/// Shape indices bucketed by cell
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    /// Build a grid over `shapes` with cells of side `cell_size`
    pub fn build(shapes: &[Shape], cell_size: f32) -> Self {
        let mut grid = Self {
            cell_size,
            cells: HashMap::with_capacity(shapes.len()),
        };
        for (idx, shape) in shapes.iter().enumerate() {
            let cell = grid.world_to_cell(shape.pos);
            grid.cells.entry(cell).or_default().push(idx);
        }
        grid
    }

    fn world_to_cell(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Indices of shapes strictly closer than `radius` to shape `probe`
    ///
    /// `probe` itself comes first, the rest in ascending index.
    /// `radius` must not exceed the cell size.
    pub fn neighbors(&self, shapes: &[Shape], probe: usize, radius: f32) -> Vec<usize> {
        let pos = shapes[probe].pos;
        let (cx, cy) = self.world_to_cell(pos);

        let mut found = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                let cell = (cx.saturating_add(dx), cy.saturating_add(dy));
                if let Some(bucket) = self.cells.get(&cell) {
                    found.extend(
                        bucket
                            .iter()
                            .copied()
                            .filter(|&j| j != probe && distance(pos, shapes[j].pos) < radius),
                    );
                }
            }
        }
        // Offsets clamped at the i32 edge can revisit a cell
        found.sort_unstable();
        found.dedup();
        found.insert(0, probe);
        found
    }

    /// Number of occupied cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}
