//! Cluster detection and detonation
//!
//! A cluster is a shape whose neighborhood (itself plus every shape within
//! the cluster radius) holds at least one circle, one square and one pill.
//! The first such shape in dense-array order wins; from its neighborhood the
//! first shape of each kind is taken, not the closest. At most one cluster
//! detonates per tick even when several exist.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::force::distance;
use super::grid::SpatialGrid;
use super::state::{Field, Shape, ShapeKind};
use crate::tuning::{NeighborIndex, Tuning};

/// Three shapes, one per kind, close enough to detonate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    /// Shape indices ordered circle, square, pill
    pub members: [usize; 3],
    pub centroid: Vec2,
}

/// What a detonation did to the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detonation {
    /// Tick the detonation happened on
    pub tick: u64,
    pub centroid: Vec2,
    /// Ids of the consumed shapes (circle, square, pill)
    pub removed: [u32; 3],
    /// Ids of the replacement shapes
    pub spawned: [u32; 3],
}

/// Pairwise neighbor scan: `probe` first, then every other shape within
/// `radius` in ascending index
pub fn neighbors_brute_force(shapes: &[Shape], probe: usize, radius: f32) -> Vec<usize> {
    let pos = shapes[probe].pos;
    let mut found = vec![probe];
    found.extend(
        shapes
            .iter()
            .enumerate()
            .filter(|&(j, s)| j != probe && distance(pos, s.pos) < radius)
            .map(|(j, _)| j),
    );
    found
}

/// First shape of each kind in neighborhood order
fn one_of_each(shapes: &[Shape], neighborhood: &[usize]) -> Option<[usize; 3]> {
    let mut picks: [Option<usize>; 3] = [None; 3];
    for &idx in neighborhood {
        let slot = &mut picks[shapes[idx].kind().index()];
        if slot.is_none() {
            *slot = Some(idx);
        }
    }
    match picks {
        [Some(c), Some(s), Some(p)] => Some([c, s, p]),
        _ => None,
    }
}

/// Find the first qualifying cluster, if any
pub fn find_cluster(shapes: &[Shape], radius: f32, index: NeighborIndex) -> Option<Cluster> {
    if shapes.len() < ShapeKind::ALL.len() {
        return None;
    }

    let grid = match index {
        NeighborIndex::BruteForce => None,
        NeighborIndex::Grid => Some(SpatialGrid::build(shapes, radius)),
    };

    for probe in 0..shapes.len() {
        let neighborhood = match &grid {
            Some(grid) => grid.neighbors(shapes, probe, radius),
            None => neighbors_brute_force(shapes, probe, radius),
        };
        if neighborhood.len() < ShapeKind::ALL.len() {
            continue;
        }

        if let Some(members) = one_of_each(shapes, &neighborhood) {
            let centroid = members
                .iter()
                .fold(Vec2::ZERO, |acc, &i| acc + shapes[i].pos)
                / members.len() as f32;
            return Some(Cluster { members, centroid });
        }
    }

    None
}

/// Burst the cluster: sparks at its centroid, its shapes replaced by fresh ones
pub fn detonate(field: &mut Field, cluster: &Cluster, bounds: Vec2, tuning: &Tuning) -> Detonation {
    field.spawn_burst(cluster.centroid, tuning.burst_particles, tuning.burst_life);

    let removed_ids = cluster.members.map(|i| field.shapes[i].id);
    let removed = field.remove_shapes_at(&cluster.members);
    debug_assert_eq!(removed.len(), 3);

    let spawned = [
        field.spawn_shape(bounds),
        field.spawn_shape(bounds),
        field.spawn_shape(bounds),
    ];

    Detonation {
        tick: field.time_ticks,
        centroid: cluster.centroid,
        removed: removed_ids,
        spawned,
    }
}

/// Detonate the first qualifying cluster, if there is one
pub fn resolve_clusters(field: &mut Field, bounds: Vec2, tuning: &Tuning) -> Option<Detonation> {
    let cluster = find_cluster(&field.shapes, tuning.cluster_radius, tuning.neighbor_index)?;
    let detonation = detonate(field, &cluster, bounds, tuning);
    log::debug!(
        "Detonation at ({:.1}, {:.1}) on tick {}, {} shapes live",
        detonation.centroid.x,
        detonation.centroid.y,
        detonation.tick,
        field.shapes.len()
    );
    Some(detonation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn field_with(shapes: &[(ShapeKind, f32, f32)]) -> Field {
        let mut field = Field::new(11);
        for &(kind, x, y) in shapes {
            field.insert_shape(kind, Vec2::new(x, y));
        }
        field
    }

    #[test]
    fn test_single_triple_detonates_once() {
        let mut field = field_with(&[
            (ShapeKind::Circle, 700.0, 500.0),
            (ShapeKind::Circle, 100.0, 100.0),
            (ShapeKind::Square, 120.0, 100.0),
            (ShapeKind::Pill, 110.0, 120.0),
        ]);
        let tuning = Tuning::default();

        let det = resolve_clusters(&mut field, BOUNDS, &tuning).unwrap();

        assert_eq!(det.removed, [2, 3, 4]);
        assert!((det.centroid - Vec2::new(110.0, 320.0 / 3.0)).length() < 1e-4);
        assert_eq!(field.shapes.len(), 4);
        for id in det.removed {
            assert!(field.shape(id).is_none());
        }
        for id in det.spawned {
            assert!(field.shape(id).is_some());
        }
        assert!(field.shape(1).is_some());
        assert_eq!(field.particles.len(), 12);
        assert!(field.particles.iter().all(|p| p.pos == det.centroid));
    }

    #[test]
    fn test_two_kinds_never_detonate() {
        let mut field = field_with(&[
            (ShapeKind::Circle, 100.0, 100.0),
            (ShapeKind::Square, 110.0, 100.0),
            (ShapeKind::Square, 100.0, 110.0),
            (ShapeKind::Circle, 105.0, 105.0),
        ]);
        assert!(resolve_clusters(&mut field, BOUNDS, &Tuning::default()).is_none());
        assert_eq!(field.shapes.len(), 4);
        assert!(field.particles.is_empty());
    }

    #[test]
    fn test_spread_out_triple_does_not_detonate() {
        // Each pair is 60 or more apart
        let shapes = field_with(&[
            (ShapeKind::Circle, 0.0, 0.0),
            (ShapeKind::Square, 60.0, 0.0),
            (ShapeKind::Pill, 30.0, 60.0),
        ])
        .shapes;
        assert!(find_cluster(&shapes, 60.0, NeighborIndex::BruteForce).is_none());
    }

    #[test]
    fn test_chain_through_probe_counts() {
        // Square and pill are 80 apart but both within 60 of the circle
        let shapes = field_with(&[
            (ShapeKind::Square, 60.0, 100.0),
            (ShapeKind::Circle, 100.0, 100.0),
            (ShapeKind::Pill, 140.0, 100.0),
        ])
        .shapes;
        let cluster = find_cluster(&shapes, 60.0, NeighborIndex::BruteForce).unwrap();
        assert_eq!(cluster.members, [1, 0, 2]);
    }

    #[test]
    fn test_first_found_not_closest() {
        let shapes = field_with(&[
            (ShapeKind::Circle, 100.0, 100.0),
            (ShapeKind::Square, 150.0, 100.0),
            (ShapeKind::Square, 101.0, 100.0),
            (ShapeKind::Pill, 100.0, 101.0),
        ])
        .shapes;
        let cluster = find_cluster(&shapes, 60.0, NeighborIndex::BruteForce).unwrap();
        assert_eq!(cluster.members, [0, 1, 3]);
    }

    #[test]
    fn test_one_detonation_per_call() {
        let mut field = field_with(&[
            (ShapeKind::Circle, 100.0, 100.0),
            (ShapeKind::Square, 110.0, 100.0),
            (ShapeKind::Pill, 100.0, 110.0),
            (ShapeKind::Circle, 600.0, 400.0),
            (ShapeKind::Square, 610.0, 400.0),
            (ShapeKind::Pill, 600.0, 410.0),
        ]);
        let det = resolve_clusters(&mut field, BOUNDS, &Tuning::default()).unwrap();
        assert_eq!(det.removed, [1, 2, 3]);
        assert_eq!(field.shapes.len(), 6);
        assert_eq!(field.particles.len(), 12);
        // The far triple is untouched
        for id in [4, 5, 6] {
            assert!(field.shape(id).is_some());
        }
    }

    #[test]
    fn test_fewer_than_three_shapes() {
        let shapes = field_with(&[
            (ShapeKind::Circle, 0.0, 0.0),
            (ShapeKind::Pill, 1.0, 0.0),
        ])
        .shapes;
        assert!(find_cluster(&shapes, 60.0, NeighborIndex::Grid).is_none());
    }

    fn kind_strategy() -> impl Strategy<Value = ShapeKind> {
        prop_oneof![
            Just(ShapeKind::Circle),
            Just(ShapeKind::Square),
            Just(ShapeKind::Pill),
        ]
    }

    proptest! {
        #[test]
        fn prop_grid_matches_brute_force(
            points in proptest::collection::vec(
                (kind_strategy(), -50.0f32..400.0, -50.0f32..300.0),
                0..60,
            ),
        ) {
            let shapes = field_with(&points).shapes;
            let brute = find_cluster(&shapes, 60.0, NeighborIndex::BruteForce);
            let grid = find_cluster(&shapes, 60.0, NeighborIndex::Grid);
            prop_assert_eq!(brute, grid);
        }

        #[test]
        fn prop_detonation_conserves_population(
            points in proptest::collection::vec(
                (kind_strategy(), 0.0f32..200.0, 0.0f32..200.0),
                3..40,
            ),
        ) {
            let mut field = field_with(&points);
            let before = field.shapes.len();
            let det = resolve_clusters(&mut field, BOUNDS, &Tuning::default());
            prop_assert_eq!(field.shapes.len(), before);
            if det.is_some() {
                prop_assert_eq!(field.particles.len(), 12);
            } else {
                prop_assert!(field.particles.is_empty());
            }
        }
    }
}
