//! Removal of grid points with no retained neighbor.

use std::collections::HashSet;

use crate::core::{GridKey, Position};

/// Drops discovered points that have no cardinal neighbor in the set.
///
/// Points are keyed by their cell index on the exploration lattice, anchored
/// at the first point. A neighbor is the point one index away along x or z,
/// so drift well under half a step never splits a true pair.
#[derive(Clone, Debug)]
pub struct ReachabilityPruner {
    move_magnitude: f32,
}

impl ReachabilityPruner {
    pub fn new(move_magnitude: f32) -> Self {
        Self { move_magnitude }
    }

    /// Retain points with at least one cardinal neighbor, preserving order.
    pub fn prune(&self, points: &[Position]) -> Vec<Position> {
        let Some(origin) = points.first().copied() else {
            return Vec::new();
        };
        let key = |p: &Position| GridKey::on_lattice(p, &origin, self.move_magnitude);
        let keys: HashSet<GridKey> = points.iter().map(key).collect();

        let retained: Vec<Position> = points
            .iter()
            .filter(|p| {
                let k = key(*p);
                [(1, 0), (-1, 0), (0, 1), (0, -1)]
                    .iter()
                    .any(|&(dx, dz)| keys.contains(&k.step(dx, dz)))
            })
            .copied()
            .collect();

        if retained.len() < points.len() {
            tracing::info!(
                "Pruned {} isolated points, {} remain",
                points.len() - retained.len(),
                retained.len()
            );
        }
        retained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::IslandDetector;

    fn p(x: f32, z: f32) -> Position {
        Position::new(x, 0.9, z)
    }

    #[test]
    fn test_isolated_point_removed() {
        let pruner = ReachabilityPruner::new(0.25);
        let points = vec![p(0.0, 0.0), p(0.25, 0.0), p(1.0, 1.0)];
        assert_eq!(pruner.prune(&points), vec![p(0.0, 0.0), p(0.25, 0.0)]);
    }

    #[test]
    fn test_order_preserved_and_fixed_point() {
        let pruner = ReachabilityPruner::new(0.25);
        let points = vec![p(0.5, 0.0), p(3.0, 3.0), p(0.0, 0.0), p(0.25, 0.0)];
        let once = pruner.prune(&points);
        assert_eq!(once, vec![p(0.5, 0.0), p(0.0, 0.0), p(0.25, 0.0)]);
        assert_eq!(pruner.prune(&once), once);
    }

    #[test]
    fn test_float_noise_matches_neighbor() {
        let pruner = ReachabilityPruner::new(0.25);
        let points = vec![p(0.0, 0.0), p(0.2501, -0.0002)];
        assert_eq!(pruner.prune(&points).len(), 2);
    }

    #[test]
    fn test_drift_across_rounding_edge_keeps_pair() {
        // Both sit next to a 1cm rounding edge, on opposite sides
        let points = vec![p(0.0049, 0.0), p(0.2551, 0.0)];
        assert_eq!(ReachabilityPruner::new(0.25).prune(&points), points);
        assert!(!IslandDetector::new(0.25, 0.05).has_islands(&points));
    }

    #[test]
    fn test_diagonal_only_is_not_a_neighbor() {
        let pruner = ReachabilityPruner::new(0.25);
        let points = vec![p(0.0, 0.0), p(0.25, 0.25)];
        assert!(pruner.prune(&points).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(ReachabilityPruner::new(0.25).prune(&[]).is_empty());
    }
}
