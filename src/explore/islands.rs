//! Connectivity check over discovered grid points.

use crate::core::{MoveVector, Position};

/// Detects discovered points that are not reachable from the first one.
///
/// Works purely on the point set; no simulation calls are made.
#[derive(Clone, Debug)]
pub struct IslandDetector {
    move_magnitude: f32,
    epsilon: f32,
}

impl IslandDetector {
    /// `epsilon` is the floor distance under which two points are the same cell
    pub fn new(move_magnitude: f32, epsilon: f32) -> Self {
        Self {
            move_magnitude,
            epsilon,
        }
    }

    /// Points reachable from `points[0]` by cardinal steps, as indices into `points`
    pub fn connected_component(&self, points: &[Position]) -> Vec<usize> {
        let Some(first) = points.first() else {
            return Vec::new();
        };

        let mut reached = vec![false; points.len()];
        reached[0] = true;
        let mut stack = vec![*first];
        let mut component = vec![0];

        while let Some(current) = stack.pop() {
            for step in MoveVector::cardinal(self.move_magnitude) {
                let neighbor = current + step;
                for (i, p) in points.iter().enumerate() {
                    if !reached[i] && p.floor_distance(&neighbor) < self.epsilon {
                        reached[i] = true;
                        component.push(i);
                        stack.push(*p);
                    }
                }
            }
        }

        component
    }

    /// True iff some discovered point is unreachable from the first one.
    pub fn has_islands(&self, points: &[Position]) -> bool {
        let reached = self.connected_component(points).len();
        let islands = reached < points.len();
        if islands {
            tracing::warn!(
                "Grid has islands: {} of {} points connected",
                reached,
                points.len()
            );
        }
        islands
    }
}
