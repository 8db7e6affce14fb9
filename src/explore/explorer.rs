//! Breadth-first grid discovery.
//!
//! The explorer never plans a path. Every frontier entry is checked by
//! teleporting to its start position and attempting one axis-aligned move;
//! whatever position the simulation reports after a successful move becomes a
//! grid point.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::controller::Controller;
use crate::core::{MoveVector, Position};
use crate::error::{DrishtiError, Result};
use crate::protocol::{ActionRequest, SimulationHost};

/// Runtime explorer settings.
#[derive(Clone, Debug)]
pub struct ExplorerConfig {
    /// Step length of every move (meters)
    pub move_magnitude: f32,
    /// Agent height ceiling; a higher agent aborts the search
    pub max_agent_y: f32,
    /// Candidates closer than this to a seen point are dropped (meters)
    pub dedup_threshold: f32,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            move_magnitude: 0.25,
            max_agent_y: 1.3,
            dedup_threshold: 0.05,
        }
    }
}

/// A pending, unconfirmed move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrontierEntry {
    /// Where the agent is teleported before moving
    pub start: Position,
    /// The move to attempt from `start`
    pub move_vector: MoveVector,
}

impl FrontierEntry {
    /// Position the move should land on
    pub fn target(&self) -> Position {
        self.start + self.move_vector
    }
}

/// Accepted candidate positions with tolerance-based membership.
#[derive(Clone, Debug)]
pub struct SeenPointSet {
    points: Vec<Position>,
    threshold: f32,
}

impl SeenPointSet {
    pub fn new(threshold: f32) -> Self {
        Self {
            points: Vec::new(),
            threshold,
        }
    }

    /// True if some seen point lies within the threshold on the floor plane
    pub fn contains_near(&self, position: &Position) -> bool {
        self.points
            .iter()
            .any(|p| p.floor_distance(position) < self.threshold)
    }

    /// Insert unless a seen point is too close. Returns whether it was added.
    pub fn insert(&mut self, position: Position) -> bool {
        if self.contains_near(&position) {
            return false;
        }
        self.points.push(position);
        true
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.points.iter()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Counters from one exploration run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSummary {
    /// Frontier entries popped and tried
    pub expansions: usize,
    /// Moves the simulation refused
    pub rejected_moves: usize,
    /// Teleports the simulation refused
    pub failed_teleports: usize,
    /// Grid points held after the run
    pub grid_points: usize,
}

/// BFS frontier search over axis-aligned moves.
///
/// Owns the frontier, the seen-set and the discovered grid points. Grid
/// points only grow here; removal is the pruner's job.
pub struct GridExplorer {
    config: ExplorerConfig,
    frontier: VecDeque<FrontierEntry>,
    seen: SeenPointSet,
    grid_points: Vec<Position>,
    allow_enqueue: bool,
}

impl GridExplorer {
    pub fn new(config: ExplorerConfig) -> Self {
        let seen = SeenPointSet::new(config.dedup_threshold);
        Self {
            config,
            frontier: VecDeque::new(),
            seen,
            grid_points: Vec::new(),
            allow_enqueue: true,
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Queue the four cardinal moves from `position` whose targets are new.
    ///
    /// Does nothing while enqueueing is disabled.
    pub fn enqueue_points(&mut self, position: Position) {
        if !self.allow_enqueue {
            return;
        }
        for move_vector in MoveVector::cardinal(self.config.move_magnitude) {
            self.enqueue(FrontierEntry {
                start: position,
                move_vector,
            });
        }
    }

    /// Queue a single entry if its target has not been seen.
    ///
    /// Returns whether the entry was queued.
    pub fn enqueue(&mut self, entry: FrontierEntry) -> bool {
        if !self.seen.insert(entry.target()) {
            return false;
        }
        self.frontier.push_back(entry);
        true
    }

    /// Enable or disable frontier growth from newly confirmed points
    pub fn set_allow_enqueue(&mut self, allow: bool) {
        self.allow_enqueue = allow;
    }

    pub fn allow_enqueue(&self) -> bool {
        self.allow_enqueue
    }

    /// Queue moves from every point of a known grid, then freeze the frontier.
    ///
    /// The following [`run`](Self::run) only confirms which of those moves
    /// still succeed; it never discovers cells outside the supplied grid's
    /// one-step neighborhood.
    pub fn seed_grid(&mut self, grid: &[Position]) {
        self.allow_enqueue = true;
        for position in grid {
            self.enqueue_points(*position);
        }
        self.allow_enqueue = false;
        tracing::debug!(
            "Seeded {} frontier entries from {} grid points",
            self.frontier.len(),
            grid.len()
        );
    }

    /// Drain the frontier.
    ///
    /// Refused teleports and moves drop the entry. An agent height above
    /// the configured ceiling is an invariant violation and stops the run.
    pub fn run<H: SimulationHost>(
        &mut self,
        controller: &mut Controller<H>,
    ) -> Result<ExplorationSummary> {
        let mut summary = ExplorationSummary::default();

        while let Some(entry) = self.frontier.pop_front() {
            summary.expansions += 1;

            if !controller.teleport(entry.start)?.last_action_success {
                summary.failed_teleports += 1;
                tracing::debug!("Teleport to {:?} refused", entry.start);
                continue;
            }

            let magnitude = entry
                .move_vector
                .magnitude
                .unwrap_or(self.config.move_magnitude);
            let observation = controller.step(&ActionRequest::Move {
                x: entry.move_vector.dx,
                z: entry.move_vector.dz,
                move_magnitude: magnitude,
            })?;

            if !observation.last_action_success {
                summary.rejected_moves += 1;
                continue;
            }

            let position = observation.agent_position();
            if position.y > self.config.max_agent_y {
                return Err(DrishtiError::InvariantViolation(format!(
                    "agent at y={:.3} above ceiling {:.3} after move from ({:.2}, {:.2})",
                    position.y, self.config.max_agent_y, entry.start.x, entry.start.z
                )));
            }

            tracing::debug!(
                "Confirmed ({:.2}, {:.2}), frontier={}",
                position.x,
                position.z,
                self.frontier.len()
            );
            self.grid_points.push(position);
            self.enqueue_points(position);
        }

        summary.grid_points = self.grid_points.len();
        tracing::info!(
            "Exploration done: {} points, {} expansions, {} rejected moves",
            summary.grid_points,
            summary.expansions,
            summary.rejected_moves
        );
        Ok(summary)
    }

    /// Confirmed grid points, in discovery order
    pub fn grid_points(&self) -> &[Position] {
        &self.grid_points
    }

    /// Move the grid points out, leaving the explorer empty of them
    pub fn take_grid_points(&mut self) -> Vec<Position> {
        std::mem::take(&mut self.grid_points)
    }

    /// Replace the grid points (used after pruning)
    pub fn set_grid_points(&mut self, points: Vec<Position>) {
        self.grid_points = points;
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn seen_points(&self) -> &SeenPointSet {
        &self.seen
    }

    /// Forget everything and re-enable enqueueing
    pub fn reset(&mut self) {
        self.frontier.clear();
        self.seen.clear();
        self.grid_points.clear();
        self.allow_enqueue = true;
    }
}
