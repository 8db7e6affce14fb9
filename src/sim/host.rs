//! In-memory simulation host.

use crate::core::{AgentPose, ObjectId, ObjectType, Position};
use crate::error::Result;
use crate::protocol::{
    ActionRequest, AgentMetadata, ObjectMetadata, Observation, PivotSimObj, Rotation,
    SimulationHost,
};

use super::scene::{Cell, FailureRule, MockScene};
use super::visibility::{in_view_cone, pitch_allowed};

/// Deepest receptacle nesting followed when resolving visibility
const MAX_NESTING: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Location {
    Free,
    Held,
    InPivot { receptacle: usize, pivot: usize },
}

#[derive(Clone, Debug)]
struct ObjectState {
    is_open: bool,
    location: Location,
}

#[derive(Clone, Debug)]
struct ActiveFailure {
    rule: FailureRule,
    remaining: Option<usize>,
}

/// Deterministic simulation over a [`MockScene`].
///
/// Every request is appended to an action log before it is executed, so tests
/// can assert on the exact action sequence.
pub struct MockHost {
    scene: MockScene,
    objects: Vec<ObjectState>,
    agent: AgentPose,
    failures: Vec<ActiveFailure>,
    log: Vec<ActionRequest>,
}

impl MockHost {
    pub fn new(scene: MockScene) -> Self {
        let failures = scene
            .failures
            .iter()
            .map(|rule| ActiveFailure {
                rule: rule.clone(),
                remaining: rule.times,
            })
            .collect();
        let mut host = Self {
            objects: Vec::new(),
            agent: AgentPose::at(Position::ZERO, 0.0, 0.0),
            failures,
            log: Vec::new(),
            scene,
        };
        host.restore();
        host
    }

    /// Add a failure rule at runtime
    pub fn inject_failure(&mut self, rule: FailureRule) {
        self.failures.push(ActiveFailure {
            remaining: rule.times,
            rule,
        });
    }

    pub fn scene(&self) -> &MockScene {
        &self.scene
    }

    pub fn agent(&self) -> &AgentPose {
        &self.agent
    }

    /// Every request received, in order
    pub fn actions(&self) -> &[ActionRequest] {
        &self.log
    }

    /// Number of logged requests with the given action name
    pub fn count(&self, action: &str) -> usize {
        self.log.iter().filter(|r| r.name() == action).count()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Whether an object is currently open
    pub fn is_open(&self, id: &str) -> bool {
        self.index_of(id).is_some_and(|i| self.objects[i].is_open)
    }

    fn restore(&mut self) {
        let mut objects: Vec<ObjectState> = self
            .scene
            .objects
            .iter()
            .map(|spec| ObjectState {
                is_open: spec.is_open,
                location: Location::Free,
            })
            .collect();

        for (r, spec) in self.scene.objects.iter().enumerate() {
            for (pivot, child) in spec.contains.iter().enumerate() {
                if let Some(c) = self.scene.objects.iter().position(|o| &o.id == child) {
                    objects[c].location = Location::InPivot { receptacle: r, pivot };
                }
            }
        }

        self.objects = objects;
        self.agent = self.start_pose();
    }

    fn start_pose(&self) -> AgentPose {
        let start = self.scene.cell_position(self.scene.agent.start);
        AgentPose::at(start, self.scene.agent.heading, 0.0)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.scene.objects.iter().position(|o| o.id == id)
    }

    fn agent_cell(&self) -> Option<Cell> {
        self.scene.cell_at(self.agent.x, self.agent.z)
    }

    fn object_position(&self, index: usize, depth: usize) -> Position {
        match self.objects[index].location {
            Location::Free => self.scene.objects[index].position(),
            Location::Held => self.agent.position(),
            Location::InPivot { receptacle, .. } if depth < MAX_NESTING => {
                self.object_position(receptacle, depth + 1)
            }
            Location::InPivot { .. } => self.scene.objects[index].position(),
        }
    }

    fn is_visible(&self, index: usize, depth: usize) -> bool {
        let spec = &self.scene.objects[index];
        match self.objects[index].location {
            Location::Held => false,
            Location::Free => {
                in_view_cone(&self.scene.view, &self.agent, &spec.position())
                    && pitch_allowed(spec.visible_pitches.as_deref(), self.agent.pitch)
            }
            Location::InPivot { receptacle, pivot } => {
                if depth >= MAX_NESTING || !self.is_visible(receptacle, depth + 1) {
                    return false;
                }
                let holder = &self.scene.objects[receptacle];
                let pivot_shown = holder
                    .visible_pivots
                    .as_ref()
                    .is_none_or(|shown| shown.contains(&pivot));
                let reachable =
                    !holder.openable || holder.transparent || self.objects[receptacle].is_open;
                pivot_shown && reachable
            }
        }
    }

    fn observe(&self, success: bool, error_message: String) -> Observation {
        let agent_position = self.agent.position();
        let objects = self
            .scene
            .objects
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let position = self.object_position(i, 0);
                let dx = position.x - agent_position.x;
                let dy = position.y - agent_position.y;
                let dz = position.z - agent_position.z;

                let contents: Vec<PivotSimObj> = self
                    .objects
                    .iter()
                    .enumerate()
                    .filter_map(|(c, state)| match state.location {
                        Location::InPivot { receptacle, pivot } if receptacle == i => {
                            Some(PivotSimObj {
                                object_id: ObjectId::new(self.scene.objects[c].id.as_str()),
                                pivot_id: pivot,
                            })
                        }
                        _ => None,
                    })
                    .collect();

                ObjectMetadata {
                    object_id: ObjectId::new(spec.id.as_str()),
                    object_type: ObjectType::new(spec.object_type.as_str()),
                    visible: self.is_visible(i, 0),
                    pickupable: spec.pickupable,
                    receptacle: spec.receptacle,
                    receptacle_object_ids: contents.iter().map(|p| p.object_id.clone()).collect(),
                    openable: spec.openable,
                    is_open: self.objects[i].is_open,
                    distance: (dx * dx + dy * dy + dz * dz).sqrt(),
                    position,
                    receptacle_count: spec.pivots,
                    pivot_sim_objs: contents,
                }
            })
            .collect();

        Observation {
            last_action_success: success,
            error_message,
            agent: AgentMetadata {
                position: agent_position,
                rotation: Rotation {
                    x: 0.0,
                    y: self.agent.heading,
                    z: 0.0,
                },
                camera_horizon: self.agent.pitch,
            },
            objects,
        }
    }

    fn injected_failure(&mut self, request: &ActionRequest) -> Option<String> {
        let targets: Vec<&str> = match request {
            ActionRequest::OpenObject { object_id, .. }
            | ActionRequest::CloseObject { object_id, .. }
            | ActionRequest::PickupObject { object_id, .. } => vec![object_id.as_str()],
            ActionRequest::Replace {
                object_id,
                receptacle_object_id,
                ..
            } => vec![object_id.as_str(), receptacle_object_id.as_str()],
            _ => Vec::new(),
        };

        let failure = self.failures.iter_mut().find(|f| {
            f.rule.action == request.name()
                && f.remaining != Some(0)
                && f.rule
                    .object_id
                    .as_deref()
                    .is_none_or(|id| targets.contains(&id))
        })?;

        if let Some(remaining) = failure.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(failure.rule.message.clone())
    }

    fn execute(&mut self, request: &ActionRequest) -> std::result::Result<(), String> {
        match request {
            ActionRequest::Reset { .. } => {
                self.restore();
                Ok(())
            }
            ActionRequest::Initialize { .. } => {
                self.agent = self.start_pose();
                Ok(())
            }
            ActionRequest::Teleport { x, z, .. } => {
                let cell = self
                    .scene
                    .cell_at(*x, *z)
                    .filter(|c| self.scene.is_floor(*c))
                    .ok_or_else(|| format!("({:.2}, {:.2}) is not navigable", x, z))?;
                self.place_agent(cell);
                Ok(())
            }
            ActionRequest::Move {
                x,
                z,
                move_magnitude,
            } => {
                let norm = (x * x + z * z).sqrt();
                if norm <= f32::EPSILON {
                    return Err("zero move vector".to_string());
                }
                let from = self
                    .agent_cell()
                    .ok_or_else(|| "agent is off the lattice".to_string())?;
                let target = self
                    .agent
                    .position()
                    .offset(x / norm * move_magnitude, z / norm * move_magnitude);
                let to = self
                    .scene
                    .cell_at(target.x, target.z)
                    .filter(|c| self.scene.is_floor(*c))
                    .ok_or_else(|| "blocked".to_string())?;
                if self.scene.is_move_blocked(from, to) {
                    return Err("blocked".to_string());
                }
                self.place_agent(to);
                Ok(())
            }
            ActionRequest::RotateLook { rotation, horizon } => {
                self.agent.heading = *rotation;
                self.agent.pitch = *horizon;
                Ok(())
            }
            ActionRequest::OpenObject { object_id, .. } => self.set_open(object_id, true),
            ActionRequest::CloseObject { object_id, .. } => self.set_open(object_id, false),
            ActionRequest::PickupObject { object_id, .. } => {
                let i = self.lookup(object_id)?;
                if !self.scene.objects[i].pickupable {
                    return Err(format!("{} is not pickupable", object_id));
                }
                self.objects[i].location = Location::Held;
                Ok(())
            }
            ActionRequest::Replace {
                object_id,
                receptacle_object_id,
                pivot,
                ..
            } => {
                let i = self.lookup(object_id)?;
                let r = self.lookup(&receptacle_object_id.as_object())?;
                let holder = &self.scene.objects[r];
                if !holder.receptacle || *pivot >= holder.pivots {
                    return Err(format!(
                        "{} has no pivot {}",
                        receptacle_object_id, pivot
                    ));
                }
                if holder.openable && !self.objects[r].is_open {
                    return Err(format!("{} is closed", receptacle_object_id));
                }
                self.objects[i].location = Location::InPivot {
                    receptacle: r,
                    pivot: *pivot,
                };
                Ok(())
            }
            ActionRequest::RandomInitialize { .. } => Ok(()),
        }
    }

    fn lookup(&self, id: &ObjectId) -> std::result::Result<usize, String> {
        self.index_of(id.as_str())
            .ok_or_else(|| format!("unknown object {}", id))
    }

    fn set_open(&mut self, id: &ObjectId, open: bool) -> std::result::Result<(), String> {
        let i = self.lookup(id)?;
        if !self.scene.objects[i].openable {
            return Err(format!("{} is not openable", id));
        }
        if self.objects[i].is_open == open {
            let state = if open { "open" } else { "closed" };
            return Err(format!("{} is already {}", id, state));
        }
        self.objects[i].is_open = open;
        Ok(())
    }

    fn place_agent(&mut self, cell: Cell) {
        let p = self.scene.cell_position(cell);
        self.agent.x = p.x;
        self.agent.y = p.y;
        self.agent.z = p.z;
    }
}

impl SimulationHost for MockHost {
    fn step(&mut self, request: &ActionRequest) -> Result<Observation> {
        self.log.push(request.clone());

        if let Some(message) = self.injected_failure(request) {
            return Ok(self.observe(false, message));
        }

        Ok(match self.execute(request) {
            Ok(()) => self.observe(true, String::new()),
            Err(message) => self.observe(false, message),
        })
    }
}
