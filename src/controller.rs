//! Synchronous action controller.
//!
//! Wraps a [`SimulationHost`] and remembers the last observation, which the
//! scene initializer and calibrator read object metadata from.

use crate::core::{Position, ReceptacleId};
use crate::error::{DrishtiError, Result};
use crate::protocol::{ActionRequest, Observation, SimulationHost};

/// Issues actions one at a time and keeps the latest observation.
pub struct Controller<H: SimulationHost> {
    host: H,
    last_observation: Option<Observation>,
    actions_issued: usize,
}

impl<H: SimulationHost> Controller<H> {
    /// Create a controller over a simulation host
    pub fn new(host: H) -> Self {
        Self {
            host,
            last_observation: None,
            actions_issued: 0,
        }
    }

    /// Execute an action; a failed action is returned as data.
    pub fn step(&mut self, request: &ActionRequest) -> Result<&Observation> {
        let observation = self.host.step(request)?;
        self.actions_issued += 1;

        if !observation.last_action_success {
            tracing::debug!(
                "{} failed: {}",
                request.name(),
                observation.error_message
            );
        }

        Ok(self.last_observation.insert(observation))
    }

    /// Execute an action that must succeed.
    pub fn step_checked(&mut self, request: &ActionRequest) -> Result<&Observation> {
        let action = request.name();
        let observation = self.step(request)?;
        if !observation.last_action_success {
            return Err(DrishtiError::ActionFailed {
                action,
                message: observation.error_message.clone(),
            });
        }
        Ok(observation)
    }

    /// Load a scene
    pub fn reset(&mut self, scene_name: Option<&str>) -> Result<&Observation> {
        self.step(&ActionRequest::Reset {
            scene_name: scene_name.map(str::to_string),
        })
    }

    /// Put the agent on the navigation grid
    pub fn initialize(&mut self, grid_size: f32) -> Result<&Observation> {
        self.step(&ActionRequest::Initialize { grid_size })
    }

    /// Teleport to a position
    pub fn teleport(&mut self, position: Position) -> Result<&Observation> {
        self.step(&ActionRequest::Teleport {
            x: position.x,
            y: position.y,
            z: position.z,
        })
    }

    /// Open a receptacle, failing the run if it does not open
    pub fn open_checked(&mut self, receptacle: &ReceptacleId) -> Result<&Observation> {
        self.step_checked(&ActionRequest::open(receptacle.as_object()))
    }

    /// Close a receptacle, failing the run if it does not close
    pub fn close_checked(&mut self, receptacle: &ReceptacleId) -> Result<&Observation> {
        self.step_checked(&ActionRequest::close(receptacle.as_object()))
    }

    /// Most recent observation
    pub fn last_observation(&self) -> Result<&Observation> {
        self.last_observation
            .as_ref()
            .ok_or(DrishtiError::NoObservation)
    }

    /// Number of actions sent so far
    pub fn actions_issued(&self) -> usize {
        self.actions_issued
    }

    /// Borrow the underlying host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutably borrow the underlying host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give back the underlying host
    pub fn into_host(self) -> H {
        self.host
    }
}
