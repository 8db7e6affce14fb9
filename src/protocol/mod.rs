//! Simulation host boundary.
//!
//! Everything the engine knows about the simulation goes through
//! [`SimulationHost::step`]: one [`ActionRequest`] in, one [`Observation`]
//! out. Transport, process lifecycle and binary provisioning live behind
//! implementations of this trait.
//!
//! - [`action`]: request types
//! - [`observation`]: response metadata types
//! - [`channel`]: one-slot request/response handoff between threads

pub mod action;
pub mod channel;
pub mod observation;

pub use action::{ActionRequest, ReceptacleObjectPair, ReceptacleObjects};
pub use channel::{ChannelHost, HostEndpoint, handoff};
pub use observation::{
    AgentMetadata, ObjectMetadata, Observation, PivotSimObj, ReceptacleDescriptor, Rotation,
};

use crate::error::Result;

/// Trait for anything that can execute simulation actions.
///
/// Implement this trait to connect the explorer and calibrator to a real
/// simulator or a test double.
///
/// A failed action is not an `Err`: it comes back as an observation with
/// `last_action_success == false`. `Err` is reserved for the host itself
/// being unusable (disconnected, protocol misuse).
pub trait SimulationHost {
    /// Execute one action and wait for its observation.
    fn step(&mut self, request: &ActionRequest) -> Result<Observation>;
}

impl<H: SimulationHost + ?Sized> SimulationHost for &mut H {
    fn step(&mut self, request: &ActionRequest) -> Result<Observation> {
        (**self).step(request)
    }
}

impl<H: SimulationHost + ?Sized> SimulationHost for Box<H> {
    fn step(&mut self, request: &ActionRequest) -> Result<Observation> {
        (**self).step(request)
    }
}
