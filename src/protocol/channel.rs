//! One-slot request/response handoff.
//!
//! Two bounded(1) channels connect the calibrating thread to whatever thread
//! owns the simulation. At most one request may be outstanding: submitting a
//! second request before the first response has been received is an error,
//! never a queued request.
//!
//! ```text
//!   ChannelHost                      HostEndpoint
//!   (caller thread)                  (simulation thread)
//!        │  submit ──[ slot ]──▶ recv ──┐
//!        │                              │ host.step()
//!        │ receive ◀──[ slot ]── send ◀─┘
//! ```

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::thread::{self, JoinHandle};

use crate::error::{DrishtiError, Result};

use super::action::ActionRequest;
use super::observation::Observation;
use super::SimulationHost;

/// Create a connected handoff pair.
pub fn handoff() -> (ChannelHost, HostEndpoint) {
    let (request_tx, request_rx) = bounded(1);
    let (response_tx, response_rx) = bounded(1);

    (
        ChannelHost {
            requests: request_tx,
            responses: response_rx,
            pending: None,
        },
        HostEndpoint {
            requests: request_rx,
            responses: response_tx,
        },
    )
}

/// Caller side of the handoff.
pub struct ChannelHost {
    requests: Sender<ActionRequest>,
    responses: Receiver<Observation>,
    /// Name of the action whose response has not been received yet
    pending: Option<&'static str>,
}

impl ChannelHost {
    /// Hand a request to the simulation thread without waiting.
    pub fn submit(&mut self, request: ActionRequest) -> Result<()> {
        if let Some(pending) = self.pending {
            return Err(DrishtiError::Handoff(format!(
                "{} submitted while response to {} is still outstanding",
                request.name(),
                pending
            )));
        }

        let name = request.name();
        match self.requests.try_send(request) {
            Ok(()) => {
                self.pending = Some(name);
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(DrishtiError::Handoff(format!(
                "request slot occupied when submitting {}",
                name
            ))),
            Err(TrySendError::Disconnected(_)) => Err(DrishtiError::HostDisconnected),
        }
    }

    /// Block until the response to the outstanding request arrives.
    pub fn receive(&mut self) -> Result<Observation> {
        if self.pending.is_none() {
            return Err(DrishtiError::Handoff(
                "receive called with no outstanding request".to_string(),
            ));
        }

        let response = self.responses.recv();
        self.pending = None;
        response.map_err(|_| DrishtiError::HostDisconnected)
    }

    /// True while a request is waiting for its response
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl SimulationHost for ChannelHost {
    fn step(&mut self, request: &ActionRequest) -> Result<Observation> {
        self.submit(request.clone())?;
        self.receive()
    }
}

/// Simulation side of the handoff.
pub struct HostEndpoint {
    requests: Receiver<ActionRequest>,
    responses: Sender<Observation>,
}

impl HostEndpoint {
    /// Serve requests with `host` until the caller side is dropped.
    pub fn serve<H: SimulationHost>(self, mut host: H) -> Result<()> {
        while let Ok(request) = self.requests.recv() {
            let observation = host.step(&request)?;
            match self.responses.try_send(observation) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    return Err(DrishtiError::Handoff(format!(
                        "response to {} produced while previous response unconsumed",
                        request.name()
                    )));
                }
                Err(TrySendError::Disconnected(_)) => break,
            }
        }

        tracing::debug!("Handoff closed, simulation host endpoint exiting");
        Ok(())
    }

    /// Serve on a dedicated thread.
    pub fn spawn<H>(self, host: H) -> Result<JoinHandle<Result<()>>>
    where
        H: SimulationHost + Send + 'static,
    {
        thread::Builder::new()
            .name("sim-host".to_string())
            .spawn(move || self.serve(host))
            .map_err(DrishtiError::Io)
    }
}
