//! Scoped receptacle opening.

use crate::controller::Controller;
use crate::core::ReceptacleId;
use crate::error::Result;
use crate::protocol::{ActionRequest, SimulationHost};

/// Open `receptacle`, run `scan`, then close it.
///
/// A receptacle that is `already_open` is scanned in place without an open
/// request, and is still closed afterwards. The close is attempted on every
/// exit path. If `scan` fails, the close is
/// best-effort and the scan's error is returned; otherwise a failed close is
/// the error.
pub fn with_open_receptacle<H, T, F>(
    controller: &mut Controller<H>,
    receptacle: &ReceptacleId,
    already_open: bool,
    scan: F,
) -> Result<T>
where
    H: SimulationHost,
    F: FnOnce(&mut Controller<H>) -> Result<T>,
{
    if !already_open {
        controller.open_checked(receptacle)?;
    }

    match scan(controller) {
        Ok(value) => {
            controller.close_checked(receptacle)?;
            Ok(value)
        }
        Err(err) => {
            match controller.step(&ActionRequest::close(receptacle.as_object())) {
                Ok(obs) if !obs.last_action_success => {
                    tracing::warn!(
                        "Could not close {} after failed scan: {}",
                        receptacle,
                        obs.error_message
                    );
                }
                Err(close_err) => {
                    tracing::warn!("Could not close {} after failed scan: {}", receptacle, close_err);
                }
                Ok(_) => {}
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DrishtiError;
    use crate::protocol::Observation;

    #[derive(Default)]
    struct Recorder {
        actions: Vec<&'static str>,
    }

    impl SimulationHost for Recorder {
        fn step(&mut self, request: &ActionRequest) -> Result<Observation> {
            self.actions.push(request.name());
            Ok(Observation {
                last_action_success: true,
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_closes_after_success() {
        let mut controller = Controller::new(Recorder::default());
        let fridge = ReceptacleId::new("Fridge|1");
        let value = with_open_receptacle(&mut controller, &fridge, false, |_| Ok(7)).unwrap();
        assert_eq!(value, 7);
        assert_eq!(controller.host().actions, vec!["OpenObject", "CloseObject"]);
    }

    #[test]
    fn test_closes_after_failure() {
        let mut controller = Controller::new(Recorder::default());
        let fridge = ReceptacleId::new("Fridge|1");
        let result: Result<()> = with_open_receptacle(&mut controller, &fridge, false, |c| {
            c.step(&ActionRequest::rotate_look(0.0, 0.0))?;
            Err(DrishtiError::NoProbeObject)
        });

        assert!(matches!(result, Err(DrishtiError::NoProbeObject)));
        assert_eq!(
            controller.host().actions,
            vec!["OpenObject", "RotateLook", "CloseObject"]
        );
    }

    #[test]
    fn test_already_open_skips_open() {
        let mut controller = Controller::new(Recorder::default());
        let fridge = ReceptacleId::new("Fridge|1");
        with_open_receptacle(&mut controller, &fridge, true, |c| {
            c.step(&ActionRequest::rotate_look(0.0, 0.0))?;
            Ok(())
        })
        .unwrap();
        assert_eq!(controller.host().actions, vec!["RotateLook", "CloseObject"]);
    }
}
