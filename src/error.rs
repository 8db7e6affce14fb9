//! Error types for Drishti

use thiserror::Error;

/// Drishti error type
///
/// Exploratory move/teleport failures never show up here: the explorer
/// absorbs them as "unreachable". Everything that does surface aborts the run.
#[derive(Error, Debug)]
pub enum DrishtiError {
    /// A scripted action reported `lastActionSuccess = false`.
    #[error("Action {action} failed: {message}")]
    ActionFailed {
        /// Action name as sent on the wire
        action: &'static str,
        /// Error message reported by the simulation host
        message: String,
    },

    /// The simulation reported a state that can only come from a malfunction.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The one-slot request/response handoff was misused.
    #[error("Handoff violation: {0}")]
    Handoff(String),

    /// The other end of the handoff went away.
    #[error("Simulation host disconnected")]
    HostDisconnected,

    /// An operation needed scene metadata before any action was issued.
    #[error("No observation received yet")]
    NoObservation,

    /// Calibration needs at least one pickupable object to use as a probe.
    #[error("No pickupable probe object in scene")]
    NoProbeObject,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DrishtiError {
    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ActionFailed { .. } => "ACTION_FAILED",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
            Self::Handoff(_) => "HANDOFF",
            Self::HostDisconnected => "HOST_DISCONNECTED",
            Self::NoObservation => "NO_OBSERVATION",
            Self::NoProbeObject => "NO_PROBE_OBJECT",
            Self::Config(_) => "CONFIG",
            Self::Io(_) => "IO",
            Self::Serialization(_) => "SERIALIZATION",
        }
    }
}

impl From<toml::de::Error> for DrishtiError {
    fn from(e: toml::de::Error) -> Self {
        DrishtiError::Config(e.to_string())
    }
}

impl From<serde_yaml::Error> for DrishtiError {
    fn from(e: serde_yaml::Error) -> Self {
        DrishtiError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for DrishtiError {
    fn from(e: serde_json::Error) -> Self {
        DrishtiError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DrishtiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DrishtiError::ActionFailed {
            action: "OpenObject",
            message: "Fridge|1 is locked".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Action OpenObject failed: Fridge|1 is locked"
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(DrishtiError::HostDisconnected.code(), "HOST_DISCONNECTED");
        assert_eq!(
            DrishtiError::InvariantViolation("y".into()).code(),
            "INVARIANT_VIOLATION"
        );
    }

    #[test]
    fn test_from_toml_error() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("[broken");
        let err: DrishtiError = parse.unwrap_err().into();
        assert!(matches!(err, DrishtiError::Config(_)));
    }
}
