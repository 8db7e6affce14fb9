//! Agent viewing pose.

use serde::{Deserialize, Serialize};

use super::point::Position;

/// Where the agent stood and how it looked.
///
/// `heading` is the yaw in degrees (0 faces +Z, 90 faces +X); `pitch` is the
/// camera horizon in degrees, positive looking down, values near 360 looking up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentPose {
    /// Yaw in degrees
    pub heading: f32,
    /// Camera horizon in degrees
    pub pitch: f32,
    /// X coordinate in meters
    pub x: f32,
    /// Height in meters
    pub y: f32,
    /// Z coordinate in meters
    pub z: f32,
}

impl AgentPose {
    /// Pose at a grid position with the given orientation
    pub fn at(position: Position, heading: f32, pitch: f32) -> Self {
        Self {
            heading,
            pitch,
            x: position.x,
            y: position.y,
            z: position.z,
        }
    }

    /// Position part of the pose
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y, self.z)
    }
}

/// Normalize an angle in degrees to [0, 360)
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}
