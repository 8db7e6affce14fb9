//! View cone test for the mock host.

use crate::core::{AgentPose, Position, normalize_degrees};

use super::scene::ViewSpec;

/// Horizon values closer than this count as equal (degrees)
const PITCH_TOLERANCE: f32 = 0.5;

/// True if `target` falls inside the agent's horizontal view cone and range.
///
/// Heading 0 faces +Z and 90 faces +X.
pub fn in_view_cone(view: &ViewSpec, pose: &AgentPose, target: &Position) -> bool {
    let dx = target.x - pose.x;
    let dz = target.z - pose.z;
    let distance = (dx * dx + dz * dz).sqrt();
    if distance > view.range {
        return false;
    }
    if distance < 1e-4 {
        return true;
    }

    let bearing = normalize_degrees(dx.atan2(dz).to_degrees());
    let mut offset = (bearing - normalize_degrees(pose.heading)).abs();
    if offset > 180.0 {
        offset = 360.0 - offset;
    }
    offset <= view.fov / 2.0
}

/// True if `pitch` is one of the allowed horizons (all allowed when `None`)
pub fn pitch_allowed(allowed: Option<&[f32]>, pitch: f32) -> bool {
    allowed.is_none_or(|pitches| {
        pitches.iter().any(|p| {
            let d = (normalize_degrees(*p) - normalize_degrees(pitch)).abs();
            d.min(360.0 - d) < PITCH_TOLERANCE
        })
    })
}
