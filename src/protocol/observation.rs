//! Observations returned by the simulation host.

use serde::{Deserialize, Serialize};

use crate::core::{ObjectId, ObjectType, Position, ReceptacleId};

/// Rotation as reported by the simulation (Euler degrees)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Agent state after an action
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetadata {
    pub position: Position,
    pub rotation: Rotation,
    pub camera_horizon: f32,
}

/// An object held in a receptacle pivot slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotSimObj {
    pub object_id: ObjectId,
    pub pivot_id: usize,
}

/// Per-object metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub object_id: ObjectId,
    pub object_type: ObjectType,
    pub visible: bool,
    pub pickupable: bool,
    pub receptacle: bool,
    #[serde(default)]
    pub receptacle_object_ids: Vec<ObjectId>,
    pub openable: bool,
    pub is_open: bool,
    /// Distance from the agent (meters)
    pub distance: f32,
    pub position: Position,
    /// Number of pivot slots (receptacles only)
    #[serde(default)]
    pub receptacle_count: usize,
    #[serde(default)]
    pub pivot_sim_objs: Vec<PivotSimObj>,
}

impl ObjectMetadata {
    /// Receptacle view of this object, if it is one
    pub fn receptacle_descriptor(&self) -> Option<ReceptacleDescriptor> {
        self.receptacle.then(|| ReceptacleDescriptor {
            id: self.object_id.as_receptacle(),
            object_type: self.object_type.clone(),
            openable: self.openable,
            is_open: self.is_open,
            child_object_ids: self.receptacle_object_ids.clone(),
            position: self.position,
            pivot_count: self.receptacle_count,
        })
    }
}

/// The receptacle-relevant subset of [`ObjectMetadata`].
#[derive(Clone, Debug, PartialEq)]
pub struct ReceptacleDescriptor {
    pub id: ReceptacleId,
    pub object_type: ObjectType,
    pub openable: bool,
    pub is_open: bool,
    pub child_object_ids: Vec<ObjectId>,
    pub position: Position,
    pub pivot_count: usize,
}

/// Result of one simulation action
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub last_action_success: bool,
    #[serde(default)]
    pub error_message: String,
    pub agent: AgentMetadata,
    #[serde(default)]
    pub objects: Vec<ObjectMetadata>,
}

impl Observation {
    /// Look up an object by id
    pub fn object(&self, id: &ObjectId) -> Option<&ObjectMetadata> {
        self.objects.iter().find(|o| &o.object_id == id)
    }

    /// True if the object is present and visible
    pub fn is_object_visible(&self, id: &ObjectId) -> bool {
        self.object(id).is_some_and(|o| o.visible)
    }

    /// All receptacles, in metadata order
    pub fn receptacles(&self) -> impl Iterator<Item = ReceptacleDescriptor> + '_ {
        self.objects.iter().filter_map(|o| o.receptacle_descriptor())
    }

    /// Receptacles visible from the current pose
    pub fn visible_receptacles(&self) -> Vec<(ReceptacleDescriptor, f32)> {
        self.objects
            .iter()
            .filter(|o| o.visible)
            .filter_map(|o| o.receptacle_descriptor().map(|r| (r, o.distance)))
            .collect()
    }

    /// Agent position
    pub fn agent_position(&self) -> Position {
        self.agent.position
    }
}
