//! Action requests sent to the simulation host.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{ObjectId, ObjectType, ReceptacleId};

/// An object/receptacle pair that randomized placement must not produce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptacleObjectPair {
    pub object_id: ObjectId,
    pub receptacle_object_id: ReceptacleId,
}

impl ReceptacleObjectPair {
    /// Parse the `objectId||receptacleId` form used by scenario files.
    pub fn parse(pair: &str) -> Option<Self> {
        let (object_id, receptacle_id) = pair.split_once("||")?;
        if object_id.is_empty() || receptacle_id.is_empty() {
            return None;
        }
        Some(Self {
            object_id: ObjectId::new(object_id),
            receptacle_object_id: ReceptacleId::new(receptacle_id),
        })
    }
}

/// Item types a receptacle type may receive during randomized placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptacleObjects {
    pub receptacle_object_type: ObjectType,
    pub item_object_types: Vec<ObjectType>,
}

impl ReceptacleObjects {
    /// Expand a type → items table into wire entries (sorted by receptacle type)
    pub fn from_table(table: &BTreeMap<String, Vec<String>>) -> Vec<Self> {
        table
            .iter()
            .map(|(receptacle, items)| Self {
                receptacle_object_type: ObjectType::new(receptacle.as_str()),
                item_object_types: items.iter().map(|t| ObjectType::new(t.as_str())).collect(),
            })
            .collect()
    }
}

/// A single simulation action.
///
/// Serialized with an `action` tag and camelCase fields, which is the shape
/// the simulation's request channel expects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all_fields = "camelCase")]
pub enum ActionRequest {
    /// Load a scene (or reload the current one)
    Reset { scene_name: Option<String> },

    /// Initialize the agent on the navigation grid
    Initialize { grid_size: f32 },

    /// Place the agent at a position
    Teleport { x: f32, y: f32, z: f32 },

    /// Move the agent along an axis-aligned vector
    Move { x: f32, z: f32, move_magnitude: f32 },

    /// Set agent heading and camera horizon (degrees)
    RotateLook { rotation: f32, horizon: f32 },

    OpenObject {
        object_id: ObjectId,
        force_visible: bool,
    },

    CloseObject {
        object_id: ObjectId,
        force_visible: bool,
    },

    /// Put an object into a receptacle pivot slot
    Replace {
        object_id: ObjectId,
        receptacle_object_id: ReceptacleId,
        pivot: usize,
        force_visible: bool,
    },

    PickupObject {
        object_id: ObjectId,
        force_visible: bool,
    },

    /// Shuffle pickupable objects over receptacles
    RandomInitialize {
        random_seed: u64,
        randomize_open: bool,
        unique_pickupable_object_types: bool,
        receptacle_objects: Vec<ReceptacleObjects>,
        exclude_object_ids: Vec<ObjectId>,
        exclude_receptacle_object_pairs: Vec<ReceptacleObjectPair>,
    },
}

impl ActionRequest {
    /// Wire name of the action
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reset { .. } => "Reset",
            Self::Initialize { .. } => "Initialize",
            Self::Teleport { .. } => "Teleport",
            Self::Move { .. } => "Move",
            Self::RotateLook { .. } => "RotateLook",
            Self::OpenObject { .. } => "OpenObject",
            Self::CloseObject { .. } => "CloseObject",
            Self::Replace { .. } => "Replace",
            Self::PickupObject { .. } => "PickupObject",
            Self::RandomInitialize { .. } => "RandomInitialize",
        }
    }

    pub fn open(object_id: ObjectId) -> Self {
        Self::OpenObject {
            object_id,
            force_visible: true,
        }
    }

    pub fn close(object_id: ObjectId) -> Self {
        Self::CloseObject {
            object_id,
            force_visible: true,
        }
    }

    pub fn pickup(object_id: ObjectId) -> Self {
        Self::PickupObject {
            object_id,
            force_visible: true,
        }
    }

    pub fn replace(object_id: ObjectId, receptacle: ReceptacleId, pivot: usize) -> Self {
        Self::Replace {
            object_id,
            receptacle_object_id: receptacle,
            pivot,
            force_visible: true,
        }
    }

    pub fn rotate_look(rotation: f32, horizon: f32) -> Self {
        Self::RotateLook { rotation, horizon }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let request = ActionRequest::replace(ObjectId::new("Mug|1"), ReceptacleId::new("Cabinet|2"), 3);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["action"], "Replace");
        assert_eq!(json["objectId"], "Mug|1");
        assert_eq!(json["receptacleObjectId"], "Cabinet|2");
        assert_eq!(json["pivot"], 3);
        assert_eq!(json["forceVisible"], true);
    }

    #[test]
    fn test_move_fields() {
        let json = serde_json::to_value(ActionRequest::Move {
            x: -0.25,
            z: 0.0,
            move_magnitude: 0.25,
        })
        .unwrap();
        assert_eq!(json["action"], "Move");
        assert_eq!(json["moveMagnitude"], 0.25);
    }

    #[test]
    fn test_parse_pair() {
        let pair = ReceptacleObjectPair::parse("Mug|1||Cabinet|2").unwrap();
        assert_eq!(pair.object_id.as_str(), "Mug|1");
        assert_eq!(pair.receptacle_object_id.as_str(), "Cabinet|2");

        assert!(ReceptacleObjectPair::parse("Mug|1").is_none());
        assert!(ReceptacleObjectPair::parse("||Cabinet|2").is_none());
    }

    #[test]
    fn test_name() {
        assert_eq!(ActionRequest::rotate_look(90.0, 30.0).name(), "RotateLook");
        assert_eq!(ActionRequest::open(ObjectId::new("Fridge|1")).name(), "OpenObject");
    }
}
