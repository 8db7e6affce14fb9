//! Randomized placement request derived from a pivot table.

use std::collections::BTreeSet;

use crate::core::{ObjectId, ObjectType};
use crate::protocol::{ActionRequest, Observation, ReceptacleObjectPair, ReceptacleObjects};

use super::table::PivotTable;

/// Randomized placement settings.
#[derive(Clone, Debug)]
pub struct PlacementConfig {
    /// Receptacle types never used for placement
    pub excluded_receptacle_types: Vec<ObjectType>,
    pub unique_object_types: bool,
    pub randomize_open: bool,
    /// Allowed item types per receptacle type
    pub receptacle_objects: Vec<ReceptacleObjects>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        crate::config::DrishtiConfig::default().placement_config()
    }
}

/// Receptacles that must not receive objects.
///
/// A receptacle is excluded when its type is in the excluded list, or when
/// the table is non-empty and none of its pivots was ever visible.
pub fn excluded_receptacles(
    config: &PlacementConfig,
    table: &PivotTable,
    observation: &Observation,
) -> Vec<ObjectId> {
    let visible = table.visible_receptacles();
    let excluded_types: BTreeSet<&ObjectType> = config.excluded_receptacle_types.iter().collect();

    observation
        .objects
        .iter()
        .filter(|o| {
            let no_visible_pivot = o.receptacle
                && !table.is_empty()
                && !visible.contains(&o.object_id.as_receptacle());
            no_visible_pivot || excluded_types.contains(&o.object_type)
        })
        .map(|o| o.object_id.clone())
        .collect()
}

/// Build the RandomInitialize request for the current scene.
pub fn random_initialize_request(
    config: &PlacementConfig,
    table: &PivotTable,
    observation: &Observation,
    random_seed: u64,
    exclude_pairs: Vec<ReceptacleObjectPair>,
) -> ActionRequest {
    let exclude_object_ids = excluded_receptacles(config, table, observation);
    tracing::debug!(
        "RandomInitialize seed={} excluding {} receptacles and {} pairs",
        random_seed,
        exclude_object_ids.len(),
        exclude_pairs.len()
    );

    ActionRequest::RandomInitialize {
        random_seed,
        randomize_open: config.randomize_open,
        unique_pickupable_object_types: config.unique_object_types,
        receptacle_objects: config.receptacle_objects.clone(),
        exclude_object_ids,
        exclude_receptacle_object_pairs: exclude_pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibrate::PivotRecord;
    use crate::core::{AgentPose, Position, ReceptacleId};
    use crate::protocol::ObjectMetadata;

    fn receptacle(id: &str, object_type: &str) -> ObjectMetadata {
        ObjectMetadata {
            object_id: ObjectId::new(id),
            object_type: ObjectType::new(object_type),
            visible: false,
            pickupable: false,
            receptacle: true,
            receptacle_object_ids: Vec::new(),
            openable: false,
            is_open: false,
            distance: 2.0,
            position: Position::ZERO,
            receptacle_count: 3,
            pivot_sim_objs: Vec::new(),
        }
    }

    #[test]
    fn test_excludes_unseen_and_typed_receptacles() {
        let observation = Observation {
            objects: vec![
                receptacle("Cabinet|1", "Cabinet"),
                receptacle("Cabinet|2", "Cabinet"),
                receptacle("Pan|1", "Pan"),
            ],
            ..Default::default()
        };
        let mut table = PivotTable::new();
        table.push(PivotRecord {
            receptacle_id: ReceptacleId::new("Cabinet|1"),
            pivot_index: 0,
            distance: 1.0,
            pose: AgentPose::at(Position::ZERO, 0.0, 0.0),
            opened_receptacle: false,
        });

        let config = PlacementConfig::default();
        let excluded = excluded_receptacles(&config, &table, &observation);
        assert_eq!(excluded, vec![ObjectId::new("Cabinet|2"), ObjectId::new("Pan|1")]);

        match random_initialize_request(&config, &table, &observation, 9, Vec::new()) {
            ActionRequest::RandomInitialize {
                random_seed,
                exclude_object_ids,
                unique_pickupable_object_types,
                ..
            } => {
                assert_eq!(random_seed, 9);
                assert_eq!(exclude_object_ids.len(), 2);
                assert!(unique_pickupable_object_types);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_only_excludes_types() {
        let observation = Observation {
            objects: vec![receptacle("Cabinet|1", "Cabinet"), receptacle("Pot|1", "Pot")],
            ..Default::default()
        };
        let excluded =
            excluded_receptacles(&PlacementConfig::default(), &PivotTable::new(), &observation);
        assert_eq!(excluded, vec![ObjectId::new("Pot|1")]);
    }
}
