//! Target selection and container opening before calibration.

use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::controller::Controller;
use crate::core::{ObjectId, ObjectType, Position, ReceptacleId};
use crate::error::Result;
use crate::protocol::{Observation, SimulationHost};

use super::containment::ContainmentIndex;

/// Scene initializer settings.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// A second target's container must be farther than this from the
    /// primary target's container (meters)
    pub target_separation: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            target_separation: 1.25,
        }
    }
}

/// A pickupable object hidden behind an openable container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneTarget {
    pub object_id: ObjectId,
    pub object_type: ObjectType,
    /// The openable container that has to be opened to reach it
    pub container: ReceptacleId,
    pub container_position: Position,
}

/// Outcome of scene initialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSetup {
    /// Primary target first; at most two
    pub targets: Vec<SceneTarget>,
    /// Containers opened, in opening order
    pub opened: Vec<ReceptacleId>,
    /// Contained pickupables not behind an openable container
    pub free_objects: Vec<ObjectId>,
}

/// Picks target objects and opens their containers.
pub struct SceneInitializer {
    config: SceneConfig,
    rng: SmallRng,
}

impl SceneInitializer {
    /// Create an initializer. Seed 0 draws from entropy.
    pub fn new(config: SceneConfig, seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { config, rng }
    }

    /// Split contained pickupables into (behind an openable container, free).
    pub fn partition(
        index: &ContainmentIndex,
        observation: &Observation,
    ) -> (Vec<SceneTarget>, Vec<ObjectId>) {
        let mut nested = Vec::new();
        let mut free = Vec::new();

        for object_id in index.contained_objects() {
            let Some(meta) = observation.object(object_id).filter(|o| o.pickupable) else {
                continue;
            };
            match index.openable_container_of(object_id) {
                Some(container) => nested.push(SceneTarget {
                    object_id: object_id.clone(),
                    object_type: meta.object_type.clone(),
                    container: container.id.clone(),
                    container_position: container.position,
                }),
                None => free.push(object_id.clone()),
            }
        }
        (nested, free)
    }

    /// Choose up to two targets from the nested candidates.
    ///
    /// The primary is drawn uniformly. The rest are shuffled and the first
    /// whose container is farther than the separation threshold from the
    /// primary's container becomes the second target.
    pub fn choose_targets(&mut self, mut candidates: Vec<SceneTarget>) -> Vec<SceneTarget> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let primary = candidates.swap_remove(self.rng.gen_range(0..candidates.len()));
        candidates.shuffle(&mut self.rng);

        let anchor = primary.container_position;
        let second = candidates
            .into_iter()
            .find(|c| c.container_position.floor_distance(&anchor) > self.config.target_separation);

        let mut targets = vec![primary];
        targets.extend(second);
        targets
    }

    /// Index the last observation, pick targets and open their containers.
    ///
    /// Containers already open are left as they are. Every open must succeed.
    pub fn initialize<H: SimulationHost>(
        &mut self,
        controller: &mut Controller<H>,
    ) -> Result<SceneSetup> {
        let observation = controller.last_observation()?;
        let index = ContainmentIndex::from_observation(observation);
        let (nested, free_objects) = Self::partition(&index, observation);

        let targets = self.choose_targets(nested);

        let mut seen = BTreeSet::new();
        let containers: Vec<ReceptacleId> = targets
            .iter()
            .filter(|t| seen.insert(t.container.clone()))
            .filter(|t| !index.receptacle(&t.container).is_some_and(|r| r.is_open))
            .map(|t| t.container.clone())
            .collect();

        let mut opened = Vec::with_capacity(containers.len());
        for container in containers {
            controller.open_checked(&container)?;
            tracing::info!("Opened {} for scene targets", container);
            opened.push(container);
        }

        tracing::info!(
            "Scene initialized: {} targets, {} free objects",
            targets.len(),
            free_objects.len()
        );

        Ok(SceneSetup {
            targets,
            opened,
            free_objects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str, container: &str, x: f32) -> SceneTarget {
        SceneTarget {
            object_id: ObjectId::new(id),
            object_type: ObjectType::new("Mug"),
            container: ReceptacleId::new(container),
            container_position: Position::new(x, 0.5, 0.0),
        }
    }

    #[test]
    fn test_no_candidates_no_targets() {
        let mut init = SceneInitializer::new(SceneConfig::default(), 3);
        assert!(init.choose_targets(Vec::new()).is_empty());
    }

    #[test]
    fn test_second_target_respects_separation() {
        let candidates = vec![
            target("Mug|1", "Cabinet|1", 0.0),
            target("Mug|2", "Cabinet|1", 0.0),
            target("Mug|3", "Cabinet|2", 0.5),
        ];
        for seed in 1..20 {
            let mut init = SceneInitializer::new(SceneConfig::default(), seed);
            let targets = init.choose_targets(candidates.clone());
            // All containers within 1.25 of each other
            assert_eq!(targets.len(), 1);
        }
    }

    #[test]
    fn test_far_second_target_chosen() {
        let candidates = vec![target("Mug|1", "Cabinet|1", 0.0), target("Egg|1", "Fridge|1", 3.0)];
        let mut init = SceneInitializer::new(SceneConfig::default(), 11);
        let targets = init.choose_targets(candidates);
        assert_eq!(targets.len(), 2);
        assert_ne!(targets[0].container, targets[1].container);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let candidates: Vec<_> = (0..8)
            .map(|i| target(&format!("Mug|{i}"), &format!("Cabinet|{i}"), i as f32))
            .collect();
        let a = SceneInitializer::new(SceneConfig::default(), 42).choose_targets(candidates.clone());
        let b = SceneInitializer::new(SceneConfig::default(), 42).choose_targets(candidates);
        assert_eq!(a, b);
    }
}
