//! Which receptacle holds which object.

use std::collections::BTreeMap;

use crate::core::{ObjectId, ReceptacleId};
use crate::protocol::{ObjectMetadata, Observation, ReceptacleDescriptor};

/// Containment index built from one observation.
///
/// Ordered maps keep every iteration deterministic for a given scene.
#[derive(Clone, Debug, Default)]
pub struct ContainmentIndex {
    receptacles: BTreeMap<ReceptacleId, ReceptacleDescriptor>,
    parent: BTreeMap<ObjectId, ReceptacleId>,
}

impl ContainmentIndex {
    /// Index every receptacle's children in `observation`
    pub fn from_observation(observation: &Observation) -> Self {
        let mut index = Self::default();
        for receptacle in observation.receptacles() {
            for child in &receptacle.child_object_ids {
                index.parent.insert(child.clone(), receptacle.id.clone());
            }
            index.receptacles.insert(receptacle.id.clone(), receptacle);
        }
        index
    }

    pub fn receptacle(&self, id: &ReceptacleId) -> Option<&ReceptacleDescriptor> {
        self.receptacles.get(id)
    }

    /// Children of a receptacle, empty if unknown
    pub fn children(&self, id: &ReceptacleId) -> &[ObjectId] {
        self.receptacles
            .get(id)
            .map(|r| r.child_object_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Direct container of an object
    pub fn container_of(&self, object: &ObjectId) -> Option<&ReceptacleDescriptor> {
        self.parent
            .get(object)
            .and_then(|id| self.receptacles.get(id))
    }

    /// The openable receptacle enclosing an object, looking one level up.
    ///
    /// A mug on a shelf inside a cabinet yields the cabinet.
    pub fn openable_container_of(&self, object: &ObjectId) -> Option<&ReceptacleDescriptor> {
        let direct = self.container_of(object)?;
        if direct.openable {
            return Some(direct);
        }
        self.container_of(&direct.id.as_object())
            .filter(|outer| outer.openable)
    }

    /// Every object that sits in some receptacle, in id order
    pub fn contained_objects(&self) -> impl Iterator<Item = &ObjectId> {
        self.parent.keys()
    }

    /// Resolve `object` to the receptacle holding it via pivot slots, if any
    pub fn pivot_holder<'a>(
        observation: &'a Observation,
        object: &ObjectId,
    ) -> Option<&'a ObjectMetadata> {
        observation
            .objects
            .iter()
            .filter(|o| o.receptacle)
            .find(|o| o.pivot_sim_objs.iter().any(|p| &p.object_id == object))
    }

    pub fn len(&self) -> usize {
        self.receptacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receptacles.is_empty()
    }
}
