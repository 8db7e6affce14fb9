//! Calibration records.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::{AgentPose, ReceptacleId};

/// A pivot slot from which the probe object was visible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PivotRecord {
    pub receptacle_id: ReceptacleId,
    pub pivot_index: usize,
    /// Probe distance from the agent (meters)
    pub distance: f32,
    pub pose: AgentPose,
    /// Whether the receptacle had to be opened for this sighting
    pub opened_receptacle: bool,
}

/// A receptacle seen from a pose, before any pivot probing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceptacleSighting {
    pub receptacle_id: ReceptacleId,
    pub distance: f32,
    pub pose: AgentPose,
}

/// Best-known sighting of an object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibilityRecord {
    pub distance: f32,
    pub pose: AgentPose,
}

/// Append-only table of pivot visibility records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PivotTable {
    records: Vec<PivotRecord>,
}

impl PivotTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PivotRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PivotRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for one receptacle, in recording order
    pub fn for_receptacle<'a>(
        &'a self,
        receptacle: &'a ReceptacleId,
    ) -> impl Iterator<Item = &'a PivotRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| &r.receptacle_id == receptacle)
    }

    /// Closest record per (receptacle, pivot). Ties keep the earliest.
    pub fn nearest_by_pivot(&self) -> BTreeMap<(ReceptacleId, usize), &PivotRecord> {
        let mut nearest: BTreeMap<(ReceptacleId, usize), &PivotRecord> = BTreeMap::new();
        for record in &self.records {
            let key = (record.receptacle_id.clone(), record.pivot_index);
            match nearest.get(&key) {
                Some(best) if best.distance <= record.distance => {}
                _ => {
                    nearest.insert(key, record);
                }
            }
        }
        nearest
    }

    /// Receptacles with at least one visible pivot
    pub fn visible_receptacles(&self) -> BTreeSet<ReceptacleId> {
        self.records
            .iter()
            .map(|r| r.receptacle_id.clone())
            .collect()
    }
}

impl Extend<PivotRecord> for PivotTable {
    fn extend<I: IntoIterator<Item = PivotRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}
