//! Visibility sweeps over grid points, orientations and pivot slots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::controller::Controller;
use crate::core::{AgentPose, ObjectId, ObjectType, Position};
use crate::error::{DrishtiError, Result};
use crate::protocol::{ActionRequest, ReceptacleDescriptor, SimulationHost};
use crate::scene::ContainmentIndex;

use super::guard::with_open_receptacle;
use super::table::{PivotRecord, PivotTable, ReceptacleSighting, VisibilityRecord};

/// Sweep settings.
#[derive(Clone, Debug)]
pub struct CalibratorConfig {
    /// Agent headings (degrees)
    pub headings: Vec<f32>,
    /// Horizons for the receptacle sweep (degrees)
    pub receptacle_pitches: Vec<f32>,
    /// Horizons for the object sighting sweep (degrees)
    pub object_pitches: Vec<f32>,
    /// Preferred probe types, highest priority first
    pub probe_types: Vec<ObjectType>,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            headings: vec![0.0, 90.0, 180.0, 270.0],
            receptacle_pitches: vec![330.0, 0.0, 30.0],
            object_pitches: vec![330.0, 0.0, 30.0, 60.0],
            probe_types: vec![ObjectType::new("Mug"), ObjectType::new("CellPhone")],
        }
    }
}

/// Output of a receptacle sweep.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Object placed into pivots during the sweep
    pub probe: Option<ObjectId>,
    pub pivot_table: PivotTable,
    pub sightings: Vec<ReceptacleSighting>,
    /// Replace actions issued
    pub placements: usize,
}

/// Runs the receptacle and object visibility sweeps.
pub struct VisibilityCalibrator {
    config: CalibratorConfig,
}

impl VisibilityCalibrator {
    pub fn new(config: CalibratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    /// Pick up every pickupable object and choose the probe.
    ///
    /// Pickup refusals are logged and skipped. The probe is the first
    /// pickupable of the highest-priority probe type present, else the first
    /// pickupable in metadata order.
    pub fn prepare_probe<H: SimulationHost>(
        &self,
        controller: &mut Controller<H>,
    ) -> Result<ObjectId> {
        let pickupables: Vec<(ObjectId, ObjectType)> = controller
            .last_observation()?
            .objects
            .iter()
            .filter(|o| o.pickupable)
            .map(|o| (o.object_id.clone(), o.object_type.clone()))
            .collect();

        for (id, _) in &pickupables {
            let obs = controller.step(&ActionRequest::pickup(id.clone()))?;
            if !obs.last_action_success {
                tracing::warn!("Pickup of {} refused: {}", id, obs.error_message);
            }
        }

        let preferred = self.config.probe_types.iter().find_map(|wanted| {
            pickupables
                .iter()
                .find(|(_, object_type)| object_type == wanted)
        });

        preferred
            .or_else(|| pickupables.first())
            .map(|(id, _)| id.clone())
            .ok_or(DrishtiError::NoProbeObject)
    }

    fn teleport_checked<H: SimulationHost>(
        controller: &mut Controller<H>,
        point: &Position,
    ) -> Result<()> {
        controller.step_checked(&ActionRequest::Teleport {
            x: point.x,
            y: point.y,
            z: point.z,
        })?;
        Ok(())
    }

    /// Place the probe in each pivot of `receptacle` and record where it shows.
    fn scan_pivots<H: SimulationHost>(
        controller: &mut Controller<H>,
        probe: &ObjectId,
        receptacle: &ReceptacleDescriptor,
        pose: AgentPose,
    ) -> Result<Vec<PivotRecord>> {
        let mut records = Vec::new();
        for pivot in 0..receptacle.pivot_count {
            let obs = controller.step_checked(&ActionRequest::replace(
                probe.clone(),
                receptacle.id.clone(),
                pivot,
            ))?;

            let Some(meta) = obs.object(probe).filter(|o| o.visible) else {
                continue;
            };
            tracing::debug!(
                "{} pivot {} visible at {:.2}m (heading {}, pitch {})",
                receptacle.id,
                pivot,
                meta.distance,
                pose.heading,
                pose.pitch
            );
            records.push(PivotRecord {
                receptacle_id: receptacle.id.clone(),
                pivot_index: pivot,
                distance: meta.distance,
                pose,
                opened_receptacle: receptacle.openable,
            });
        }
        Ok(records)
    }

    /// Sweep every grid point and pose, probing the pivots of each visible
    /// receptacle.
    ///
    /// Openable receptacles are opened for the pivot scan (unless already
    /// open) and closed afterwards on every path. Any refused teleport, look, open, place or
    /// close aborts the sweep.
    pub fn find_visible_receptacles<H: SimulationHost>(
        &self,
        controller: &mut Controller<H>,
        points: &[Position],
    ) -> Result<CalibrationResult> {
        let probe = self.prepare_probe(controller)?;
        tracing::info!(
            "Calibrating receptacles from {} points with probe {}",
            points.len(),
            probe
        );

        let mut result = CalibrationResult {
            probe: Some(probe.clone()),
            ..Default::default()
        };

        for point in points {
            Self::teleport_checked(controller, point)?;

            for &heading in &self.config.headings {
                for &pitch in &self.config.receptacle_pitches {
                    let obs = controller.step_checked(&ActionRequest::rotate_look(heading, pitch))?;
                    let pose = AgentPose::at(*point, heading, pitch);
                    let visible = obs.visible_receptacles();

                    result
                        .sightings
                        .extend(visible.iter().map(|(r, distance)| ReceptacleSighting {
                            receptacle_id: r.id.clone(),
                            distance: *distance,
                            pose,
                        }));

                    for (receptacle, _) in &visible {
                        let records = if receptacle.openable {
                            with_open_receptacle(
                                controller,
                                &receptacle.id,
                                receptacle.is_open,
                                |c| Self::scan_pivots(c, &probe, receptacle, pose),
                            )?
                        } else {
                            Self::scan_pivots(controller, &probe, receptacle, pose)?
                        };
                        result.placements += receptacle.pivot_count;
                        result.pivot_table.extend(records);
                    }
                }
            }
        }

        tracing::info!(
            "Receptacle calibration done: {} pivot records, {} sightings",
            result.pivot_table.len(),
            result.sightings.len()
        );
        Ok(result)
    }

    /// Best sighting of every visible pickupable object over all points and
    /// object pitches.
    ///
    /// Objects held in a closed openable receptacle are skipped. A record
    /// is only replaced by a strictly closer sighting.
    pub fn find_visible_objects<H: SimulationHost>(
        &self,
        controller: &mut Controller<H>,
        points: &[Position],
    ) -> Result<BTreeMap<ObjectId, VisibilityRecord>> {
        let mut best: BTreeMap<ObjectId, VisibilityRecord> = BTreeMap::new();

        for point in points {
            Self::teleport_checked(controller, point)?;

            for &heading in &self.config.headings {
                for &pitch in &self.config.object_pitches {
                    let obs = controller.step_checked(&ActionRequest::rotate_look(heading, pitch))?;
                    let pose = AgentPose::at(*point, heading, pitch);

                    for object in obs.objects.iter().filter(|o| o.visible && o.pickupable) {
                        let hidden = ContainmentIndex::pivot_holder(obs, &object.object_id)
                            .is_some_and(|holder| holder.openable && !holder.is_open);
                        if hidden {
                            continue;
                        }

                        let record = VisibilityRecord {
                            distance: object.distance,
                            pose,
                        };
                        best.entry(object.object_id.clone())
                            .and_modify(|current| {
                                if record.distance < current.distance {
                                    *current = record;
                                }
                            })
                            .or_insert(record);
                    }
                }
            }
        }

        tracing::info!("Object sightings recorded for {} objects", best.len());
        Ok(best)
    }
}
