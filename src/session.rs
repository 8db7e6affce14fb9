//! End-to-end calibration flows.
//!
//! A session owns the controller and the explorer and runs the three flows:
//! exploring a freshly loaded scene with every container closed, re-scanning
//! a known grid after randomized placement, and the full calibration that
//! produces a [`CalibrationReport`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::calibrate::{
    PivotRecord, PivotTable, ReceptacleSighting, VisibilityCalibrator, VisibilityRecord,
    random_initialize_request,
};
use crate::config::DrishtiConfig;
use crate::controller::Controller;
use crate::core::{ObjectId, Position};
use crate::error::Result;
use crate::explore::{ExplorationSummary, GridExplorer};
use crate::protocol::{ActionRequest, Observation, ReceptacleObjectPair, SimulationHost};
use crate::scene::{SceneInitializer, SceneSetup};

/// Everything a full calibration run learned about a scene.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub scene: String,
    pub seed: u64,
    pub exploration: ExplorationSummary,
    /// Grid points after pruning
    pub grid_points: Vec<Position>,
    /// Points removed by pruning
    pub pruned: usize,
    /// Island check on the explored points, before pruning
    pub has_islands: bool,
    pub scene_setup: SceneSetup,
    pub probe: Option<ObjectId>,
    pub pivot_records: PivotTable,
    /// Closest record per receptacle pivot
    pub nearest_pivots: Vec<PivotRecord>,
    pub receptacle_sightings: Vec<ReceptacleSighting>,
    pub object_sightings: BTreeMap<ObjectId, VisibilityRecord>,
}

impl CalibrationReport {
    /// Write the report as pretty JSON, creating parent directories
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Orchestrates exploration, scene setup and calibration over one host.
pub struct CalibrationSession<H: SimulationHost> {
    controller: Controller<H>,
    config: DrishtiConfig,
    explorer: GridExplorer,
    calibrator: VisibilityCalibrator,
    seed: u64,
    pivot_table: PivotTable,
}

impl<H: SimulationHost> CalibrationSession<H> {
    /// Create a session. `seed` drives target choice and placement (0 = entropy).
    pub fn new(host: H, config: DrishtiConfig, seed: u64) -> Self {
        let explorer = GridExplorer::new(config.explorer_config());
        let calibrator = VisibilityCalibrator::new(config.calibrator_config());
        Self {
            controller: Controller::new(host),
            config,
            explorer,
            calibrator,
            seed,
            pivot_table: PivotTable::new(),
        }
    }

    pub fn controller(&self) -> &Controller<H> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller<H> {
        &mut self.controller
    }

    pub fn explorer(&self) -> &GridExplorer {
        &self.explorer
    }

    pub fn explorer_mut(&mut self) -> &mut GridExplorer {
        &mut self.explorer
    }

    /// Pivot table from the last receptacle calibration
    pub fn pivot_table(&self) -> &PivotTable {
        &self.pivot_table
    }

    pub fn into_host(self) -> H {
        self.controller.into_host()
    }

    fn load_scene(&mut self, scene: &str) -> Result<()> {
        self.controller.step_checked(&ActionRequest::Reset {
            scene_name: Some(scene.to_string()),
        })?;
        self.controller.step_checked(&ActionRequest::Initialize {
            grid_size: self.config.exploration.grid_size,
        })?;
        Ok(())
    }

    /// Load `scene` and discover every reachable grid point from the start pose.
    pub fn search_all_closed(&mut self, scene: &str) -> Result<ExplorationSummary> {
        self.explorer.reset();
        self.load_scene(scene)?;

        let start = self.controller.last_observation()?.agent_position();
        tracing::info!("Exploring {} from ({:.2}, {:.2})", scene, start.x, start.z);
        self.explorer.enqueue_points(start);
        self.explorer.run(&mut self.controller)
    }

    /// Prune the explorer's grid points.
    ///
    /// Returns the number of points removed and whether the explored set
    /// (before pruning) held islands.
    pub fn prune(&mut self) -> (usize, bool) {
        let points = self.explorer.take_grid_points();
        let islands = self.config.island_detector().has_islands(&points);
        let pruned = self.config.pruner().prune(&points);
        let removed = points.len() - pruned.len();
        self.explorer.set_grid_points(pruned);
        (removed, islands)
    }

    /// Send a RandomInitialize built from the current pivot table.
    pub fn random_initialize(
        &mut self,
        random_seed: u64,
        exclude_pairs: Vec<ReceptacleObjectPair>,
    ) -> Result<&Observation> {
        let request = random_initialize_request(
            &self.config.placement_config(),
            &self.pivot_table,
            self.controller.last_observation()?,
            random_seed,
            exclude_pairs,
        );
        self.controller.step_checked(&request)
    }

    /// Re-validate a known grid in a (possibly randomized) scene.
    ///
    /// The frontier is seeded from `full_grid` and frozen, so only moves out
    /// of known points are tried. The scene is reloaded, optionally
    /// randomized, initialized, scanned and pruned.
    pub fn start_search(
        &mut self,
        scene: &str,
        random_seed: u64,
        full_grid: &[Position],
        exclude_pairs: Vec<ReceptacleObjectPair>,
        randomize: bool,
    ) -> Result<(ExplorationSummary, SceneSetup)> {
        self.explorer.reset();
        self.explorer.seed_grid(full_grid);
        self.load_scene(scene)?;

        if randomize {
            self.random_initialize(random_seed, exclude_pairs)?;
        }

        let setup = SceneInitializer::new(self.config.scene_config(), self.seed)
            .initialize(&mut self.controller)?;
        let summary = self.explorer.run(&mut self.controller)?;
        self.prune();
        Ok((summary, setup))
    }

    /// Full calibration of one scene.
    ///
    /// Explores with all containers closed, prunes, reloads the scene,
    /// opens the target containers, then records object sightings and pivot
    /// visibility from every remaining grid point.
    pub fn calibrate(&mut self, scene: &str) -> Result<CalibrationReport> {
        let exploration = self.search_all_closed(scene)?;
        let (pruned, has_islands) = self.prune();
        let grid_points = self.explorer.grid_points().to_vec();

        self.load_scene(scene)?;
        let scene_setup = SceneInitializer::new(self.config.scene_config(), self.seed)
            .initialize(&mut self.controller)?;

        let object_sightings = self
            .calibrator
            .find_visible_objects(&mut self.controller, &grid_points)?;
        let result = self
            .calibrator
            .find_visible_receptacles(&mut self.controller, &grid_points)?;

        self.pivot_table = result.pivot_table;
        let nearest_pivots: Vec<PivotRecord> = self
            .pivot_table
            .nearest_by_pivot()
            .into_values()
            .cloned()
            .collect();

        tracing::info!(
            "Calibrated {}: {} points, {} pivot records, {} actions",
            scene,
            grid_points.len(),
            self.pivot_table.len(),
            self.controller.actions_issued()
        );

        Ok(CalibrationReport {
            scene: scene.to_string(),
            seed: self.seed,
            exploration,
            grid_points,
            pruned,
            has_islands,
            scene_setup,
            probe: result.probe,
            pivot_records: self.pivot_table.clone(),
            nearest_pivots,
            receptacle_sightings: result.sightings,
            object_sightings,
        })
    }
}
