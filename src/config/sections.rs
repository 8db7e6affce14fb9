//! Configuration sections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::defaults;

/// Grid exploration settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExplorationSection {
    /// Step length of every exploratory move (meters)
    #[serde(default = "defaults::move_magnitude")]
    pub move_magnitude: f32,

    /// Grid size sent with Initialize (meters)
    #[serde(default = "defaults::grid_size")]
    pub grid_size: f32,

    /// Highest plausible agent height; above it the simulation is broken
    #[serde(default = "defaults::max_agent_y")]
    pub max_agent_y: f32,

    /// Seen-point dedup threshold = move_magnitude / dedup_divisor
    #[serde(default = "defaults::dedup_divisor")]
    pub dedup_divisor: f32,
}

impl Default for ExplorationSection {
    fn default() -> Self {
        Self {
            move_magnitude: defaults::move_magnitude(),
            grid_size: defaults::grid_size(),
            max_agent_y: defaults::max_agent_y(),
            dedup_divisor: defaults::dedup_divisor(),
        }
    }
}

/// Neighbor matching tolerances
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectivitySection {
    /// Max floor distance for two points to count as the same lattice cell
    /// in island detection (meters). Must absorb simulation float noise but
    /// stay well under the move magnitude.
    #[serde(default = "defaults::island_epsilon")]
    pub island_epsilon: f32,
}

impl Default for ConnectivitySection {
    fn default() -> Self {
        Self {
            island_epsilon: defaults::island_epsilon(),
        }
    }
}

/// Visibility sweep settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationSection {
    /// Agent headings (degrees)
    #[serde(default = "defaults::headings")]
    pub headings: Vec<f32>,

    /// Camera horizons for the receptacle/pivot sweep (degrees)
    #[serde(default = "defaults::receptacle_pitches")]
    pub receptacle_pitches: Vec<f32>,

    /// Camera horizons for the object sighting sweep (degrees)
    #[serde(default = "defaults::object_pitches")]
    pub object_pitches: Vec<f32>,

    /// Preferred probe object types, in priority order
    #[serde(default = "defaults::probe_types")]
    pub probe_types: Vec<String>,
}

impl Default for CalibrationSection {
    fn default() -> Self {
        Self {
            headings: defaults::headings(),
            receptacle_pitches: defaults::receptacle_pitches(),
            object_pitches: defaults::object_pitches(),
            probe_types: defaults::probe_types(),
        }
    }
}

/// Scene preparation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneSection {
    /// Minimum distance between the containers of the two targets (meters)
    #[serde(default = "defaults::target_separation")]
    pub target_separation: f32,

    /// Seed for target selection and randomized placement (0 = random each run)
    #[serde(default)]
    pub random_seed: u64,
}

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            target_separation: defaults::target_separation(),
            random_seed: 0,
        }
    }
}

/// Randomized placement request settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacementSection {
    /// Receptacle types never used for placement
    #[serde(default = "defaults::excluded_receptacle_types")]
    pub excluded_receptacle_types: Vec<String>,

    #[serde(default = "defaults::enabled")]
    pub unique_object_types: bool,

    #[serde(default)]
    pub randomize_open: bool,

    /// Receptacle type → item types it may receive
    #[serde(default = "defaults::receptacle_objects")]
    pub receptacle_objects: BTreeMap<String, Vec<String>>,
}

impl Default for PlacementSection {
    fn default() -> Self {
        Self {
            excluded_receptacle_types: defaults::excluded_receptacle_types(),
            unique_object_types: true,
            randomize_open: false,
            receptacle_objects: defaults::receptacle_objects(),
        }
    }
}

/// Output settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputSection {
    /// Where the JSON calibration report is written
    #[serde(default = "defaults::report_path")]
    pub report_path: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            report_path: defaults::report_path(),
        }
    }
}
