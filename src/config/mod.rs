//! Configuration loading for Drishti.
//!
//! All settings come from a single TOML file; every field has a default, so
//! an empty file (or no file) is a valid configuration.
//!
//! ## Example TOML
//!
//! ```toml
//! [exploration]
//! move_magnitude = 0.25   # lattice spacing (m)
//! max_agent_y = 1.3       # higher agent = broken simulation
//!
//! [connectivity]
//! island_epsilon = 0.05   # same-cell tolerance for island detection (m)
//!
//! [calibration]
//! headings = [0.0, 90.0, 180.0, 270.0]
//! receptacle_pitches = [330.0, 0.0, 30.0]
//! probe_types = ["Mug", "CellPhone"]
//!
//! [scene]
//! target_separation = 1.25
//! random_seed = 42        # 0 = random each run
//! ```

mod defaults;
mod drishti;
mod sections;

pub use drishti::DrishtiConfig;
pub use sections::{
    CalibrationSection, ConnectivitySection, ExplorationSection, OutputSection,
    PlacementSection, SceneSection,
};
