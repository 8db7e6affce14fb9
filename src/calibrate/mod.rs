//! Receptacle visibility calibration.
//!
//! The calibrator places a probe object into every pivot slot of every
//! receptacle it can see, from every grid point and orientation, and records
//! the poses from which the probe stays visible. The resulting [`PivotTable`]
//! decides which receptacles randomized placement may use.
//!
//! - [`VisibilityCalibrator`]: receptacle and object sweeps
//! - [`with_open_receptacle`]: open/scan/close with the close on every path
//! - [`placement`]: `RandomInitialize` request from the table

mod calibrator;
mod guard;
pub mod placement;
mod table;

pub use calibrator::{CalibrationResult, CalibratorConfig, VisibilityCalibrator};
pub use guard::with_open_receptacle;
pub use placement::{PlacementConfig, random_initialize_request};
pub use table::{PivotRecord, PivotTable, ReceptacleSighting, VisibilityRecord};
