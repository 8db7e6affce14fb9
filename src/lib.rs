//! # Drishti: grid discovery and receptacle visibility calibration
//!
//! Drishti explores the navigable floor of a simulated indoor scene by
//! discrete grid sampling, then works out from which agent poses an object
//! placed in a container pivot slot is actually visible. The resulting pivot
//! table steers randomized object placement away from slots the agent can
//! never see.
//!
//! ## Pipeline
//!
//! ```text
//! SceneInitializer ─► GridExplorer ─► ReachabilityPruner ─► VisibilityCalibrator
//!   open targets      BFS over moves    drop isolated points   pivot sweep
//!                          │
//!                          └─► IslandDetector (diagnostic)
//! ```
//!
//! ## Simulation boundary
//!
//! Everything goes through [`SimulationHost::step`]: one [`ActionRequest`]
//! in, one [`Observation`] out, one request outstanding at a time. The
//! [`protocol::handoff`] channel carries that contract across threads, and
//! [`sim::MockHost`] provides a deterministic in-memory scene.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drishti::{CalibrationSession, DrishtiConfig};
//! use drishti::sim::{MockHost, MockScene};
//!
//! let host = MockHost::new(MockScene::open_room(4, 4));
//! let mut session = CalibrationSession::new(host, DrishtiConfig::default(), 42);
//! let report = session.calibrate("room").unwrap();
//! println!("{} grid points, {} pivot records",
//!     report.grid_points.len(), report.pivot_records.len());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: positions, move vectors, identifiers
//! - [`protocol`]: action/observation types and the host handoff
//! - [`controller`]: synchronous action execution
//! - [`explore`]: grid discovery, pruning and island detection
//! - [`scene`]: containment index and target selection
//! - [`calibrate`]: visibility sweeps and the pivot table
//! - [`session`]: end-to-end flows
//! - [`sim`]: mock simulation host
//! - [`config`]: TOML configuration

pub mod calibrate;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod explore;
pub mod protocol;
pub mod scene;
pub mod session;
pub mod sim;

pub use calibrate::{PivotRecord, PivotTable, VisibilityCalibrator};
pub use config::DrishtiConfig;
pub use controller::Controller;
pub use core::{MoveVector, ObjectId, ObjectType, Position, ReceptacleId};
pub use error::{DrishtiError, Result};
pub use explore::{GridExplorer, IslandDetector, ReachabilityPruner};
pub use protocol::{ActionRequest, Observation, SimulationHost};
pub use scene::SceneInitializer;
pub use session::{CalibrationReport, CalibrationSession};
