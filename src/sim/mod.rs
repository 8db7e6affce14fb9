//! Mock simulation host for hardware-free runs and tests.
//!
//! # Overview
//!
//! | Concern | Model |
//! |---------|-------|
//! | Floor | Rectangular lattice with blocked cells and blocked moves |
//! | Agent height | Floor height, per-cell overrides |
//! | Visibility | Horizontal view cone plus optional per-object horizons |
//! | Containers | Pivot slots, visible pivot subset, open/closed state |
//! | Failures | Injected per action and object, optionally expiring |
//!
//! # Scene Format
//!
//! ```yaml
//! name: studio
//! floor:
//!   origin: [0.0, 0.0]   # x, z of cell [0, 0]
//!   spacing: 0.25
//!   cols: 4
//!   rows: 3
//!   blocked: [[1, 1]]
//!   blocked_moves: [[[2, 0], [3, 0]]]
//! view:
//!   range: 1.5
//!   fov: 90
//! objects:
//!   - id: Fridge|1
//!     type: Fridge
//!     position: [0.75, 0.8, 1.0]
//!     receptacle: true
//!     openable: true
//!     pivots: 4
//!     visible_pivots: [0, 1]
//!     contains: [Egg|1]
//!   - id: Egg|1
//!     type: Egg
//!     position: [0.75, 0.8, 1.0]
//!     pickupable: true
//! failures:
//!   - action: CloseObject
//!     object_id: Fridge|1
//!     times: 1
//! ```

mod host;
mod scene;
mod visibility;

pub use host::MockHost;
pub use scene::{AgentSpec, Cell, FailureRule, FloorSpec, HeightOverride, MockScene, ObjectSpec, ViewSpec};
pub use visibility::{in_view_cone, pitch_allowed};
