//! Scene preparation before calibration.
//!
//! [`ContainmentIndex`] maps receptacles to the objects they hold.
//! [`SceneInitializer`] uses it to pick objects hidden behind openable
//! containers and opens those containers.

mod containment;
mod initializer;

pub use containment::ContainmentIndex;
pub use initializer::{SceneConfig, SceneInitializer, SceneSetup, SceneTarget};
