//! Core types shared by exploration and calibration.
//!
//! ## Coordinates
//!
//! Positions use the simulation's frame: X and Z span the floor, Y is up.
//! Headings are degrees, 0 facing +Z and 90 facing +X.
//!
//! - [`Position`]: agent or object position in meters
//! - [`MoveVector`]: axis-aligned move with explicit components
//! - [`GridKey`]: quantized floor coordinate for hash lookups
//! - [`AgentPose`]: position plus heading/pitch
//!
//! ## Identifiers
//!
//! - [`ObjectId`], [`ReceptacleId`], [`ObjectType`]

mod ids;
mod point;
mod pose;

pub use ids::{ObjectId, ObjectType, ReceptacleId};
pub use point::{GridKey, MoveVector, Position};
pub use pose::{AgentPose, normalize_degrees};
