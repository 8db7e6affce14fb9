//! Position, move vector and lattice key types.

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Agent position in simulation coordinates (meters).
///
/// The floor plane is X/Z; `y` is height and is whatever the simulation
/// reports, never chosen by the explorer.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate in meters
    pub x: f32,
    /// Height in meters
    pub y: f32,
    /// Z coordinate in meters
    pub z: f32,
}

impl Position {
    /// Create a new position
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Origin
    pub const ZERO: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Euclidean distance on the floor plane (ignores height)
    #[inline]
    pub fn floor_distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Same position shifted on the floor plane
    #[inline]
    pub fn offset(&self, dx: f32, dz: f32) -> Position {
        Position::new(self.x + dx, self.y, self.z + dz)
    }
}

impl Add<MoveVector> for Position {
    type Output = Position;

    #[inline]
    fn add(self, mv: MoveVector) -> Position {
        self.offset(mv.dx, mv.dz)
    }
}

/// Axis-aligned agent move.
///
/// Both axis components are always present; exactly one of them is non-zero
/// for moves generated by the explorer. `magnitude` overrides the configured
/// step length when set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveVector {
    /// X component (meters)
    pub dx: f32,
    /// Z component (meters)
    pub dz: f32,
    /// Step length sent with the move command
    #[serde(default)]
    pub magnitude: Option<f32>,
}

impl MoveVector {
    /// Create a move vector without an explicit magnitude
    #[inline]
    pub fn new(dx: f32, dz: f32) -> Self {
        Self {
            dx,
            dz,
            magnitude: None,
        }
    }

    /// The four cardinal moves of length `step`, in order -X, +X, -Z, +Z
    pub fn cardinal(step: f32) -> [MoveVector; 4] {
        [
            MoveVector::new(-step, 0.0),
            MoveVector::new(step, 0.0),
            MoveVector::new(0.0, -step),
            MoveVector::new(0.0, step),
        ]
    }

    /// Attach an explicit magnitude
    #[inline]
    pub fn with_magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    /// True when exactly one axis is non-zero
    #[inline]
    pub fn is_axis_aligned(&self) -> bool {
        (self.dx == 0.0) != (self.dz == 0.0)
    }
}

/// Integer lattice key for hash lookups of floor positions.
///
/// Coordinates are quantized to `resolution` meters, so positions that
/// differ by float noise well below the resolution share a key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    /// Quantized X
    pub x: i64,
    /// Quantized Z
    pub z: i64,
}

impl GridKey {
    /// Quantize a floor coordinate
    #[inline]
    pub fn from_xz(x: f32, z: f32, resolution: f32) -> Self {
        Self {
            x: (x / resolution).round() as i64,
            z: (z / resolution).round() as i64,
        }
    }

    /// Quantize a position (height ignored)
    #[inline]
    pub fn of(position: &Position, resolution: f32) -> Self {
        Self::from_xz(position.x, position.z, resolution)
    }

    /// Index of the lattice cell holding `position`, for a lattice of
    /// `spacing` anchored at `origin`.
    ///
    /// Drift of up to half a cell still lands on the nominal index.
    #[inline]
    pub fn on_lattice(position: &Position, origin: &Position, spacing: f32) -> Self {
        Self::from_xz(position.x - origin.x, position.z - origin.z, spacing)
    }

    /// Key `dx`/`dz` cells away
    #[inline]
    pub fn step(self, dx: i64, dz: i64) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }
}
