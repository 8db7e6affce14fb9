//! Mock scene description (YAML).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::Position;
use crate::error::{DrishtiError, Result};

/// Lattice cell index (column along X, row along Z)
pub type Cell = [i32; 2];

/// Floor lattice
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloorSpec {
    /// World X/Z of cell [0, 0]
    #[serde(default)]
    pub origin: [f32; 2],

    /// Cell spacing (meters)
    #[serde(default = "default_spacing")]
    pub spacing: f32,

    pub cols: i32,
    pub rows: i32,

    /// Agent height on the floor
    #[serde(default = "default_height")]
    pub height: f32,

    /// Cells the agent cannot stand on
    #[serde(default)]
    pub blocked: Vec<Cell>,

    /// Moves refused in both directions, e.g. a wall between two cells
    #[serde(default)]
    pub blocked_moves: Vec<[Cell; 2]>,

    /// Cells that put the agent at an unusual height
    #[serde(default)]
    pub heights: Vec<HeightOverride>,
}

fn default_spacing() -> f32 {
    0.25
}

fn default_height() -> f32 {
    0.9
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeightOverride {
    pub cell: Cell,
    pub y: f32,
}

/// Agent start state
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AgentSpec {
    #[serde(default)]
    pub start: Cell,
    #[serde(default)]
    pub heading: f32,
}

/// View cone used for every visibility test
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewSpec {
    /// Max floor distance at which anything is visible (meters)
    #[serde(default = "default_range")]
    pub range: f32,
    /// Full horizontal field of view (degrees)
    #[serde(default = "default_fov")]
    pub fov: f32,
}

fn default_range() -> f32 {
    1.5
}

fn default_fov() -> f32 {
    90.0
}

impl Default for ViewSpec {
    fn default() -> Self {
        Self {
            range: default_range(),
            fov: default_fov(),
        }
    }
}

/// One simulated object
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub position: [f32; 3],

    #[serde(default)]
    pub pickupable: bool,
    #[serde(default)]
    pub receptacle: bool,
    #[serde(default)]
    pub openable: bool,
    #[serde(default)]
    pub is_open: bool,

    /// Pivot slot count (receptacles)
    #[serde(default)]
    pub pivots: usize,

    /// Pivots whose contents can be seen; all when absent
    #[serde(default)]
    pub visible_pivots: Option<Vec<usize>>,

    /// Horizons from which this object can be seen; all when absent
    #[serde(default)]
    pub visible_pitches: Option<Vec<f32>>,

    /// Contents show through even when closed (glass doors)
    #[serde(default)]
    pub transparent: bool,

    /// Initial contents, assigned to pivots in order
    #[serde(default)]
    pub contains: Vec<String>,
}

impl ObjectSpec {
    pub fn position(&self) -> Position {
        Position::new(self.position[0], self.position[1], self.position[2])
    }
}

/// Injected action failure
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailureRule {
    /// Action name, e.g. `OpenObject`
    pub action: String,
    /// Only requests targeting this object; any when absent
    #[serde(default)]
    pub object_id: Option<String>,
    /// Number of failures before the rule expires; unlimited when absent
    #[serde(default)]
    pub times: Option<usize>,
    #[serde(default = "default_failure_message")]
    pub message: String,
}

fn default_failure_message() -> String {
    "injected failure".to_string()
}

/// Complete mock scene
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MockScene {
    #[serde(default = "default_name")]
    pub name: String,
    pub floor: FloorSpec,
    #[serde(default)]
    pub agent: AgentSpec,
    #[serde(default)]
    pub view: ViewSpec,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub failures: Vec<FailureRule>,
}

fn default_name() -> String {
    "mock".to_string()
}

impl MockScene {
    /// Load a scene from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML scene
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let scene: MockScene = serde_yaml::from_str(yaml)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Open floor of `cols` × `rows` cells at the default spacing
    pub fn open_room(cols: i32, rows: i32) -> Self {
        Self {
            name: format!("room_{}x{}", cols, rows),
            floor: FloorSpec {
                origin: [0.0, 0.0],
                spacing: default_spacing(),
                cols,
                rows,
                height: default_height(),
                blocked: Vec::new(),
                blocked_moves: Vec::new(),
                heights: Vec::new(),
            },
            agent: AgentSpec::default(),
            view: ViewSpec::default(),
            objects: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.floor.cols <= 0 || self.floor.rows <= 0 || !(self.floor.spacing > 0.0) {
            return Err(DrishtiError::Config(format!(
                "scene {}: floor needs positive cols, rows and spacing",
                self.name
            )));
        }
        for object in &self.objects {
            if object.contains.len() > object.pivots {
                return Err(DrishtiError::Config(format!(
                    "scene {}: {} holds {} objects but has {} pivots",
                    self.name,
                    object.id,
                    object.contains.len(),
                    object.pivots
                )));
            }
            for child in &object.contains {
                if !self.objects.iter().any(|o| &o.id == child) {
                    return Err(DrishtiError::Config(format!(
                        "scene {}: {} contains unknown object {}",
                        self.name, object.id, child
                    )));
                }
            }
        }
        Ok(())
    }

    /// World position of a cell center at floor height
    pub fn cell_position(&self, cell: Cell) -> Position {
        Position::new(
            self.floor.origin[0] + cell[0] as f32 * self.floor.spacing,
            self.cell_height(cell),
            self.floor.origin[1] + cell[1] as f32 * self.floor.spacing,
        )
    }

    /// Cell under a floor position, if the position sits on the lattice
    pub fn cell_at(&self, x: f32, z: f32) -> Option<Cell> {
        let fx = (x - self.floor.origin[0]) / self.floor.spacing;
        let fz = (z - self.floor.origin[1]) / self.floor.spacing;
        let (c, r) = (fx.round(), fz.round());
        if (fx - c).abs() > 0.05 || (fz - r).abs() > 0.05 {
            return None;
        }
        Some([c as i32, r as i32])
    }

    /// True if the agent may stand on `cell`
    pub fn is_floor(&self, cell: Cell) -> bool {
        (0..self.floor.cols).contains(&cell[0])
            && (0..self.floor.rows).contains(&cell[1])
            && !self.floor.blocked.contains(&cell)
    }

    /// True if a wall separates the two cells
    pub fn is_move_blocked(&self, from: Cell, to: Cell) -> bool {
        self.floor
            .blocked_moves
            .iter()
            .any(|[a, b]| (*a == from && *b == to) || (*a == to && *b == from))
    }

    pub fn cell_height(&self, cell: Cell) -> f32 {
        self.floor
            .heights
            .iter()
            .find(|h| h.cell == cell)
            .map(|h| h.y)
            .unwrap_or(self.floor.height)
    }
}
