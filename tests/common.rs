//! Shared scene builders for integration tests.

#![allow(dead_code)]

use drishti::sim::{FailureRule, HeightOverride, MockHost, MockScene, ObjectSpec};
use drishti::{Controller, Position};

pub fn studio_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/scenes/studio.yaml")
}

pub fn studio() -> MockScene {
    MockScene::load(std::path::Path::new(studio_path())).unwrap()
}

/// Open room with some cells blocked
pub fn room(cols: i32, rows: i32, blocked: &[[i32; 2]]) -> MockScene {
    let mut scene = MockScene::open_room(cols, rows);
    scene.floor.blocked = blocked.to_vec();
    scene
}

/// Open room where standing on `cell` puts the agent at height `y`
pub fn room_with_height(cols: i32, rows: i32, cell: [i32; 2], y: f32) -> MockScene {
    let mut scene = MockScene::open_room(cols, rows);
    scene.floor.heights.push(HeightOverride { cell, y });
    scene
}

/// Floor position of a lattice cell at the default spacing
pub fn cell(col: i32, row: i32) -> Position {
    Position::new(col as f32 * 0.25, 0.9, row as f32 * 0.25)
}

pub fn lattice(cols: i32, rows: i32) -> Vec<Position> {
    (0..cols)
        .flat_map(|c| (0..rows).map(move |r| cell(c, r)))
        .collect()
}

pub fn object(id: &str, position: [f32; 3]) -> ObjectSpec {
    ObjectSpec {
        id: id.to_string(),
        object_type: id.split('|').next().unwrap_or(id).to_string(),
        position,
        pickupable: false,
        receptacle: false,
        openable: false,
        is_open: false,
        pivots: 0,
        visible_pivots: None,
        visible_pitches: None,
        transparent: false,
        contains: Vec::new(),
    }
}

pub fn pickupable(id: &str, position: [f32; 3]) -> ObjectSpec {
    ObjectSpec {
        pickupable: true,
        ..object(id, position)
    }
}

pub fn container(
    id: &str,
    position: [f32; 3],
    pivots: usize,
    visible_pivots: Option<Vec<usize>>,
    contains: &[&str],
) -> ObjectSpec {
    ObjectSpec {
        receptacle: true,
        openable: true,
        pivots,
        visible_pivots,
        contains: contains.iter().map(|c| c.to_string()).collect(),
        ..object(id, position)
    }
}

/// 3×3 room, one cabinet straight ahead of cell [1, 1] with a mug inside.
///
/// Pivots 0 and 2 of the cabinet's three are visible once it is open.
pub fn cabinet_scene() -> MockScene {
    let mut scene = MockScene::open_room(3, 3);
    scene.objects = vec![
        container("Cabinet|1", [0.25, 0.5, 1.0], 3, Some(vec![0, 2]), &["Mug|1"]),
        pickupable("Mug|1", [0.25, 0.5, 1.0]),
    ];
    scene
}

pub fn fail(action: &str, object_id: &str) -> FailureRule {
    FailureRule {
        action: action.to_string(),
        object_id: Some(object_id.to_string()),
        times: None,
        message: "injected failure".to_string(),
    }
}

/// Controller over a freshly reset mock host
pub fn controller(scene: MockScene) -> Controller<MockHost> {
    let mut controller = Controller::new(MockHost::new(scene));
    controller.reset(None).unwrap();
    controller
}
