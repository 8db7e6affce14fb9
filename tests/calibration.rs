//! Receptacle calibration, scene setup and end-to-end runs.

mod common;

use common::{cabinet_scene, cell, container, controller, fail, pickupable};
use drishti::calibrate::{CalibratorConfig, VisibilityCalibrator};
use drishti::protocol::{ActionRequest, handoff};
use drishti::scene::{SceneConfig, SceneInitializer};
use drishti::sim::{MockHost, MockScene};
use drishti::{CalibrationSession, DrishtiConfig, DrishtiError, ObjectId, ReceptacleId};

/// One heading, one pitch: every visible receptacle is scanned exactly once
fn single_pose() -> VisibilityCalibrator {
    VisibilityCalibrator::new(CalibratorConfig {
        headings: vec![0.0],
        receptacle_pitches: vec![0.0],
        object_pitches: vec![0.0],
        ..Default::default()
    })
}

fn actions_after_pickups(host: &MockHost) -> Vec<&'static str> {
    host.actions()
        .iter()
        .map(|a| a.name())
        .skip_while(|name| *name != "Teleport")
        .collect()
}

#[test]
fn test_every_pivot_probed_once_per_pose() {
    let mut controller = controller(cabinet_scene());
    let result = single_pose()
        .find_visible_receptacles(&mut controller, &[cell(1, 0)])
        .unwrap();

    let host = controller.host();
    assert_eq!(host.count("Replace"), 3);
    assert_eq!(
        actions_after_pickups(host),
        vec![
            "Teleport",
            "RotateLook",
            "OpenObject",
            "Replace",
            "Replace",
            "Replace",
            "CloseObject"
        ]
    );
    assert!(!host.is_open("Cabinet|1"));

    let pivots: Vec<usize> = result
        .pivot_table
        .records()
        .iter()
        .map(|r| r.pivot_index)
        .collect();
    assert_eq!(pivots, vec![0, 2]);
    assert_eq!(result.probe, Some(ObjectId::new("Mug|1")));
    assert_eq!(result.placements, 3);
    assert_eq!(result.sightings.len(), 1);

    let record = &result.pivot_table.records()[0];
    assert!(record.opened_receptacle);
    assert_eq!(record.pose.heading, 0.0);
    assert!(record.distance > 0.0);
}

#[test]
fn test_every_pivot_probed_once_per_qualifying_heading() {
    let mut controller = controller(cabinet_scene());
    // Cabinet is dead ahead at heading 0, 30 degrees off at 30, behind at 180
    let calibrator = VisibilityCalibrator::new(CalibratorConfig {
        headings: vec![0.0, 30.0, 180.0],
        receptacle_pitches: vec![0.0],
        ..Default::default()
    });
    let result = calibrator
        .find_visible_receptacles(&mut controller, &[cell(1, 0)])
        .unwrap();

    let host = controller.host();
    assert_eq!(host.count("RotateLook"), 3);
    assert_eq!(host.count("Replace"), 6);
    assert_eq!(host.count("OpenObject"), 2);
    assert_eq!(host.count("CloseObject"), 2);
    assert!(!host.is_open("Cabinet|1"));

    let headings: Vec<(f32, usize)> = result
        .pivot_table
        .records()
        .iter()
        .map(|r| (r.pose.heading, r.pivot_index))
        .collect();
    assert_eq!(headings, vec![(0.0, 0), (0.0, 2), (30.0, 0), (30.0, 2)]);
}

#[test]
fn test_open_container_scanned_without_reopening() {
    let mut scene = cabinet_scene();
    scene.objects[0].is_open = true;
    let mut controller = controller(scene);

    let result = single_pose()
        .find_visible_receptacles(&mut controller, &[cell(1, 0)])
        .unwrap();

    let host = controller.host();
    assert_eq!(host.count("OpenObject"), 0);
    assert_eq!(
        actions_after_pickups(host),
        vec![
            "Teleport",
            "RotateLook",
            "Replace",
            "Replace",
            "Replace",
            "CloseObject"
        ]
    );
    assert!(!host.is_open("Cabinet|1"));
    assert_eq!(result.pivot_table.len(), 2);
}

#[test]
fn test_full_calibration_never_reopens_scene_targets() {
    let mut session = CalibrationSession::new(
        MockHost::new(common::studio()),
        DrishtiConfig::default(),
        42,
    );
    let report = session.calibrate("studio").unwrap();
    assert!(!report.scene_setup.opened.is_empty());

    // Every open and close was accepted: the mock refuses redundant ones
    let host = session.into_host();
    let mut open: Vec<ObjectId> = Vec::new();
    for action in host.actions() {
        match action {
            ActionRequest::Reset { .. } => open.clear(),
            ActionRequest::OpenObject { object_id, .. } => {
                assert!(!open.contains(object_id), "{} opened twice", object_id);
                open.push(object_id.clone());
            }
            ActionRequest::CloseObject { object_id, .. } => {
                assert!(open.contains(object_id), "{} closed while closed", object_id);
                open.retain(|o| o != object_id);
            }
            _ => {}
        }
    }
}

#[test]
fn test_container_closed_when_no_pivot_visible() {
    let mut scene = cabinet_scene();
    scene.objects[0].visible_pivots = Some(Vec::new());
    let mut controller = controller(scene);

    let result = single_pose()
        .find_visible_receptacles(&mut controller, &[cell(1, 0)])
        .unwrap();

    assert!(result.pivot_table.is_empty());
    assert_eq!(controller.host().count("Replace"), 3);
    assert_eq!(controller.host().count("CloseObject"), 1);
    assert!(!controller.host().is_open("Cabinet|1"));
}

#[test]
fn test_failed_placement_aborts_and_closes() {
    let mut scene = cabinet_scene();
    scene.failures.push(fail("Replace", "Cabinet|1"));
    let mut controller = controller(scene);

    let err = single_pose()
        .find_visible_receptacles(&mut controller, &[cell(1, 0)])
        .unwrap_err();

    match err {
        DrishtiError::ActionFailed { action, .. } => assert_eq!(action, "Replace"),
        other => panic!("unexpected error: {other}"),
    }
    let host = controller.host();
    assert_eq!(host.count("Replace"), 1);
    assert_eq!(host.actions().last().map(|a| a.name()), Some("CloseObject"));
    assert!(!host.is_open("Cabinet|1"));
}

#[test]
fn test_failed_open_aborts_before_placement() {
    let mut scene = cabinet_scene();
    scene.failures.push(fail("OpenObject", "Cabinet|1"));
    let mut controller = controller(scene);

    let err = single_pose()
        .find_visible_receptacles(&mut controller, &[cell(1, 0)])
        .unwrap_err();

    assert!(matches!(err, DrishtiError::ActionFailed { action: "OpenObject", .. }));
    assert_eq!(controller.host().count("Replace"), 0);
}

#[test]
fn test_failed_close_is_fatal() {
    let mut scene = cabinet_scene();
    scene.failures.push(fail("CloseObject", "Cabinet|1"));
    let mut controller = controller(scene);

    let err = single_pose()
        .find_visible_receptacles(&mut controller, &[cell(1, 0)])
        .unwrap_err();
    assert!(matches!(err, DrishtiError::ActionFailed { action: "CloseObject", .. }));
}

#[test]
fn test_no_probe_object() {
    let mut scene = MockScene::open_room(2, 2);
    scene.objects = vec![container("Box|1", [0.0, 0.5, 1.0], 2, None, &[])];
    let mut controller = controller(scene);

    let err = single_pose()
        .find_visible_receptacles(&mut controller, &[cell(0, 0)])
        .unwrap_err();
    assert!(matches!(err, DrishtiError::NoProbeObject));
}

#[test]
fn test_probe_prefers_configured_type() {
    let mut scene = MockScene::open_room(2, 2);
    scene.objects = vec![
        pickupable("Apple|1", [0.0, 0.9, 1.0]),
        pickupable("CellPhone|1", [0.25, 0.9, 1.0]),
    ];
    let mut controller = controller(scene);

    let probe = single_pose().prepare_probe(&mut controller).unwrap();
    assert_eq!(probe, ObjectId::new("CellPhone|1"));
    assert_eq!(controller.host().count("PickupObject"), 2);
}

#[test]
fn test_object_sightings_skip_closed_containers() {
    let mut scene = MockScene::open_room(3, 3);
    let mut fridge = container("Fridge|1", [0.5, 0.8, 1.0], 2, None, &["Egg|1"]);
    fridge.transparent = true;
    scene.objects = vec![
        fridge,
        pickupable("Egg|1", [0.5, 0.8, 1.0]),
        pickupable("Apple|1", [0.25, 0.9, 1.25]),
    ];
    let mut controller = controller(scene);
    let calibrator = single_pose();

    let sightings = calibrator
        .find_visible_objects(&mut controller, &[cell(1, 0), cell(1, 2)])
        .unwrap();
    assert!(!sightings.contains_key(&ObjectId::new("Egg|1")));
    assert!(!sightings.contains_key(&ObjectId::new("Fridge|1")));

    // Strictly closer sighting from the second point wins
    let apple = sightings[&ObjectId::new("Apple|1")];
    assert!((apple.distance - 0.75).abs() < 1e-4);
    assert_eq!(apple.pose.z, 0.5);

    controller
        .open_checked(&ReceptacleId::new("Fridge|1"))
        .unwrap();
    let sightings = calibrator
        .find_visible_objects(&mut controller, &[cell(1, 0)])
        .unwrap();
    assert!(sightings.contains_key(&ObjectId::new("Egg|1")));
}

fn two_kitchens() -> MockScene {
    let mut scene = MockScene::open_room(3, 3);
    scene.objects = vec![
        container("Fridge|1", [0.0, 0.8, 1.0], 2, None, &["Egg|1"]),
        container("Cabinet|1", [2.0, 0.5, 1.0], 2, None, &["Mug|1", "Cup|1"]),
        pickupable("Egg|1", [0.0, 0.8, 1.0]),
        pickupable("Mug|1", [2.0, 0.5, 1.0]),
        pickupable("Cup|1", [2.0, 0.5, 1.0]),
    ];
    scene
}

#[test]
fn test_scene_targets_far_apart_are_both_opened() {
    let mut controller = controller(two_kitchens());
    let setup = SceneInitializer::new(SceneConfig::default(), 5)
        .initialize(&mut controller)
        .unwrap();

    assert_eq!(setup.targets.len(), 2);
    assert_ne!(setup.targets[0].container, setup.targets[1].container);
    assert_eq!(setup.opened.len(), 2);
    assert!(controller.host().is_open("Fridge|1"));
    assert!(controller.host().is_open("Cabinet|1"));
}

#[test]
fn test_scene_setup_reproducible_with_seed() {
    let run = |seed| {
        let mut controller = controller(two_kitchens());
        SceneInitializer::new(SceneConfig::default(), seed)
            .initialize(&mut controller)
            .unwrap()
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn test_scene_open_failure_is_fatal() {
    let mut scene = two_kitchens();
    scene.failures.push(fail("OpenObject", "Fridge|1"));
    let mut controller = controller(scene);

    let err = SceneInitializer::new(SceneConfig::default(), 5)
        .initialize(&mut controller)
        .unwrap_err();
    assert!(matches!(err, DrishtiError::ActionFailed { action: "OpenObject", .. }));
}

#[test]
fn test_studio_calibration_over_handoff() {
    let (client, endpoint) = handoff();
    let server = endpoint.spawn(MockHost::new(common::studio())).unwrap();

    let mut session = CalibrationSession::new(client, DrishtiConfig::default(), 42);
    let report = session.calibrate("studio").unwrap();

    // [3, 0] is first queued across the wall stub, so it is never reached
    assert_eq!(report.grid_points.len(), 10);
    assert_eq!(report.pruned, 0);
    assert!(!report.has_islands);
    assert!(!report.pivot_records.is_empty());
    assert_eq!(report.probe, Some(ObjectId::new("Mug|1")));
    assert!(
        report
            .pivot_records
            .records()
            .iter()
            .all(|r| r.pivot_index < 4)
    );
    assert!(!session.controller().host().is_pending());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/calibration.json");
    report.write_json(&path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["scene"], "studio");
    assert_eq!(json["grid_points"].as_array().unwrap().len(), 10);

    drop(session);
    server.join().unwrap().unwrap();
}

#[test]
fn test_placement_excludes_unusable_receptacles() {
    let mut session = CalibrationSession::new(
        MockHost::new(common::studio()),
        DrishtiConfig::default(),
        42,
    );
    session.calibrate("studio").unwrap();
    session.random_initialize(9, Vec::new()).unwrap();

    let host = session.into_host();
    match host.actions().last() {
        Some(ActionRequest::RandomInitialize {
            random_seed,
            exclude_object_ids,
            receptacle_objects,
            ..
        }) => {
            assert_eq!(*random_seed, 9);
            assert!(exclude_object_ids.contains(&ObjectId::new("Pan|1")));
            assert!(!receptacle_objects.is_empty());
        }
        other => panic!("unexpected last action: {:?}", other),
    }
}
