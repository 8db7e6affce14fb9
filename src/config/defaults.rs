//! Default value functions for serde deserialization.

use std::collections::BTreeMap;

pub fn move_magnitude() -> f32 {
    0.25
}

pub fn grid_size() -> f32 {
    0.25
}

/// Agent heights above this mean the simulation put the agent on furniture
pub fn max_agent_y() -> f32 {
    1.3
}

/// Seen-point dedup threshold is move_magnitude / dedup_divisor
pub fn dedup_divisor() -> f32 {
    5.0
}

pub fn island_epsilon() -> f32 {
    0.05
}

pub fn headings() -> Vec<f32> {
    vec![0.0, 90.0, 180.0, 270.0]
}

pub fn receptacle_pitches() -> Vec<f32> {
    vec![330.0, 0.0, 30.0]
}

pub fn object_pitches() -> Vec<f32> {
    vec![330.0, 0.0, 30.0, 60.0]
}

pub fn probe_types() -> Vec<String> {
    vec!["Mug".to_string(), "CellPhone".to_string()]
}

/// Minimum distance between the containers of two targets (meters)
pub fn target_separation() -> f32 {
    1.25
}

pub fn excluded_receptacle_types() -> Vec<String> {
    vec!["Pot".to_string(), "Pan".to_string()]
}

pub fn enabled() -> bool {
    true
}

pub fn receptacle_objects() -> BTreeMap<String, Vec<String>> {
    let table = [
        (
            "Box",
            vec!["Candle", "CellPhone", "CreditCard", "KeyChain", "SoapBar"],
        ),
        (
            "Cabinet",
            vec!["Bowl", "Bread", "ButterKnife", "Candle", "CellPhone", "Mug", "Tomato"],
        ),
        ("Fridge", vec!["Apple", "Bread", "Egg", "Lettuce", "Potato", "Tomato"]),
        ("Microwave", vec!["Apple", "Bread", "Egg", "Mug", "Potato"]),
        ("TableTop", vec!["Apple", "Bowl", "Bread", "CellPhone", "Mug", "Tomato"]),
        ("TowelHolder", vec!["Cloth"]),
    ];

    table
        .into_iter()
        .map(|(receptacle, items)| {
            (
                receptacle.to_string(),
                items.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}

pub fn report_path() -> String {
    "output/calibration.json".to_string()
}
