//! Main DrishtiConfig and conversion methods.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calibrate::{CalibratorConfig, PlacementConfig};
use crate::core::ObjectType;
use crate::error::{DrishtiError, Result};
use crate::explore::{ExplorerConfig, IslandDetector, ReachabilityPruner};
use crate::protocol::ReceptacleObjects;
use crate::scene::SceneConfig;

use super::sections::{
    CalibrationSection, ConnectivitySection, ExplorationSection, OutputSection,
    PlacementSection, SceneSection,
};

/// Full Drishti configuration loaded from TOML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DrishtiConfig {
    #[serde(default)]
    pub exploration: ExplorationSection,

    #[serde(default)]
    pub connectivity: ConnectivitySection,

    #[serde(default)]
    pub calibration: CalibrationSection,

    #[serde(default)]
    pub scene: SceneSection,

    #[serde(default)]
    pub placement: PlacementSection,

    #[serde(default)]
    pub output: OutputSection,
}

impl DrishtiConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DrishtiError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DrishtiConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let magnitude = self.exploration.move_magnitude;
        if !(magnitude > 0.0) {
            return Err(DrishtiError::Config(format!(
                "move_magnitude must be positive, got {}",
                magnitude
            )));
        }
        if !(self.exploration.dedup_divisor > 1.0) {
            return Err(DrishtiError::Config(format!(
                "dedup_divisor must be greater than 1, got {}",
                self.exploration.dedup_divisor
            )));
        }
        let epsilon = self.connectivity.island_epsilon;
        if !(epsilon > 0.0 && epsilon < magnitude / 2.0) {
            return Err(DrishtiError::Config(format!(
                "island_epsilon must be in (0, {}), got {}",
                magnitude / 2.0,
                epsilon
            )));
        }
        if self.calibration.headings.is_empty() || self.calibration.receptacle_pitches.is_empty()
        {
            return Err(DrishtiError::Config(
                "calibration needs at least one heading and one pitch".to_string(),
            ));
        }
        Ok(())
    }

    /// Runtime explorer settings
    pub fn explorer_config(&self) -> ExplorerConfig {
        ExplorerConfig {
            move_magnitude: self.exploration.move_magnitude,
            max_agent_y: self.exploration.max_agent_y,
            dedup_threshold: self.exploration.move_magnitude / self.exploration.dedup_divisor,
        }
    }

    /// Island detector with the configured epsilon
    pub fn island_detector(&self) -> IslandDetector {
        IslandDetector::new(
            self.exploration.move_magnitude,
            self.connectivity.island_epsilon,
        )
    }

    /// Pruner keyed on the exploration lattice
    pub fn pruner(&self) -> ReachabilityPruner {
        ReachabilityPruner::new(self.exploration.move_magnitude)
    }

    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            target_separation: self.scene.target_separation,
        }
    }

    pub fn calibrator_config(&self) -> CalibratorConfig {
        CalibratorConfig {
            headings: self.calibration.headings.clone(),
            receptacle_pitches: self.calibration.receptacle_pitches.clone(),
            object_pitches: self.calibration.object_pitches.clone(),
            probe_types: to_types(&self.calibration.probe_types),
        }
    }

    pub fn placement_config(&self) -> PlacementConfig {
        PlacementConfig {
            excluded_receptacle_types: to_types(&self.placement.excluded_receptacle_types),
            unique_object_types: self.placement.unique_object_types,
            randomize_open: self.placement.randomize_open,
            receptacle_objects: ReceptacleObjects::from_table(&self.placement.receptacle_objects),
        }
    }
}

fn to_types(names: &[String]) -> Vec<ObjectType> {
    names.iter().map(|n| ObjectType::new(n.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = DrishtiConfig::default();
        assert_eq!(config.exploration.move_magnitude, 0.25);
        assert_eq!(config.calibration.headings.len(), 4);
        assert_eq!(config.calibration.receptacle_pitches.len(), 3);
        assert_eq!(config.calibration.object_pitches.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dedup_threshold_is_fifth_of_step() {
        let config = DrishtiConfig::default();
        assert_relative_eq!(config.explorer_config().dedup_threshold, 0.05);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = DrishtiConfig::from_toml(
            r#"
            [exploration]
            move_magnitude = 0.5

            [scene]
            random_seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.exploration.move_magnitude, 0.5);
        assert_eq!(config.exploration.max_agent_y, 1.3);
        assert_eq!(config.scene.random_seed, 7);
        assert_eq!(config.connectivity.island_epsilon, 0.05);
        assert!(config.placement.receptacle_objects.contains_key("Fridge"));
    }

    #[test]
    fn test_rejects_epsilon_larger_than_half_step() {
        let err = DrishtiConfig::from_toml(
            r#"
            [connectivity]
            island_epsilon = 0.2
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DrishtiError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drishti.toml");
        std::fs::write(&path, "[output]\nreport_path = \"out/pivots.json\"\n").unwrap();

        let config = DrishtiConfig::load(&path).unwrap();
        assert_eq!(config.output.report_path, "out/pivots.json");
    }

    #[test]
    fn test_placement_conversion() {
        let placement = DrishtiConfig::default().placement_config();
        assert!(
            placement
                .excluded_receptacle_types
                .contains(&ObjectType::new("Pan"))
        );
        assert!(!placement.receptacle_objects.is_empty());
    }
}
