use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::coordinates::CoordinateFrame;
use super::error::{ConfigError, GeometryError};
use super::geometry::Board;
use super::locator::ChannelLocator;
use super::targets::TargetSettings;

/// Structure representing a measurement session. Contains the frame alignment, the
/// geometry to use and the target/output paths.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the beam hits the board center line, in stage coordinates (mm)
    pub origin: [f64; 2],
    pub base_rotation: f64,
    pub geometry_path: Option<PathBuf>,
    pub targets: TargetSettings,
    pub target_path: PathBuf,
    pub classified_path: PathBuf,
}

impl Default for Config {
    /// Generate a new Config object. The origin is the 2023 DESY test-beam alignment
    fn default() -> Self {
        Self {
            origin: [-361.4, -2306.2],
            base_rotation: 90.0,
            geometry_path: None,
            targets: TargetSettings::default(),
            target_path: PathBuf::from("hit_positions.csv"),
            classified_path: PathBuf::from("classified_hits.csv"),
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// The session coordinate frame
    pub fn frame(&self) -> CoordinateFrame {
        CoordinateFrame::new(self.origin, self.base_rotation)
    }

    /// Load the board geometry. If no geometry path is set, the bundled D8 catalog is used
    pub fn load_board(&self) -> Result<Board, GeometryError> {
        Board::load(self.geometry_path.as_deref())
    }

    /// Build a locator for this session
    pub fn locator(&self) -> Result<ChannelLocator, GeometryError> {
        Ok(ChannelLocator::new(self.load_board()?, self.frame()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_yaml_round_trip() {
        let path = std::env::temp_dir().join(format!("tileboard_config_{}.yaml", std::process::id()));
        let mut config = Config::default();
        config.origin = [12.0, -4.5];
        config.targets.serpentine = false;
        config.write_config_file(&path).unwrap();

        let loaded = Config::read_config_file(&path).unwrap();
        assert_eq!(loaded.origin, [12.0, -4.5]);
        assert!(!loaded.targets.serpentine);
        assert_eq!(loaded.geometry_path, None);
        assert_eq!(loaded.frame(), CoordinateFrame::new([12.0, -4.5], 90.0));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_config() {
        let result = Config::read_config_file(Path::new("/not/a/config.yaml"));
        assert!(matches!(result, Err(ConfigError::BadFilePath(_))));
    }

    #[test]
    fn test_default_locator() {
        let locator = Config::default().locator().unwrap();
        assert_eq!(locator.board().name(), "D8");
    }

    #[test]
    fn test_custom_geometry_path() {
        let path = std::env::temp_dir().join(format!("tileboard_geometry_{}.yaml", std::process::id()));
        std::fs::write(&path, "name: broken\nangular_bounds: [5.0, -5.0]\nradial_bounds: [1.0, 2.0]\nangular_slot_count: 1\nrings: [{ radius: 1.5, tile_height: 0.5, short_width: 0.1, long_width: 0.2 }]\nchannel_table: [0]\n").unwrap();
        let mut config = Config::default();
        config.geometry_path = Some(path.clone());
        assert!(matches!(
            config.load_board(),
            Err(GeometryError::BadAngularBounds(_, _))
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
