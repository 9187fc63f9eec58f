//! Level configuration
//!
//! Describes a playable level: which map file to load, the tile scale, the
//! player's start tile, and how many pickup items to scatter. Configs load
//! from and save to RON or JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::nav::Tile;

/// Settings for one playable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Display name of the level
    pub name: String,
    /// Path to the grid map file
    pub map: String,
    /// World-unit edge length of one tile
    pub tile_size: f32,
    /// Tile the player starts on
    pub player_start: Tile,
    /// Number of pickup items to scatter on walkable tiles
    pub item_count: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: String::from("Level"),
            map: String::from("assets/grid.txt"),
            tile_size: 0.5,
            player_start: Tile::new(0, 0),
            item_count: 5,
        }
    }
}

impl LevelConfig {
    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the map file path
    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = map.into();
        self
    }

    /// Set the tile scale
    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the player's start tile
    pub fn with_player_start(mut self, tile: Tile) -> Self {
        self.player_start = tile;
        self
    }

    /// Set the number of pickup items
    pub fn with_item_count(mut self, count: usize) -> Self {
        self.item_count = count;
        self
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| LevelError::Serialize(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| LevelError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let content = fs::read_to_string(path).map_err(|e| LevelError::Io(e.to_string()))?;
        let config: LevelConfig =
            ron::from_str(&content).map_err(|e| LevelError::Deserialize(e.to_string()))?;
        Ok(config)
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| LevelError::Serialize(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| LevelError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let content = fs::read_to_string(path).map_err(|e| LevelError::Io(e.to_string()))?;
        let config: LevelConfig =
            serde_json::from_str(&content).map_err(|e| LevelError::Deserialize(e.to_string()))?;
        Ok(config)
    }
}

/// Errors that can occur during level config operations
#[derive(Debug, Clone)]
pub enum LevelError {
    /// IO error
    Io(String),
    /// Serialization error
    Serialize(String),
    /// Deserialization error
    Deserialize(String),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
            Self::Deserialize(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for LevelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_game() {
        let config = LevelConfig::default();
        assert_eq!(config.map, "assets/grid.txt");
        assert_eq!(config.tile_size, 0.5);
        assert_eq!(config.player_start, Tile::new(0, 0));
        assert_eq!(config.item_count, 5);
    }

    #[test]
    fn test_builders_chain() {
        let config = LevelConfig::default()
            .with_name("Warehouse")
            .with_map("maps/warehouse.txt")
            .with_tile_size(1.0)
            .with_player_start(Tile::new(3, 4))
            .with_item_count(8);
        assert_eq!(config.name, "Warehouse");
        assert_eq!(config.map, "maps/warehouse.txt");
        assert_eq!(config.tile_size, 1.0);
        assert_eq!(config.player_start, Tile::new(3, 4));
        assert_eq!(config.item_count, 8);
    }

    #[test]
    fn test_config_round_trip_ron() {
        let config = LevelConfig::default()
            .with_name("Courtyard")
            .with_player_start(Tile::new(2, 7));

        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        assert!(ron_str.contains("Courtyard"));

        let loaded: LevelConfig = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_round_trip_json() {
        let config = LevelConfig::default().with_item_count(12);

        let json_str = serde_json::to_string(&config).unwrap();
        let loaded: LevelConfig = serde_json::from_str(&json_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = LevelConfig::load_ron("no/such/level.ron").unwrap_err();
        assert!(matches!(err, LevelError::Io(_)));
    }
}
