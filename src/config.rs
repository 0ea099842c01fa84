//! Board Configuration
//!
//! Paths and the public URL base the embedding shell provides, persisted
//! as a JSON file next to the data it describes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the board keeps its data and how assets are addressed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Directory uploaded photos are written to
    pub assets_dir: PathBuf,
    /// URL prefix public asset URLs are derived from
    pub public_base_url: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("lost_and_found.db"),
            assets_dir: PathBuf::from("item_images"),
            public_base_url: "http://localhost:8080/item-images".to_string(),
        }
    }
}

impl BoardConfig {
    /// Read a configuration file written by `save`
    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;
        serde_json::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, raw).map_err(|e| format!("Failed to write config: {}", e))
    }
}
