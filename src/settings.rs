//! Tuning settings
//!
//! Loaded from a JSON file so designers can tweak feel without rebuilding.
//! Every field is optional; anything missing falls back to the game defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{BlastConfig, PlaneConfig, TetherConfig};

/// All tunable values for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Leash tuning for skiers
    pub tether: TetherConfig,
    /// Leash tuning for mines
    pub mine_tether: TetherConfig,
    pub plane: PlaneConfig,
    pub blast: BlastConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tether: TetherConfig::default(),
            // Mines hang further back and swing less
            mine_tether: TetherConfig {
                length: 12.0,
                min_length: 10.0,
                max_length: 16.0,
                velocity_cap_x: 1.5,
                ..TetherConfig::default()
            },
            plane: PlaneConfig::default(),
            blast: BlastConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {e}");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Validate every section, normalising where possible
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            tether: self.tether.validate()?,
            mine_tether: self.mine_tether.validate()?,
            plane: self.plane.validate()?,
            blast: self.blast.validate()?,
        })
    }
}
