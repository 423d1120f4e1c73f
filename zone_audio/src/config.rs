//! Configuration for the audio zone subsystem

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Errors that can occur while reading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for [`crate::audio::AudioZoneSystem`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioZoneConfig {
    /// Bank manifest generated by the middleware
    pub manifest_path: PathBuf,
    /// Bank whose aux busses are listed as zone targets, loaded first
    pub init_bank_name: String,
    /// First id handed out to zones
    pub first_zone_id: u64,
    /// Load every catalogued bank right after the manifest is read
    pub load_banks_on_startup: bool,
}

impl Default for AudioZoneConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(
                "Assets/Audio/Wwise Project/GeneratedSoundBanks/Windows/SoundbanksInfo.json",
            ),
            init_bank_name: "Init".to_string(),
            first_zone_id: 1000,
            load_banks_on_startup: true,
        }
    }
}

impl AudioZoneConfig {
    /// Read a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        debug!(path = ?path, config = ?config, "Loaded audio zone config");
        Ok(config)
    }

    /// Check that the bank manifest exists
    pub fn validate(&self) -> Result<(), std::io::Error> {
        if !self.manifest_path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Bank manifest not found: {:?}", self.manifest_path),
            ));
        }
        Ok(())
    }
}
