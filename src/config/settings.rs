//! User settings for PassVault
//!
//! The settings store lives next to, not inside, the data file so the custom
//! data path can be read before the (possibly encrypted) dataset is opened.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::VaultPaths;
use crate::error::PassVaultError;

/// Persisted settings for PassVault
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// User-selected data file, overriding the default location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data_path: Option<PathBuf>,

    /// Passphrase attempts allowed at startup
    #[serde(default = "default_max_unlock_attempts")]
    pub max_unlock_attempts: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_max_unlock_attempts() -> u32 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            custom_data_path: None,
            max_unlock_attempts: default_max_unlock_attempts(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &VaultPaths) -> Result<Self, PassVaultError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                PassVaultError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PassVaultError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Like `load_or_create`, but an unreadable file yields the defaults
    ///
    /// The bad file is left on disk until the next `save` replaces it.
    pub fn load_or_default(paths: &VaultPaths) -> Self {
        Self::load_or_create(paths).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "settings unreadable, using defaults");
            Settings::default()
        })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultPaths) -> Result<(), PassVaultError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PassVaultError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            PassVaultError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
