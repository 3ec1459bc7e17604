//! Path management for PassVault
//!
//! Provides XDG-compliant resolution of the application directory.
//!
//! ## Path Resolution Order
//!
//! 1. `PASSVAULT_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/passvault` or `~/.config/passvault`
//! 3. Windows: `%APPDATA%\passvault`

use std::path::PathBuf;

use crate::error::PassVaultError;

/// Environment variable that overrides the application directory
pub const DATA_DIR_ENV: &str = "PASSVAULT_DATA_DIR";

/// Default name of the data file inside the application directory
pub const DATA_FILE_NAME: &str = "accounts.json";

/// Manages the fixed paths used by PassVault
#[derive(Debug, Clone)]
pub struct VaultPaths {
    /// Base directory for all PassVault files
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Create a new VaultPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, PassVaultError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create VaultPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/passvault/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Default location of the credential data file
    pub fn data_file(&self) -> PathBuf {
        self.base_dir.join(DATA_FILE_NAME)
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), PassVaultError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PassVaultError::Io(format!("Failed to create base directory: {}", e)))
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PassVaultError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("passvault"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| PassVaultError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("passvault"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PassVaultError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| PassVaultError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("passvault"))
}
