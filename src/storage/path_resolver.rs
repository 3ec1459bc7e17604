//! Active data file resolution
//!
//! The data file normally lives in the application directory; the user may
//! point it somewhere else. The override is persisted in the settings store
//! and only honoured while its location stays writable. Falling back never
//! deletes or moves anything, so data written at an earlier override is left
//! where it is.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::config::{Settings, VaultPaths};
use crate::error::{PassVaultError, PassVaultResult};

use super::file_io::FileStorage;

/// Outcome of bootstrapping the override from settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResolution {
    /// No override configured
    Default(PathBuf),
    /// Override configured and usable
    Custom(PathBuf),
    /// Override configured but unusable; the default is in effect
    FellBack { requested: PathBuf, default: PathBuf },
}

/// Resolves where the dataset is read from and written to
pub struct PathResolver {
    storage: Arc<dyn FileStorage>,
    paths: VaultPaths,
    custom: RwLock<Option<PathBuf>>,
}

impl PathResolver {
    pub fn new(storage: Arc<dyn FileStorage>, paths: VaultPaths) -> Self {
        Self {
            storage,
            paths,
            custom: RwLock::new(None),
        }
    }

    /// Default data file, creating the application directory if needed
    pub fn default_data_path(&self) -> PathBuf {
        if let Err(e) = self.storage.create_dir(self.paths.base_dir()) {
            tracing::warn!(error = %e, "could not create application directory");
        }
        self.paths.data_file()
    }

    /// The override if set and still valid, else the default
    pub fn current_data_path(&self) -> PathBuf {
        match self.custom_data_path() {
            Some(custom) if self.storage.validate_path(&custom) => custom,
            Some(custom) => {
                tracing::warn!(
                    path = %custom.display(),
                    "custom data path is not writable, using default location"
                );
                self.default_data_path()
            }
            None => self.default_data_path(),
        }
    }

    pub fn custom_data_path(&self) -> Option<PathBuf> {
        self.custom.read().ok().and_then(|c| c.clone())
    }

    pub fn is_using_default_path(&self) -> bool {
        self.custom_data_path().is_none()
    }

    /// Validate, create the parent directory, then persist the override
    ///
    /// Returns `Ok(false)` when the path is rejected; the previous override
    /// stays in effect. An empty path clears the override.
    pub fn set_custom_data_path(&self, path: &Path) -> PassVaultResult<bool> {
        if path.as_os_str().is_empty() {
            self.reset_to_default()?;
            return Ok(true);
        }

        if !self.storage.validate_path(path) {
            tracing::warn!(path = %path.display(), "rejected custom data path");
            return Ok(false);
        }

        if let Some(dir) = path.parent() {
            self.storage.create_dir(dir)?;
        }

        self.persist(Some(path.to_path_buf()))?;
        self.set_in_memory(Some(path.to_path_buf()))?;
        tracing::info!(path = %path.display(), "custom data path set");
        Ok(true)
    }

    /// Forget the override and persist that choice
    pub fn reset_to_default(&self) -> PassVaultResult<()> {
        self.persist(None)?;
        self.set_in_memory(None)?;
        tracing::info!("data path reset to default");
        Ok(())
    }

    /// Bootstrap the override from the settings store
    ///
    /// An unreadable settings file counts as no override.
    pub fn load_custom_data_path(&self) -> PassVaultResult<PathResolution> {
        let settings = Settings::load_or_default(&self.paths);

        let Some(requested) = settings.custom_data_path.filter(|p| !p.as_os_str().is_empty())
        else {
            self.set_in_memory(None)?;
            return Ok(PathResolution::Default(self.default_data_path()));
        };

        if self.storage.validate_path(&requested) {
            self.set_in_memory(Some(requested.clone()))?;
            return Ok(PathResolution::Custom(requested));
        }

        // Keep the persisted override so it comes back once the location does
        tracing::warn!(
            path = %requested.display(),
            "custom data path unavailable, falling back to default"
        );
        self.set_in_memory(None)?;
        Ok(PathResolution::FellBack {
            requested,
            default: self.default_data_path(),
        })
    }

    /// Human-readable description of the active location
    pub fn display_path(&self) -> String {
        let current = self.current_data_path();
        if current == self.paths.data_file() {
            "Default (application directory)".to_string()
        } else {
            current.display().to_string()
        }
    }

    /// Directory containing the active data file
    pub fn data_directory(&self) -> PathBuf {
        self.current_data_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.paths.base_dir().clone())
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    fn persist(&self, custom: Option<PathBuf>) -> PassVaultResult<()> {
        let mut settings = Settings::load_or_default(&self.paths);
        settings.custom_data_path = custom;
        settings.save(&self.paths)
    }

    fn set_in_memory(&self, custom: Option<PathBuf>) -> PassVaultResult<()> {
        let mut guard = self
            .custom
            .write()
            .map_err(|e| PassVaultError::InvalidState(format!("Path lock poisoned: {}", e)))?;
        *guard = custom;
        Ok(())
    }
}
