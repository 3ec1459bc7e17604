//! Storage layer for PassVault
//!
//! Provides JSON file storage with atomic writes, transparent at-rest
//! encryption, data path resolution and a cached repository on top.

pub mod codec;
pub mod detector;
pub mod file_io;
pub mod path_resolver;
pub mod repository;
pub mod serializer;

pub use codec::JsonCodec;
pub use detector::{EncryptionState, FormatDetector};
pub use file_io::{FileStorage, LocalFileStorage};
pub use path_resolver::{PathResolution, PathResolver};
pub use repository::{DataRepository, Dataset};
pub use serializer::{EncryptedContainer, EncryptedSerializer};

use std::sync::Arc;

use crate::config::{Settings, VaultPaths, APP_VERSION};
use crate::error::PassVaultResult;
use crate::models::AppData;
use crate::notify::Notifier;

/// Main storage coordinator wiring every storage component together
pub struct Vault {
    paths: VaultPaths,
    settings: Settings,
    resolution: PathResolution,
    notifier: Arc<dyn Notifier>,
    detector: FormatDetector,
    serializer: Arc<EncryptedSerializer>,
    resolver: Arc<PathResolver>,
    repository: DataRepository<AppData>,
}

impl Vault {
    /// Open the vault on the local filesystem
    pub fn open(paths: VaultPaths, notifier: Arc<dyn Notifier>) -> PassVaultResult<Self> {
        Self::with_storage(paths, Arc::new(LocalFileStorage), notifier)
    }

    /// Open the vault on an arbitrary storage backend
    pub fn with_storage(
        paths: VaultPaths,
        storage: Arc<dyn FileStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> PassVaultResult<Self> {
        paths.ensure_directories()?;
        let settings = match Settings::load_or_create(&paths) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "settings unreadable, using defaults");
                notifier.warning(&format!(
                    "Settings file could not be read ({}); using defaults",
                    e
                ));
                Settings::default()
            }
        };

        let resolver = Arc::new(PathResolver::new(storage.clone(), paths.clone()));
        let resolution = resolver.load_custom_data_path()?;
        if let PathResolution::FellBack { requested, .. } = &resolution {
            notifier.warning(&format!(
                "Custom data path {} is not available; using the default location",
                requested.display()
            ));
        }

        let serializer = Arc::new(EncryptedSerializer::new(
            JsonCodec::new(storage.clone()),
            APP_VERSION,
        ));
        let repository = DataRepository::new(serializer.clone(), resolver.clone(), notifier.clone());

        tracing::debug!(base_dir = %paths.base_dir().display(), "vault opened");

        Ok(Self {
            paths,
            settings,
            resolution,
            notifier,
            detector: FormatDetector::new(storage),
            serializer,
            resolver,
            repository,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// How the data path was resolved when the vault was opened
    pub fn resolution(&self) -> &PathResolution {
        &self.resolution
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn detector(&self) -> &FormatDetector {
        &self.detector
    }

    pub fn serializer(&self) -> &Arc<EncryptedSerializer> {
        &self.serializer
    }

    pub fn resolver(&self) -> &Arc<PathResolver> {
        &self.resolver
    }

    /// Cached access to the credential dataset
    pub fn repository(&self) -> &DataRepository<AppData> {
        &self.repository
    }

    /// Whether the active data file is an encrypted container
    pub fn is_encrypted(&self) -> bool {
        self.detector
            .is_encryption_enabled(&self.resolver.current_data_path())
    }
}
