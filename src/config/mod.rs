//! Configuration module for PassVault
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence (custom data path, unlock policy)
//! - Application constants

pub mod paths;
pub mod settings;

pub use paths::VaultPaths;
pub use settings::Settings;

/// Display name of the application
pub const APP_NAME: &str = "PassVault";

/// Version written into encrypted containers and new datasets
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
