//! PassVault - local credential store with at-rest encryption
//!
//! This library provides the storage core of PassVault: a single JSON data
//! file that is transparently encrypted with AES-256-GCM whenever a session
//! passphrase is unlocked, and read back as plain JSON otherwise.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `crypto`: Key derivation, AEAD encryption and secret handling
//! - `error`: Custom error types
//! - `models`: The credential dataset (groups, accounts, preferences)
//! - `notify`: User-facing notification sink
//! - `storage`: File storage, format detection, encrypting serializer,
//!   path resolution and the cached repository
//! - `services`: Startup authentication, encryption management, import/export
//! - `cli`: Command handlers for the `passvault` binary
//! - `display`: Terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use passvault::config::VaultPaths;
//! use passvault::notify::LogNotifier;
//! use passvault::storage::Vault;
//!
//! let vault = Vault::open(VaultPaths::new()?, Arc::new(LogNotifier))?;
//! let data = vault.repository().get();
//! println!("{}", data.stats_text());
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod notify;
pub mod services;
pub mod storage;

pub use error::{PassVaultError, PassVaultResult};
