//! On-disk format detection
//!
//! Decides from the file's shape alone whether it holds a plaintext dataset
//! or an encrypted container. There is no separate "encryption enabled" flag;
//! the data file is the single source of truth.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use super::file_io::FileStorage;

/// What a data file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionState {
    /// Plaintext dataset, or no file at all
    NotEncrypted,
    /// An encrypted container with a non-empty payload
    Encrypted,
    /// The file exists but is not readable JSON
    Unreadable,
}

/// Classifies data files as plaintext or encrypted
#[derive(Clone)]
pub struct FormatDetector {
    storage: Arc<dyn FileStorage>,
}

impl FormatDetector {
    pub fn new(storage: Arc<dyn FileStorage>) -> Self {
        Self { storage }
    }

    /// Read `path` and classify it. A missing file is `NotEncrypted`.
    pub fn detect(&self, path: &Path) -> EncryptionState {
        if !self.storage.exists(path) {
            tracing::debug!(path = %path.display(), "no data file, treating as not encrypted");
            return EncryptionState::NotEncrypted;
        }

        match self.storage.read_text(path) {
            Ok(content) => {
                let state = Self::classify(&content);
                tracing::debug!(path = %path.display(), ?state, "detected data file format");
                state
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "data file is unreadable");
                EncryptionState::Unreadable
            }
        }
    }

    /// True only for a well-formed encrypted container
    pub fn is_encryption_enabled(&self, path: &Path) -> bool {
        self.detect(path) == EncryptionState::Encrypted
    }

    /// Classify already-read file content
    pub fn classify(content: &str) -> EncryptionState {
        if content.trim().is_empty() {
            return EncryptionState::NotEncrypted;
        }

        let root = match serde_json::from_str::<Value>(content) {
            Ok(root) => root,
            Err(_) => return EncryptionState::Unreadable,
        };

        let Value::Object(map) = root else {
            return EncryptionState::NotEncrypted;
        };

        let has_payload = map
            .get("data")
            .and_then(Value::as_str)
            .map_or(false, |data| !data.is_empty());

        if has_payload && map.contains_key("version") {
            EncryptionState::Encrypted
        } else {
            EncryptionState::NotEncrypted
        }
    }
}
