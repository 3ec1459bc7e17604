//! Raw JSON codec
//!
//! Typed (de)serialization to and from text, plus a file-writing helper on
//! top of a [`FileStorage`]. Output is pretty-printed; field casing comes from
//! the serde attributes on the types themselves.

use std::path::Path;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{PassVaultError, PassVaultResult};

use super::file_io::FileStorage;

/// JSON codec bound to a storage backend
#[derive(Clone)]
pub struct JsonCodec {
    storage: Arc<dyn FileStorage>,
}

impl JsonCodec {
    pub fn new(storage: Arc<dyn FileStorage>) -> Self {
        Self { storage }
    }

    /// The storage backend this codec writes through
    pub fn storage(&self) -> &Arc<dyn FileStorage> {
        &self.storage
    }

    /// Parse text; blank text yields `T::default()`
    pub fn from_text<T>(&self, content: &str) -> PassVaultResult<T>
    where
        T: DeserializeOwned + Default,
    {
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(content)
            .map_err(|e| PassVaultError::Json(format!("Invalid JSON content: {}", e)))
    }

    /// Serialize to indented text
    pub fn to_text<T: Serialize>(&self, data: &T) -> PassVaultResult<String> {
        serde_json::to_string_pretty(data)
            .map_err(|e| PassVaultError::Json(format!("Error serializing data: {}", e)))
    }

    /// Serialize and write to `path`
    pub fn write_file<T: Serialize>(&self, data: &T, path: &Path) -> PassVaultResult<()> {
        let text = self.to_text(data)?;
        self.storage.write_text(path, &text)?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "wrote JSON file");
        Ok(())
    }
}
