//! File storage capability with atomic writes
//!
//! [`FileStorage`] is the seam between the storage core and the filesystem;
//! [`LocalFileStorage`] is the real implementation. Writes go to a temp file
//! which is then renamed over the target, so a crash never leaves a
//! half-written data file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{PassVaultError, PassVaultResult};

/// Text-file operations the storage core relies on
pub trait FileStorage: Send + Sync {
    /// Read a whole file as UTF-8 text. Missing files are an error.
    fn read_text(&self, path: &Path) -> PassVaultResult<String>;

    /// Replace a file's contents, creating parent directories as needed
    fn write_text(&self, path: &Path, content: &str) -> PassVaultResult<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Whether files can be created in `dir`
    fn is_writable(&self, dir: &Path) -> bool;

    fn create_dir(&self, dir: &Path) -> PassVaultResult<()>;

    /// Whether `path` could be used as a data file
    ///
    /// The parent directory must be writable, or, when it does not exist yet,
    /// its nearest existing ancestor must be.
    fn validate_path(&self, path: &Path) -> bool {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => return false,
        };
        if path.file_name().is_none() {
            return false;
        }
        parent
            .ancestors()
            .find(|dir| self.exists(dir))
            .map_or(false, |dir| self.is_writable(dir))
    }
}

/// [`FileStorage`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStorage;

impl FileStorage for LocalFileStorage {
    fn read_text(&self, path: &Path) -> PassVaultResult<String> {
        if !path.exists() {
            return Err(PassVaultError::Storage(format!(
                "File not found: {}",
                path.display()
            )));
        }

        fs::read_to_string(path).map_err(|e| {
            PassVaultError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })
    }

    fn write_text(&self, path: &Path, content: &str) -> PassVaultResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_dir(parent)?;
        }

        // Temp file in the same directory keeps the rename atomic
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        let file = File::create(&temp_path)
            .map_err(|e| PassVaultError::Storage(format!("Failed to create temp file: {}", e)))?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(content.as_bytes())
            .map_err(|e| PassVaultError::Storage(format!("Failed to write data: {}", e)))?;

        writer
            .flush()
            .map_err(|e| PassVaultError::Storage(format!("Failed to flush data: {}", e)))?;

        writer
            .get_ref()
            .sync_all()
            .map_err(|e| PassVaultError::Storage(format!("Failed to sync data: {}", e)))?;

        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            PassVaultError::Storage(format!("Failed to rename temp file: {}", e))
        })?;

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_writable(&self, dir: &Path) -> bool {
        if !dir.is_dir() {
            return false;
        }
        let marker = dir.join(format!(".passvault-write-test-{}", uuid::Uuid::new_v4()));
        match File::create(&marker) {
            Ok(_) => {
                let _ = fs::remove_file(&marker);
                true
            }
            Err(_) => false,
        }
    }

    fn create_dir(&self, dir: &Path) -> PassVaultResult<()> {
        fs::create_dir_all(dir).map_err(|e| {
            PassVaultError::Storage(format!(
                "Failed to create directory {}: {}",
                dir.display(),
                e
            ))
        })
    }
}
