//! Import, export and standalone decryption
//!
//! Import and export go through the same serializer as normal saves, so an
//! export taken while a session is unlocked is itself encrypted.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::crypto::{decrypt, SecureString};
use crate::error::{PassVaultError, PassVaultResult};
use crate::storage::{EncryptedContainer, EncryptionState, FormatDetector, JsonCodec, Vault};

/// Counts of what an import brought in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub groups: usize,
    pub accounts: usize,
}

/// Service for moving the dataset in and out of the vault
pub struct ImportExportService<'a> {
    vault: &'a Vault,
}

impl<'a> ImportExportService<'a> {
    pub fn new(vault: &'a Vault) -> Self {
        Self { vault }
    }

    /// Replace the active dataset with the contents of `path`
    pub fn import_from(&self, path: &Path) -> PassVaultResult<ImportSummary> {
        if !path.exists() {
            return Err(PassVaultError::Validation(format!(
                "File not found: {}",
                path.display()
            )));
        }
        if self.vault.detector().detect(path) == EncryptionState::Encrypted
            && !self.vault.serializer().has_passphrase()
        {
            return Err(PassVaultError::InvalidState(
                "The file is encrypted; unlock an encrypted vault with the same passphrase first"
                    .to_string(),
            ));
        }

        let data = self.vault.repository().import(path)?;
        if !self.vault.repository().save(&data) {
            return Err(PassVaultError::Storage(
                "Imported data could not be saved".to_string(),
            ));
        }

        Ok(ImportSummary {
            groups: data.total_groups(),
            accounts: data.total_accounts(),
        })
    }

    /// Write the active dataset to `path`, or to a timestamped file in the
    /// current directory
    pub fn export_to(&self, path: Option<&Path>) -> PassVaultResult<PathBuf> {
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(default_export_file_name(Local::now())),
        };

        if self.vault.repository().export(&target) {
            let mut data = self.vault.repository().get();
            data.mark_backed_up();
            if !self.vault.repository().save(&data) {
                tracing::warn!("export written but backup time not recorded");
            }
            Ok(target)
        } else {
            Err(PassVaultError::Storage(format!(
                "Failed to export to {}",
                target.display()
            )))
        }
    }
}

/// `accounts_export_<yyyyMMdd_HHmmss>.json`
pub fn default_export_file_name(now: DateTime<Local>) -> String {
    format!("accounts_export_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Decrypt an encrypted data file into plain, indented JSON
///
/// Works on any container file without opening a vault. Returns the
/// plaintext; it is also written to `output` when given.
pub fn decrypt_file(
    codec: &JsonCodec,
    input: &Path,
    output: Option<&Path>,
    passphrase: &SecureString,
) -> PassVaultResult<String> {
    let content = codec.storage().read_text(input)?;
    if FormatDetector::classify(&content) != EncryptionState::Encrypted {
        return Err(PassVaultError::Validation(format!(
            "{} is not an encrypted data file",
            input.display()
        )));
    }

    let container: EncryptedContainer = codec.from_text(&content)?;
    let plaintext = decrypt(&container.data, passphrase)?;

    // Re-indent so the output matches what a plaintext save would write
    let value: serde_json::Value = codec.from_text(&plaintext)?;
    let pretty = codec.to_text(&value)?;

    if let Some(output) = output {
        codec.storage().write_text(output, &pretty)?;
        tracing::info!(input = %input.display(), output = %output.display(), "file decrypted");
    }
    Ok(pretty)
}
