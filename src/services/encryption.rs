//! Encryption management service
//!
//! Switching encryption on or off is just a save under a different session
//! state: the serializer writes a container when a session is installed and
//! plain JSON when it is not.

use std::path::PathBuf;

use crate::crypto::{validate_passphrase, SecureString};
use crate::error::{PassVaultError, PassVaultResult};
use crate::models::AppData;
use crate::storage::{EncryptedContainer, EncryptionState, Vault};

/// Shortest passphrase accepted when setting a new one
pub const MIN_PASSPHRASE_LEN: usize = 6;

/// Snapshot of the store's encryption state
#[derive(Debug, Clone)]
pub struct EncryptionStatus {
    pub state: EncryptionState,
    pub session_unlocked: bool,
    pub data_path: PathBuf,
}

impl EncryptionStatus {
    pub fn is_enabled(&self) -> bool {
        self.state == EncryptionState::Encrypted
    }
}

/// Service for enabling, disabling and rotating encryption
pub struct EncryptionService<'a> {
    vault: &'a Vault,
}

impl<'a> EncryptionService<'a> {
    pub fn new(vault: &'a Vault) -> Self {
        Self { vault }
    }

    pub fn status(&self) -> EncryptionStatus {
        let data_path = self.vault.resolver().current_data_path();
        EncryptionStatus {
            state: self.vault.detector().detect(&data_path),
            session_unlocked: self.vault.serializer().has_passphrase(),
            data_path,
        }
    }

    /// Encrypt a plaintext store under `passphrase`
    pub fn enable(&self, passphrase: &SecureString) -> PassVaultResult<()> {
        if self.status().is_enabled() {
            return Err(PassVaultError::Validation(
                "Encryption is already enabled".to_string(),
            ));
        }
        validate_new_passphrase(passphrase)?;

        let data = self.vault.repository().try_get()?;
        self.vault.serializer().set_passphrase(passphrase)?;

        if let Err(e) = self.write(&data) {
            self.vault.serializer().clear_passphrase()?;
            return Err(e);
        }

        tracing::info!("encryption enabled");
        Ok(())
    }

    /// Decrypt the store and keep it as plain JSON from now on
    pub fn disable(&self, current: &SecureString) -> PassVaultResult<()> {
        self.require_enabled()?;
        let data = self.vault.repository().unlock(current)?;

        self.vault.serializer().clear_passphrase()?;
        if let Err(e) = self.write(&data) {
            self.vault.serializer().set_passphrase(current)?;
            return Err(e);
        }

        tracing::info!("encryption disabled");
        Ok(())
    }

    /// Re-encrypt the store under a new passphrase
    pub fn change_passphrase(
        &self,
        current: &SecureString,
        new: &SecureString,
    ) -> PassVaultResult<()> {
        self.require_enabled()?;
        validate_new_passphrase(new)?;
        let data = self.vault.repository().unlock(current)?;

        self.vault.serializer().set_passphrase(new)?;
        if let Err(e) = self.write(&data) {
            self.vault.serializer().set_passphrase(current)?;
            return Err(e);
        }

        tracing::info!("passphrase changed");
        Ok(())
    }

    /// Whether `passphrase` opens the store. Nothing is installed or cached.
    pub fn verify(&self, passphrase: &SecureString) -> PassVaultResult<bool> {
        self.require_enabled()?;
        let path = self.vault.resolver().current_data_path();
        let codec = self.vault.serializer().codec();
        let content = codec.storage().read_text(&path)?;
        let container: EncryptedContainer = codec.from_text(&content)?;
        Ok(validate_passphrase(&container.data, passphrase))
    }

    fn require_enabled(&self) -> PassVaultResult<()> {
        if self.status().is_enabled() {
            Ok(())
        } else {
            Err(PassVaultError::Validation(
                "Encryption is not enabled".to_string(),
            ))
        }
    }

    fn write(&self, data: &AppData) -> PassVaultResult<()> {
        if self.vault.repository().save(data) {
            Ok(())
        } else {
            Err(PassVaultError::Storage(
                "Failed to write the data file".to_string(),
            ))
        }
    }
}

/// Reject passphrases that are too short to set
pub fn validate_new_passphrase(passphrase: &SecureString) -> PassVaultResult<()> {
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(PassVaultError::Validation(format!(
            "Passphrase must be at least {} characters",
            MIN_PASSPHRASE_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VaultPaths;
    use crate::models::AccountGroup;
    use crate::notify::RecordingNotifier;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Vault) {
        let temp_dir = TempDir::new().unwrap();
        let vault = Vault::open(
            VaultPaths::with_base_dir(temp_dir.path().to_path_buf()),
            Arc::new(RecordingNotifier::new()),
        )
        .unwrap();
        let mut data = AppData::default();
        data.groups.push(AccountGroup::new("Work"));
        assert!(vault.repository().save(&data));
        (temp_dir, vault)
    }

    fn raw(vault: &Vault) -> String {
        std::fs::read_to_string(vault.repository().current_path()).unwrap()
    }

    #[test]
    fn test_enable_writes_container() {
        let (_temp_dir, vault) = setup();
        let service = EncryptionService::new(&vault);

        service.enable(&SecureString::new("secret1")).unwrap();

        assert!(service.status().is_enabled());
        assert!(service.status().session_unlocked);
        assert!(!raw(&vault).contains("Work"));
        assert!(service.verify(&SecureString::new("secret1")).unwrap());
        assert!(!service.verify(&SecureString::new("secret2")).unwrap());
    }

    #[test]
    fn test_enable_rejects_short_passphrase() {
        let (_temp_dir, vault) = setup();
        let service = EncryptionService::new(&vault);

        let err = service.enable(&SecureString::new("abc")).unwrap_err();
        assert!(err.is_validation());
        assert!(!service.status().is_enabled());
        assert!(!vault.serializer().has_passphrase());
    }

    #[test]
    fn test_enable_rejects_empty_but_accepts_whitespace() {
        let (_temp_dir, vault) = setup();
        let service = EncryptionService::new(&vault);

        let err = service.enable(&SecureString::new("")).unwrap_err();
        assert!(err.is_validation());
        assert!(!vault.serializer().has_passphrase());

        service.enable(&SecureString::new("      ")).unwrap();
        assert!(service.status().is_enabled());
        assert!(service.verify(&SecureString::new("      ")).unwrap());
        assert!(!service.verify(&SecureString::new("")).unwrap());
    }

    #[test]
    fn test_enable_twice_is_rejected() {
        let (_temp_dir, vault) = setup();
        let service = EncryptionService::new(&vault);
        service.enable(&SecureString::new("secret1")).unwrap();

        assert!(service.enable(&SecureString::new("secret2")).is_err());
    }

    #[test]
    fn test_disable_restores_plaintext() {
        let (_temp_dir, vault) = setup();
        let service = EncryptionService::new(&vault);
        service.enable(&SecureString::new("secret1")).unwrap();

        service.disable(&SecureString::new("secret1")).unwrap();

        assert_eq!(service.status().state, EncryptionState::NotEncrypted);
        assert!(!vault.serializer().has_passphrase());
        assert!(raw(&vault).contains("Work"));
    }

    #[test]
    fn test_disable_with_wrong_passphrase_changes_nothing() {
        let (_temp_dir, vault) = setup();
        let service = EncryptionService::new(&vault);
        service.enable(&SecureString::new("secret1")).unwrap();

        let err = service.disable(&SecureString::new("guess!")).unwrap_err();
        assert!(err.is_authentication_failure());
        assert!(service.status().is_enabled());
        assert!(vault.serializer().has_passphrase());
    }

    #[test]
    fn test_change_passphrase() {
        let (_temp_dir, vault) = setup();
        let service = EncryptionService::new(&vault);
        service.enable(&SecureString::new("secret1")).unwrap();

        service
            .change_passphrase(&SecureString::new("secret1"), &SecureString::new("better2"))
            .unwrap();

        assert!(service.verify(&SecureString::new("better2")).unwrap());
        assert!(!service.verify(&SecureString::new("secret1")).unwrap());
        vault.repository().invalidate_cache();
        assert_eq!(vault.repository().get().total_groups(), 1);
    }

    #[test]
    fn test_verify_requires_encryption() {
        let (_temp_dir, vault) = setup();
        let service = EncryptionService::new(&vault);
        assert!(service.verify(&SecureString::new("secret1")).is_err());
    }
}
