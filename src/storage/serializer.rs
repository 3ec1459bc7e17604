//! Transparent encrypting serializer
//!
//! Wraps the raw JSON codec and applies the crypto core based on what the
//! file on disk looks like (for loads) and whether a session is unlocked
//! (for saves).
//!
//! The persisted shape is decided purely by session state at save time: with
//! a session the file becomes an [`EncryptedContainer`], without one it is
//! plain JSON. That is what lets encryption be switched on or off without a
//! migration step, and it also means a save racing a passphrase change can
//! write either shape. Only clear the session at session-end boundaries.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::crypto::{decrypt_with_key, encrypt_with_key, SecureString, UnlockedSession};
use crate::error::{PassVaultError, PassVaultResult};

use super::codec::JsonCodec;
use super::detector::{EncryptionState, FormatDetector};

/// On-disk wrapper for encrypted data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncryptedContainer {
    /// base64(nonce || ciphertext || tag)
    pub data: String,
    /// Application version that wrote the container
    pub version: String,
}

/// Serializer that encrypts when a session is unlocked
pub struct EncryptedSerializer {
    codec: JsonCodec,
    session: Mutex<Option<UnlockedSession>>,
    app_version: String,
}

impl EncryptedSerializer {
    pub fn new(codec: JsonCodec, app_version: impl Into<String>) -> Self {
        Self {
            codec,
            session: Mutex::new(None),
            app_version: app_version.into(),
        }
    }

    /// Load a dataset, decrypting with the current session if the file is a container
    pub fn load<T>(&self, path: &Path) -> PassVaultResult<T>
    where
        T: DeserializeOwned + Default,
    {
        self.load_inner(path, None)
            .map_err(|e| wrap_error("loading", path, e))
    }

    /// Trial load with a candidate session that is not installed
    pub fn load_with_session<T>(&self, path: &Path, session: &UnlockedSession) -> PassVaultResult<T>
    where
        T: DeserializeOwned + Default,
    {
        self.load_inner(path, Some(session))
            .map_err(|e| wrap_error("loading", path, e))
    }

    /// Save a dataset; encrypted if a session is unlocked, plaintext otherwise
    pub fn save<T: Serialize>(&self, data: &T, path: &Path) -> PassVaultResult<()> {
        self.save_inner(data, path)
            .map_err(|e| wrap_error("saving", path, e))
    }

    /// Derive and install a session for `passphrase`
    pub fn set_passphrase(&self, passphrase: &SecureString) -> PassVaultResult<()> {
        let session = UnlockedSession::unlock(passphrase)?;
        self.install_session(session)
    }

    /// Install an already derived session, replacing (and wiping) any previous one
    pub fn install_session(&self, session: UnlockedSession) -> PassVaultResult<()> {
        *self.lock_session()? = Some(session);
        tracing::info!("session unlocked");
        Ok(())
    }

    /// Drop the session; subsequent saves are plaintext
    pub fn clear_passphrase(&self) -> PassVaultResult<()> {
        let previous = self.lock_session()?.take();
        if previous.is_some() {
            tracing::info!("session cleared");
        }
        Ok(())
    }

    pub fn has_passphrase(&self) -> bool {
        self.lock_session().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Raw codec, for in-memory (never encrypted) operations
    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    fn load_inner<T>(&self, path: &Path, candidate: Option<&UnlockedSession>) -> PassVaultResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let storage = self.codec.storage();
        if !storage.exists(path) {
            tracing::debug!(path = %path.display(), "data file not found, starting empty");
            return Ok(T::default());
        }

        // One read per load; the format is classified from the same text
        let content = storage.read_text(path)?;

        match FormatDetector::classify(&content) {
            EncryptionState::NotEncrypted | EncryptionState::Unreadable => {
                self.codec.from_text(&content)
            }
            EncryptionState::Encrypted => {
                let container: EncryptedContainer = self.codec.from_text(&content)?;
                let plaintext = match candidate {
                    Some(session) => decrypt_with_key(&container.data, session.key())?,
                    None => {
                        let guard = self.lock_session()?;
                        let session = guard.as_ref().ok_or_else(no_session)?;
                        decrypt_with_key(&container.data, session.key())?
                    }
                };
                tracing::debug!(path = %path.display(), "decrypted data file");
                self.codec.from_text(&plaintext)
            }
        }
    }

    fn save_inner<T: Serialize>(&self, data: &T, path: &Path) -> PassVaultResult<()> {
        let container = {
            let guard = self.lock_session()?;
            match guard.as_ref() {
                None => None,
                Some(session) => {
                    let json = self.codec.to_text(data)?;
                    Some(EncryptedContainer {
                        data: encrypt_with_key(&json, session.key())?,
                        version: self.app_version.clone(),
                    })
                }
            }
        };

        match container {
            Some(container) => {
                self.codec.write_file(&container, path)?;
                tracing::debug!(path = %path.display(), "saved encrypted data file");
            }
            None => {
                self.codec.write_file(data, path)?;
                tracing::debug!(path = %path.display(), "saved plaintext data file");
            }
        }
        Ok(())
    }

    fn lock_session(&self) -> PassVaultResult<MutexGuard<'_, Option<UnlockedSession>>> {
        self.session
            .lock()
            .map_err(|e| PassVaultError::InvalidState(format!("Session lock poisoned: {}", e)))
    }
}

fn no_session() -> PassVaultError {
    PassVaultError::InvalidState("No passphrase available for encryption/decryption".to_string())
}

/// Crypto and session errors pass through; everything else becomes `Data`
fn wrap_error(action: &str, path: &Path, err: PassVaultError) -> PassVaultError {
    match err {
        e if e.is_crypto() => e,
        PassVaultError::Data(msg) => PassVaultError::Data(msg),
        other => PassVaultError::Data(format!(
            "Error {} {}: {}",
            action,
            path.display(),
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_io::LocalFileStorage;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Vault {
        entries: Vec<String>,
    }

    fn sample() -> Vault {
        Vault {
            entries: vec!["mail".into(), "bank".into()],
        }
    }

    fn serializer() -> EncryptedSerializer {
        EncryptedSerializer::new(JsonCodec::new(Arc::new(LocalFileStorage)), "2.2.0")
    }

    #[test]
    fn test_plaintext_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        let s = serializer();

        s.save(&sample(), &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"entries\""));

        let loaded: Vault = s.load(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_encrypted_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        let s = serializer();
        s.set_passphrase(&SecureString::new("hunter22")).unwrap();

        s.save(&sample(), &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("mail"));
        let container: EncryptedContainer = serde_json::from_str(&raw).unwrap();
        assert_eq!(container.version, "2.2.0");
        assert_eq!(FormatDetector::classify(&raw), EncryptionState::Encrypted);

        let loaded: Vault = s.load(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_missing_file_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Vault = serializer()
            .load(&temp_dir.path().join("missing.json"))
            .unwrap();
        assert_eq!(loaded, Vault::default());
    }

    #[test]
    fn test_encrypted_file_without_session_is_invalid_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        let s = serializer();
        s.set_passphrase(&SecureString::new("hunter22")).unwrap();
        s.save(&sample(), &path).unwrap();

        s.clear_passphrase().unwrap();
        assert!(!s.has_passphrase());
        let err = s.load::<Vault>(&path).unwrap_err();
        assert!(matches!(err, PassVaultError::InvalidState(_)));
    }

    #[test]
    fn test_wrong_session_is_authentication_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        let s = serializer();
        s.set_passphrase(&SecureString::new("right-one")).unwrap();
        s.save(&sample(), &path).unwrap();

        let wrong = UnlockedSession::unlock(&SecureString::new("wrong-one")).unwrap();
        let err = s.load_with_session::<Vault>(&path, &wrong).unwrap_err();
        assert!(err.is_authentication_failure());
        // the installed session is untouched
        assert_eq!(s.load::<Vault>(&path).unwrap(), sample());
    }

    #[test]
    fn test_short_container_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        let short = EncryptedContainer {
            data: STANDARD.encode([7u8; 20]),
            version: "2.2.0".into(),
        };
        std::fs::write(&path, serde_json::to_string(&short).unwrap()).unwrap();

        let s = serializer();
        s.set_passphrase(&SecureString::new("hunter22")).unwrap();
        let err = s.load::<Vault>(&path).unwrap_err();
        assert!(matches!(err, PassVaultError::MalformedCiphertext(_)));
    }

    #[test]
    fn test_corrupt_plaintext_is_data_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = serializer().load::<Vault>(&path).unwrap_err();
        assert!(matches!(err, PassVaultError::Data(_)));
    }

    #[test]
    fn test_clearing_session_switches_back_to_plaintext() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vault.json");
        let s = serializer();

        s.set_passphrase(&SecureString::new("hunter22")).unwrap();
        s.save(&sample(), &path).unwrap();
        let loaded: Vault = s.load(&path).unwrap();

        s.clear_passphrase().unwrap();
        s.save(&loaded, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(FormatDetector::classify(&raw), EncryptionState::NotEncrypted);
        assert_eq!(s.load::<Vault>(&path).unwrap(), sample());
    }
}
