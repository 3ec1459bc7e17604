//! Key derivation using PBKDF2-HMAC-SHA-256
//!
//! Derives AES-256 keys from user passphrases. The parameters are fixed so
//! files written by one build can be opened by any other.
//!
//! The salt is a single build-wide constant rather than a per-install value.
//! That is acceptable under a local-disk threat model only: two stores
//! protected by the same passphrase share a key.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{PassVaultError, PassVaultResult};

/// Application-wide PBKDF2 salt (16 bytes)
pub const APP_SALT: [u8; 16] = *b"PassVault2024_v1";

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derived key length in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// A derived encryption key, zeroed when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive an encryption key from a passphrase
pub fn derive_key(passphrase: &str) -> PassVaultResult<DerivedKey> {
    if passphrase.is_empty() {
        return Err(PassVaultError::Argument(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), &APP_SALT, PBKDF2_ITERATIONS, &mut key);

    let derived = DerivedKey { key };
    key.zeroize();
    Ok(derived)
}
