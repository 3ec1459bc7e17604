//! AES-256-GCM encryption/decryption
//!
//! Produces self-contained base64 blobs laid out as
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! Each encryption operation generates a unique nonce.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{PassVaultError, PassVaultResult};

use super::key_derivation::{derive_key, DerivedKey};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Smallest decoded blob that can be valid
pub const MIN_BLOB_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Encrypt a string with a passphrase
///
/// The key is derived for this call only and wiped when it goes out of scope.
pub fn encrypt(plaintext: &str, passphrase: &str) -> PassVaultResult<String> {
    if plaintext.is_empty() {
        return Err(PassVaultError::Argument(
            "Data cannot be empty".to_string(),
        ));
    }
    let key = derive_key(passphrase)?;
    encrypt_with_key(plaintext, &key)
}

/// Decrypt a blob produced by [`encrypt`]
pub fn decrypt(blob: &str, passphrase: &str) -> PassVaultResult<String> {
    if blob.is_empty() {
        return Err(PassVaultError::Argument(
            "Encrypted data cannot be empty".to_string(),
        ));
    }
    let key = derive_key(passphrase)?;
    decrypt_with_key(blob, &key)
}

/// Trial-decrypt `payload`; true when the passphrase opens it
pub fn validate_passphrase(payload: &str, passphrase: &str) -> bool {
    decrypt(payload, passphrase).is_ok()
}

/// Encrypt with an already derived key
pub fn encrypt_with_key(plaintext: &str, key: &DerivedKey) -> PassVaultResult<String> {
    if plaintext.is_empty() {
        return Err(PassVaultError::Argument(
            "Data cannot be empty".to_string(),
        ));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| PassVaultError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    // aes-gcm appends the tag to the ciphertext
    let sealed = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| PassVaultError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut blob = Vec::with_capacity(NONCE_SIZE + sealed.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&sealed);

    Ok(STANDARD.encode(blob))
}

/// Decrypt with an already derived key
pub fn decrypt_with_key(blob: &str, key: &DerivedKey) -> PassVaultResult<String> {
    let bytes = STANDARD.decode(blob.trim()).map_err(|e| {
        PassVaultError::MalformedCiphertext(format!("Invalid base64 encoding: {}", e))
    })?;

    if bytes.len() < MIN_BLOB_SIZE {
        return Err(PassVaultError::MalformedCiphertext(format!(
            "Expected at least {} bytes, got {}",
            MIN_BLOB_SIZE,
            bytes.len()
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| PassVaultError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let (nonce_bytes, sealed) = bytes.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, sealed)
        .map_err(|_| PassVaultError::AuthenticationFailure)?;

    String::from_utf8(plaintext)
        .map_err(|e| PassVaultError::Data(format!("Invalid UTF-8 in decrypted data: {}", e)))
}
