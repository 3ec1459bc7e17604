//! Cryptographic functions for PassVault
//!
//! Provides AES-256-GCM encryption with PBKDF2-HMAC-SHA-256 key derivation
//! for at-rest protection of the credential store.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{
    decrypt, decrypt_with_key, encrypt, encrypt_with_key, validate_passphrase, MIN_BLOB_SIZE,
};
pub use key_derivation::{derive_key, DerivedKey};
pub use secure_memory::{SecureString, UnlockedSession};
