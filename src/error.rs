//! Custom error types for PassVault
//!
//! This module defines the error hierarchy for the storage core using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for PassVault operations
#[derive(Error, Debug)]
pub enum PassVaultError {
    /// Rejected input, raised before any I/O or crypto work
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Ciphertext blob that cannot possibly hold nonce and tag
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// Tag verification failed. Wrong passphrase and tampering look the same.
    #[error("Decryption failed: invalid passphrase or corrupted data")]
    AuthenticationFailure,

    /// Operation requires state that is not present (e.g. no unlocked session)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Failure while loading or saving a dataset
    #[error("Data error: {0}")]
    Data(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Structural validation errors for datasets
    #[error("Validation error: {0}")]
    Validation(String),

    /// Cipher setup errors
    #[error("Encryption error: {0}")]
    Encryption(String),
}

impl PassVaultError {
    /// Errors produced by the crypto core or the session guard.
    ///
    /// The serializer passes these through unwrapped so callers can tell a
    /// wrong passphrase apart from a broken file.
    pub fn is_crypto(&self) -> bool {
        matches!(
            self,
            Self::Argument(_)
                | Self::MalformedCiphertext(_)
                | Self::AuthenticationFailure
                | Self::InvalidState(_)
                | Self::Encryption(_)
        )
    }

    /// Check if this is an authentication failure
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailure)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for PassVaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PassVaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for PassVault operations
pub type PassVaultResult<T> = Result<T, PassVaultError>;
