//! Secure memory handling for sensitive data
//!
//! Provides types that zero their contents on drop so passphrases and key
//! material do not linger in memory.

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::PassVaultResult;

use super::key_derivation::{derive_key, DerivedKey};

/// A string type that zeros its contents on drop
///
/// Use this for passphrases and other sensitive string data.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    /// Create a new SecureString
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Get the string contents
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the length
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Deref for SecureString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<str> for SecureString {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

// Not constant-time. Only used to match a typed confirmation against the
// first entry; passphrases are checked by decrypting, never by comparison.
impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("len", &self.inner.len())
            .finish()
    }
}

// Don't print the contents in Display output
impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

/// Key material for an unlocked session
///
/// Created from a passphrase once per session; the passphrase itself is not
/// retained. Dropping the session wipes the key.
pub struct UnlockedSession {
    key: DerivedKey,
}

impl UnlockedSession {
    /// Derive the session key from a passphrase
    pub fn unlock(passphrase: &SecureString) -> PassVaultResult<Self> {
        let key = derive_key(passphrase.as_str())?;
        Ok(Self { key })
    }

    /// The derived key for this session
    pub fn key(&self) -> &DerivedKey {
        &self.key
    }
}

impl fmt::Debug for UnlockedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UnlockedSession([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::encryption::{decrypt, encrypt_with_key};

    #[test]
    fn test_secure_string_creation() {
        let s = SecureString::new("test");
        assert_eq!(s.as_str(), "test");
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_secure_string_from_str() {
        let s: SecureString = "test".into();
        assert_eq!(s.as_str(), "test");
    }

    #[test]
    fn test_secure_string_zeroize_clears() {
        let mut s = SecureString::new("secret");
        s.zeroize();
        assert!(s.is_empty());
    }

    #[test]
    fn test_secure_string_debug() {
        let s = SecureString::new("secret");
        let debug = format!("{:?}", s);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("SecureString"));
    }

    #[test]
    fn test_secure_string_display() {
        let s = SecureString::new("secret");
        let display = format!("{}", s);
        assert!(!display.contains("secret"));
        assert!(display.contains("REDACTED"));
    }

    #[test]
    fn test_session_key_interoperates_with_passphrase_api() {
        let session = UnlockedSession::unlock(&SecureString::new("hunter22")).unwrap();
        let blob = encrypt_with_key("payload", session.key()).unwrap();
        assert_eq!(decrypt(&blob, "hunter22").unwrap(), "payload");
    }

    #[test]
    fn test_session_rejects_empty_passphrase() {
        assert!(UnlockedSession::unlock(&SecureString::new("")).is_err());
    }

    #[test]
    fn test_session_debug_redacted() {
        let session = UnlockedSession::unlock(&SecureString::new("hunter22")).unwrap();
        assert_eq!(format!("{:?}", session), "UnlockedSession([REDACTED])");
    }
}
