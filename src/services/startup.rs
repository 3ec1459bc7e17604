//! Startup authentication
//!
//! Runs once at process start, before the dataset is used. A plaintext store
//! is ready immediately; an encrypted one needs a passphrase within a bounded
//! number of attempts.

use crate::crypto::SecureString;
use crate::storage::{EncryptionState, Vault};

/// What the user answered at a passphrase prompt
pub enum PromptResponse {
    Entered(SecureString),
    Cancelled,
}

/// Source of passphrases during startup
pub trait PassphrasePrompt {
    /// Ask for a passphrase. `attempt` starts at 1.
    fn prompt(&self, attempt: u32, remaining: u32) -> PromptResponse;
}

/// Where the authenticator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unknown,
    CheckingEncryption,
    AwaitingPassphrase,
    ValidatingPassphrase,
    Ready,
    Denied,
}

/// Terminal result of [`StartupAuthenticator::initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    Ready { encrypted: bool },
    Denied,
}

impl StartupOutcome {
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }
}

/// Unlocks an encrypted store at startup
pub struct StartupAuthenticator<'a> {
    vault: &'a Vault,
    prompt: &'a dyn PassphrasePrompt,
    max_attempts: u32,
    state: AuthState,
}

impl<'a> StartupAuthenticator<'a> {
    /// Attempts default to the vault settings
    pub fn new(vault: &'a Vault, prompt: &'a dyn PassphrasePrompt) -> Self {
        Self {
            max_attempts: vault.settings().max_unlock_attempts.max(1),
            vault,
            prompt,
            state: AuthState::Unknown,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Check the data file and, if it is encrypted, unlock it
    ///
    /// On `Ready { encrypted: true }` the session is installed and the
    /// repository cache already holds the dataset.
    pub fn initialize(&mut self) -> StartupOutcome {
        self.state = AuthState::CheckingEncryption;
        let path = self.vault.resolver().current_data_path();

        match self.vault.detector().detect(&path) {
            EncryptionState::NotEncrypted => return self.ready(false),
            EncryptionState::Unreadable => {
                self.vault.notifier().warning(&format!(
                    "Data file {} could not be read; continuing without encryption",
                    path.display()
                ));
                return self.ready(false);
            }
            EncryptionState::Encrypted => {}
        }

        let mut remaining = self.max_attempts;
        let mut attempt = 1;

        while remaining > 0 {
            self.state = AuthState::AwaitingPassphrase;
            let passphrase = match self.prompt.prompt(attempt, remaining) {
                PromptResponse::Cancelled => {
                    tracing::info!(attempt, "passphrase entry cancelled");
                    return self.deny();
                }
                PromptResponse::Entered(p) if p.is_empty() => continue,
                PromptResponse::Entered(p) => p,
            };

            self.state = AuthState::ValidatingPassphrase;
            match self.vault.repository().unlock(&passphrase) {
                Ok(_) => {
                    tracing::info!(attempt, "data unlocked");
                    return self.ready(true);
                }
                Err(e) => {
                    remaining -= 1;
                    attempt += 1;
                    tracing::warn!(error = %e, remaining, "unlock attempt failed");
                    let reason = if e.is_authentication_failure() {
                        "Incorrect passphrase".to_string()
                    } else {
                        format!("Could not unlock data: {}", e)
                    };
                    if remaining > 0 {
                        self.vault.notifier().warning(&format!(
                            "{}. {} attempt(s) remaining.",
                            reason, remaining
                        ));
                    } else {
                        self.vault.notifier().error(&format!(
                            "{}. Maximum attempts reached.",
                            reason
                        ));
                    }
                }
            }
        }

        self.deny()
    }

    fn ready(&mut self, encrypted: bool) -> StartupOutcome {
        self.state = AuthState::Ready;
        StartupOutcome::Ready { encrypted }
    }

    fn deny(&mut self) -> StartupOutcome {
        if let Err(e) = self.vault.serializer().clear_passphrase() {
            tracing::error!(error = %e, "failed to clear session");
        }
        self.vault.repository().invalidate_cache();
        self.state = AuthState::Denied;
        StartupOutcome::Denied
    }
}
