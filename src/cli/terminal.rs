//! Terminal adapters
//!
//! Passphrase prompts and user notifications for the command-line front end.

use std::cell::Cell;

use crate::crypto::SecureString;
use crate::error::{PassVaultError, PassVaultResult};
use crate::notify::{Level, Notifier};
use crate::services::encryption::validate_new_passphrase;
use crate::services::{PassphrasePrompt, PromptResponse};

/// Prompts on the controlling terminal with hidden input
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl PassphrasePrompt for TerminalPrompt {
    fn prompt(&self, attempt: u32, remaining: u32) -> PromptResponse {
        let message = if attempt == 1 {
            "Enter passphrase: ".to_string()
        } else {
            format!("Enter passphrase ({} attempt(s) left): ", remaining)
        };

        // No terminal or end of input counts as cancelling
        match rpassword::prompt_password(message) {
            Ok(input) => PromptResponse::Entered(SecureString::new(input)),
            Err(e) => {
                tracing::debug!(error = %e, "passphrase prompt closed");
                PromptResponse::Cancelled
            }
        }
    }
}

/// Answers the first prompt with a fixed passphrase, then cancels
///
/// Used for `--passphrase` and `PASSVAULT_PASSPHRASE`, where retrying the same
/// value would be pointless.
pub struct FixedPrompt {
    passphrase: Cell<Option<SecureString>>,
}

impl FixedPrompt {
    pub fn new(passphrase: SecureString) -> Self {
        Self {
            passphrase: Cell::new(Some(passphrase)),
        }
    }
}

impl PassphrasePrompt for FixedPrompt {
    fn prompt(&self, _attempt: u32, _remaining: u32) -> PromptResponse {
        match self.passphrase.take() {
            Some(p) => PromptResponse::Entered(p),
            None => PromptResponse::Cancelled,
        }
    }
}

/// Prints notifications to stderr
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Info => eprintln!("{}", message),
            Level::Warning => eprintln!("Warning: {}", message),
            Level::Error => eprintln!("Error: {}", message),
        }
    }
}

/// Prompt for a passphrase (hidden input)
pub fn prompt_passphrase(prompt: &str) -> PassVaultResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| PassVaultError::Io(format!("Failed to read passphrase: {}", e)))
}

/// Prompt for a new passphrase with confirmation
pub fn prompt_new_passphrase() -> PassVaultResult<SecureString> {
    loop {
        let first = prompt_passphrase("Enter new passphrase: ")?;

        if let Err(e) = validate_new_passphrase(&first) {
            println!("{} Please try again.", e);
            continue;
        }

        let second = prompt_passphrase("Confirm passphrase: ")?;

        if first != second {
            println!("Passphrases do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}

/// Use `given` if present, otherwise ask
pub fn passphrase_or_prompt(
    given: Option<&SecureString>,
    prompt: &str,
) -> PassVaultResult<SecureString> {
    match given {
        Some(p) => Ok(p.clone()),
        None => prompt_passphrase(prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_prompt_answers_once() {
        let prompt = FixedPrompt::new(SecureString::new("secret1"));

        match prompt.prompt(1, 3) {
            PromptResponse::Entered(p) => assert_eq!(p.as_str(), "secret1"),
            PromptResponse::Cancelled => panic!("expected a passphrase"),
        }
        assert!(matches!(prompt.prompt(2, 2), PromptResponse::Cancelled));
    }

    #[test]
    fn test_passphrase_or_prompt_prefers_given() {
        let given = SecureString::new("secret1");
        let p = passphrase_or_prompt(Some(&given), "unused: ").unwrap();
        assert_eq!(p, given);
    }
}
