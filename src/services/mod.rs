//! Service layer for PassVault
//!
//! The service layer provides workflows on top of the storage layer: unlocking
//! at startup, toggling encryption, and moving data in and out of the vault.

pub mod encryption;
pub mod import_export;
pub mod startup;

pub use encryption::{EncryptionService, EncryptionStatus, MIN_PASSPHRASE_LEN};
pub use import_export::{decrypt_file, default_export_file_name, ImportExportService, ImportSummary};
pub use startup::{AuthState, PassphrasePrompt, PromptResponse, StartupAuthenticator, StartupOutcome};
