//! Dataset CLI commands
//!
//! Status, listing, import/export and the standalone decryptor.

use std::path::{Path, PathBuf};

use crate::config::{APP_NAME, APP_VERSION};
use crate::crypto::SecureString;
use crate::display::{format_account_list, format_group_list};
use crate::error::PassVaultResult;
use crate::services::{decrypt_file, ImportExportService};
use crate::storage::{EncryptionState, JsonCodec, LocalFileStorage, Vault};

use super::terminal::passphrase_or_prompt;

/// Show paths, encryption state and dataset stats
pub fn handle_status(vault: &Vault) -> PassVaultResult<()> {
    let data = vault.repository().get();
    let path = vault.resolver().current_data_path();

    println!("{} {}", APP_NAME, APP_VERSION);
    println!();
    println!("Data file:   {}", path.display());
    println!("Location:    {}", vault.resolver().display_path());
    println!("Settings:    {}", vault.paths().settings_file().display());
    let encryption = match vault.detector().detect(&path) {
        EncryptionState::Encrypted => "Enabled",
        EncryptionState::NotEncrypted => "Disabled",
        EncryptionState::Unreadable => "Unknown (unreadable file)",
    };
    println!("Encryption:  {}", encryption);
    println!("Contents:    {}", data.stats_text());
    match data.last_backup {
        Some(at) => println!("Last backup: {}", at.format("%Y-%m-%d %H:%M")),
        None => println!("Last backup: never"),
    }

    Ok(())
}

/// List all groups, or the accounts matching `query`
pub fn handle_list(vault: &Vault, query: Option<String>) -> PassVaultResult<()> {
    let data = vault.repository().get();

    match query {
        Some(q) => print!("{}", format_account_list(&data.search_accounts(&q))),
        None => print!("{}", format_group_list(&data)),
    }
    println!();

    Ok(())
}

/// Replace the active dataset with a file's contents
pub fn handle_import(vault: &Vault, file: &Path) -> PassVaultResult<()> {
    let summary = ImportExportService::new(vault).import_from(file)?;
    println!(
        "Imported {} groups and {} accounts from {}",
        summary.groups,
        summary.accounts,
        file.display()
    );
    Ok(())
}

/// Write the active dataset to a file
pub fn handle_export(vault: &Vault, file: Option<PathBuf>) -> PassVaultResult<()> {
    let written = ImportExportService::new(vault).export_to(file.as_deref())?;
    let encrypted = vault.serializer().has_passphrase();
    println!(
        "Exported {} to {}",
        if encrypted { "encrypted data" } else { "data" },
        written.display()
    );
    Ok(())
}

/// Decrypt a data file without opening the vault
pub fn handle_decrypt(
    file: &Path,
    output: Option<PathBuf>,
    passphrase: Option<&SecureString>,
) -> PassVaultResult<()> {
    let passphrase = passphrase_or_prompt(passphrase, "Enter passphrase: ")?;
    let codec = JsonCodec::new(std::sync::Arc::new(LocalFileStorage));
    let plaintext = decrypt_file(&codec, file, output.as_deref(), &passphrase)?;

    match output {
        Some(out) => println!("Decrypted {} to {}", file.display(), out.display()),
        None => println!("{}", plaintext),
    }
    Ok(())
}
