//! Encryption CLI commands
//!
//! Provides commands for enabling, disabling, and managing encryption.

use clap::Subcommand;

use crate::crypto::key_derivation::PBKDF2_ITERATIONS;
use crate::crypto::SecureString;
use crate::error::{PassVaultError, PassVaultResult};
use crate::services::EncryptionService;
use crate::storage::{EncryptionState, Vault};

use super::terminal::{passphrase_or_prompt, prompt_new_passphrase};

/// Encryption management commands
#[derive(Subcommand)]
pub enum EncryptCommands {
    /// Enable encryption for your data
    Enable {
        /// New passphrase (prompted with confirmation if omitted)
        #[arg(long, env = "PASSVAULT_NEW_PASSPHRASE", hide_env_values = true)]
        new_passphrase: Option<String>,
    },

    /// Disable encryption (requires current passphrase)
    Disable {
        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },

    /// Change your encryption passphrase
    #[command(alias = "change")]
    ChangePassphrase {
        /// New passphrase (prompted with confirmation if omitted)
        #[arg(long, env = "PASSVAULT_NEW_PASSPHRASE", hide_env_values = true)]
        new_passphrase: Option<String>,
    },

    /// Show encryption status
    Status,

    /// Verify your passphrase is correct
    Verify,
}

/// Handle encryption commands
///
/// `passphrase` is the current passphrase from `--passphrase`, if given.
pub fn handle_encrypt_command(
    vault: &Vault,
    passphrase: Option<&SecureString>,
    cmd: EncryptCommands,
) -> PassVaultResult<()> {
    let service = EncryptionService::new(vault);
    match cmd {
        EncryptCommands::Enable { new_passphrase } => enable_encryption(&service, new_passphrase),
        EncryptCommands::Disable { yes } => disable_encryption(&service, passphrase, yes),
        EncryptCommands::ChangePassphrase { new_passphrase } => {
            change_passphrase(&service, passphrase, new_passphrase)
        }
        EncryptCommands::Status => show_status(&service),
        EncryptCommands::Verify => verify_passphrase(&service, passphrase),
    }
}

fn enable_encryption(
    service: &EncryptionService<'_>,
    new_passphrase: Option<String>,
) -> PassVaultResult<()> {
    if service.status().is_enabled() {
        println!("Encryption is already enabled.");
        println!("Use 'passvault encrypt change-passphrase' to change your passphrase.");
        return Ok(());
    }

    println!("Enable Encryption");
    println!("=================");
    println!();
    println!("Your data file will be protected with AES-256-GCM encryption.");
    println!("You will need to enter your passphrase each time you use PassVault.");
    println!();
    println!("IMPORTANT: If you forget your passphrase, your data cannot be recovered!");
    println!();

    let passphrase = match new_passphrase {
        Some(p) => SecureString::new(p),
        None => prompt_new_passphrase()?,
    };

    println!("Deriving encryption key...");
    service.enable(&passphrase)?;

    println!();
    println!("Encryption enabled successfully!");
    println!("Remember to keep your passphrase safe - there is no recovery mechanism!");

    Ok(())
}

fn disable_encryption(
    service: &EncryptionService<'_>,
    passphrase: Option<&SecureString>,
    yes: bool,
) -> PassVaultResult<()> {
    if !service.status().is_enabled() {
        println!("Encryption is not enabled.");
        return Ok(());
    }

    println!("Disable Encryption");
    println!("==================");
    println!();

    let current = passphrase_or_prompt(passphrase, "Enter current passphrase: ")?;

    if !yes {
        print!("Are you sure you want to disable encryption? (yes/no): ");
        std::io::Write::flush(&mut std::io::stdout())?;

        let mut confirm = String::new();
        std::io::stdin().read_line(&mut confirm)?;

        if confirm.trim().to_lowercase() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    service.disable(&current)?;

    println!();
    println!("Encryption disabled successfully!");
    println!("Your data is now stored unencrypted.");

    Ok(())
}

fn change_passphrase(
    service: &EncryptionService<'_>,
    passphrase: Option<&SecureString>,
    new_passphrase: Option<String>,
) -> PassVaultResult<()> {
    if !service.status().is_enabled() {
        println!("Encryption is not enabled.");
        println!("Use 'passvault encrypt enable' to enable encryption first.");
        return Ok(());
    }

    println!("Change Passphrase");
    println!("=================");
    println!();

    let current = passphrase_or_prompt(passphrase, "Enter current passphrase: ")?;
    let new = match new_passphrase {
        Some(p) => SecureString::new(p),
        None => prompt_new_passphrase()?,
    };

    println!("Re-encrypting data...");
    service.change_passphrase(&current, &new)?;

    println!();
    println!("Passphrase changed successfully!");

    Ok(())
}

fn show_status(service: &EncryptionService<'_>) -> PassVaultResult<()> {
    let status = service.status();

    println!("Encryption Status");
    println!("=================");
    println!();

    match status.state {
        EncryptionState::Encrypted => {
            println!("Status: ENABLED");
            println!();
            println!("Cipher:         AES-256-GCM");
            println!("Key Derivation: PBKDF2-HMAC-SHA256, {} iterations", PBKDF2_ITERATIONS);
        }
        EncryptionState::NotEncrypted => {
            println!("Status: DISABLED");
            println!();
            println!("Your data is stored unencrypted.");
            println!("Run 'passvault encrypt enable' to enable encryption.");
        }
        EncryptionState::Unreadable => {
            println!("Status: UNKNOWN");
            println!();
            println!("The data file could not be read as JSON.");
        }
    }
    println!("Data file:      {}", status.data_path.display());

    Ok(())
}

fn verify_passphrase(
    service: &EncryptionService<'_>,
    passphrase: Option<&SecureString>,
) -> PassVaultResult<()> {
    if !service.status().is_enabled() {
        println!("Encryption is not enabled.");
        return Ok(());
    }

    let candidate = passphrase_or_prompt(passphrase, "Enter passphrase: ")?;

    if service.verify(&candidate)? {
        println!("Passphrase is correct!");
        Ok(())
    } else {
        println!("Passphrase is incorrect.");
        Err(PassVaultError::AuthenticationFailure)
    }
}
