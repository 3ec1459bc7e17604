//! Data path CLI commands
//!
//! Show, override or reset where the data file lives. Changing the location
//! never moves existing data.

use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{PassVaultError, PassVaultResult};
use crate::storage::Vault;

/// Data path subcommands
#[derive(Subcommand)]
pub enum PathCommands {
    /// Show the active data file location
    Show,
    /// Store the data file at a custom location
    Set {
        /// Path of the data file (e.g. ~/Dropbox/accounts.json)
        path: PathBuf,
    },
    /// Go back to the default location
    Reset,
}

/// Handle data path commands
pub fn handle_path_command(vault: &Vault, cmd: PathCommands) -> PassVaultResult<()> {
    let resolver = vault.resolver();

    match cmd {
        PathCommands::Show => {
            println!("Data file:  {}", resolver.current_data_path().display());
            println!("Location:   {}", resolver.display_path());
            println!("Directory:  {}", resolver.data_directory().display());
            if let Some(custom) = resolver.custom_data_path() {
                println!("Custom:     {}", custom.display());
            }
            println!("Settings:   {}", vault.paths().settings_file().display());
        }
        PathCommands::Set { path } => {
            let path = if path.is_relative() {
                std::env::current_dir()?.join(path)
            } else {
                path
            };

            if !resolver.set_custom_data_path(&path)? {
                return Err(PassVaultError::Validation(format!(
                    "Cannot store data at {}: location is not writable",
                    path.display()
                )));
            }
            println!("Data path set to: {}", path.display());
            println!("Existing data was not moved; use 'passvault import' to bring it over.");
        }
        PathCommands::Reset => {
            resolver.reset_to_default()?;
            println!(
                "Data path reset to default: {}",
                resolver.current_data_path().display()
            );
        }
    }

    Ok(())
}
