use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use passvault::cli::{
    handle_decrypt, handle_encrypt_command, handle_export, handle_import, handle_list,
    handle_path_command, handle_status, EncryptCommands, FixedPrompt, PathCommands,
    TerminalNotifier, TerminalPrompt,
};
use passvault::config::VaultPaths;
use passvault::crypto::SecureString;
use passvault::services::{PassphrasePrompt, StartupAuthenticator, StartupOutcome};
use passvault::storage::Vault;

/// Environment variable holding the log filter
const LOG_ENV: &str = "PASSVAULT_LOG";

#[derive(Parser)]
#[command(
    name = "passvault",
    author = "Avanty.Works",
    version,
    about = "Local credential store with passphrase-based encryption",
    long_about = "PassVault keeps your accounts in a single local JSON file, \
                  optionally encrypted with AES-256-GCM under a passphrase."
)]
struct Cli {
    /// Application directory (overrides PASSVAULT_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Passphrase for an encrypted store
    #[arg(
        long,
        global = true,
        env = "PASSVAULT_PASSPHRASE",
        hide_env_values = true
    )]
    passphrase: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show paths, encryption state and contents
    Status,

    /// List groups and accounts, or search accounts
    #[command(alias = "ls")]
    List {
        /// Search text matched against names, usernames, emails and websites
        query: Option<String>,
    },

    /// Encryption management commands
    #[command(subcommand)]
    Encrypt(EncryptCommands),

    /// Data file location commands
    #[command(subcommand)]
    Path(PathCommands),

    /// Replace the current data with a file's contents
    Import {
        /// File to import (plain or encrypted)
        file: PathBuf,
    },

    /// Write the current data to a file
    Export {
        /// Output file (default: accounts_export_<timestamp>.json)
        file: Option<PathBuf>,
    },

    /// Decrypt an encrypted data file to plain JSON
    Decrypt {
        /// Encrypted data file
        file: PathBuf,
        /// Where to write the plaintext (printed if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// Commands that read the dataset need it unlocked first
    fn needs_unlock(&self) -> bool {
        matches!(
            self,
            Commands::Status | Commands::List { .. } | Commands::Import { .. } | Commands::Export { .. }
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let passphrase = cli.passphrase.map(SecureString::new);
    // The standalone decryptor never opens the vault
    let command = match cli.command.unwrap_or(Commands::Status) {
        Commands::Decrypt { file, output } => {
            handle_decrypt(&file, output, passphrase.as_ref())?;
            return Ok(());
        }
        other => other,
    };

    let paths = match cli.data_dir {
        Some(dir) => VaultPaths::with_base_dir(dir),
        None => VaultPaths::new()?,
    };
    let vault = Vault::open(paths, Arc::new(TerminalNotifier))?;

    if command.needs_unlock() {
        let prompt: Box<dyn PassphrasePrompt> = match &passphrase {
            Some(p) => Box::new(FixedPrompt::new(p.clone())),
            None => Box::new(TerminalPrompt),
        };
        let mut auth = StartupAuthenticator::new(&vault, prompt.as_ref());
        if auth.initialize() == StartupOutcome::Denied {
            eprintln!("Access denied: the data file could not be unlocked.");
            std::process::exit(1);
        }
    }

    match command {
        Commands::Status => handle_status(&vault)?,
        Commands::List { query } => handle_list(&vault, query)?,
        Commands::Encrypt(cmd) => handle_encrypt_command(&vault, passphrase.as_ref(), cmd)?,
        Commands::Path(cmd) => handle_path_command(&vault, cmd)?,
        Commands::Import { file } => handle_import(&vault, &file)?,
        Commands::Export { file } => handle_export(&vault, file)?,
        Commands::Decrypt { .. } => unreachable!("handled before the vault is opened"),
    }

    Ok(())
}
