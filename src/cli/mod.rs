//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod data;
pub mod encrypt;
pub mod path;
pub mod terminal;

pub use data::{handle_decrypt, handle_export, handle_import, handle_list, handle_status};
pub use encrypt::{handle_encrypt_command, EncryptCommands};
pub use path::{handle_path_command, PathCommands};
pub use terminal::{FixedPrompt, TerminalNotifier, TerminalPrompt};
