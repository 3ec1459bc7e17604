//! Display formatting for terminal output
//!
//! Provides utilities for formatting the dataset for terminal display.

pub mod account;

pub use account::{format_account_list, format_group_list};
