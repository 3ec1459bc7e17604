//! Core data models for PassVault
//!
//! The credential dataset: groups of accounts plus user preferences.

pub mod account;
pub mod app_data;
pub mod ids;

pub use account::{Account, AccountGroup};
pub use app_data::{AppData, AppSettings, ThemeSettings};
pub use ids::{AccountId, GroupId};
