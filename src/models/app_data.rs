//! Root dataset persisted by PassVault
//!
//! `AppData` is everything the application stores in its data file. The
//! storage layer only sees it through the [`Dataset`] trait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::{Account, AccountGroup};
use crate::config::APP_VERSION;
use crate::error::{PassVaultError, PassVaultResult};
use crate::storage::Dataset;

/// User preferences stored alongside the credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub censor_account_data: bool,
    pub censor_password: bool,
    pub enable_local_search: bool,
    pub confirm_account_delete: bool,
    pub confirm_group_delete: bool,
    pub enable_trash: bool,
    pub enable_archive: bool,
    pub trash_retention_days: u32,
    pub show_favorites_group: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            censor_account_data: false,
            censor_password: true,
            enable_local_search: false,
            confirm_account_delete: true,
            confirm_group_delete: true,
            enable_trash: true,
            enable_archive: true,
            trash_retention_days: 30,
            show_favorites_group: true,
        }
    }
}

/// Theme selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSettings {
    pub current_theme: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            current_theme: "Light".to_string(),
        }
    }
}

/// The complete credential dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default)]
    pub groups: Vec<AccountGroup>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup: Option<DateTime<Utc>>,

    /// Application version that wrote the dataset
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub settings: AppSettings,

    #[serde(default)]
    pub theme: ThemeSettings,
}

fn default_version() -> String {
    APP_VERSION.to_string()
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            last_backup: None,
            version: default_version(),
            created_at: Utc::now(),
            settings: AppSettings::default(),
            theme: ThemeSettings::default(),
        }
    }
}

impl AppData {
    pub fn total_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn total_accounts(&self) -> usize {
        self.groups.iter().map(AccountGroup::account_count).sum()
    }

    pub fn total_favorites(&self) -> usize {
        self.groups.iter().map(AccountGroup::favorite_count).sum()
    }

    /// Find a group by name (case-insensitive)
    pub fn find_group(&self, name: &str) -> Option<&AccountGroup> {
        self.groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Accounts matching `query`, sorted by name. A blank query matches nothing.
    pub fn search_accounts(&self, query: &str) -> Vec<&Account> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let mut found: Vec<&Account> = self
            .groups
            .iter()
            .flat_map(|g| g.accounts.iter())
            .filter(|a| a.matches(query))
            .collect();
        found.sort_by_key(|a| a.name.to_lowercase());
        found
    }

    /// One-line summary, e.g. "2 groups, 5 accounts, 1 favorites"
    pub fn stats_text(&self) -> String {
        let base = format!(
            "{} groups, {} accounts",
            self.total_groups(),
            self.total_accounts()
        );
        match self.total_favorites() {
            0 => base,
            n => format!("{}, {} favorites", base, n),
        }
    }

    /// Record that a backup/export was just taken
    pub fn mark_backed_up(&mut self) {
        self.last_backup = Some(Utc::now());
    }
}

impl Dataset for AppData {
    fn validate(&mut self) -> PassVaultResult<()> {
        if self.version.trim().is_empty() {
            return Err(PassVaultError::Validation(
                "Version cannot be empty".to_string(),
            ));
        }

        self.groups.retain(AccountGroup::is_valid);
        for group in &mut self.groups {
            group.accounts.retain(Account::is_valid);
        }

        Ok(())
    }

    fn has_data(&self) -> bool {
        !self.groups.is_empty()
    }
}
