//! Account and group models
//!
//! An account is one stored credential; groups organise accounts in the
//! sidebar and carry their own presentation hints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AccountId, GroupId};

/// A stored credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Display name (required)
    pub name: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub website: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default)]
    pub is_archived: bool,

    #[serde(default)]
    pub is_trashed: bool,

    /// When the account was created
    pub created_date: DateTime<Utc>,

    /// When the account was last modified
    pub last_modified: DateTime<Utc>,
}

impl Account {
    /// Create a new account
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            name: name.into(),
            username: username.into(),
            password: password.into(),
            email: String::new(),
            website: String::new(),
            notes: String::new(),
            is_favorite: false,
            is_archived: false,
            is_trashed: false,
            created_date: now,
            last_modified: now,
        }
    }

    /// An account is valid if it has a non-blank name
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Neither archived nor trashed
    pub fn is_active(&self) -> bool {
        !self.is_archived && !self.is_trashed
    }

    /// Case-insensitive match against name, username, email and website
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.name, &self.username, &self.email, &self.website]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// A named collection of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountGroup {
    /// Unique identifier
    pub id: GroupId,

    /// Group name (required)
    pub name: String,

    #[serde(default = "default_icon")]
    pub icon: String,

    #[serde(default)]
    pub color_variant: String,

    /// Sort position in the sidebar
    #[serde(default)]
    pub position: u32,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub accounts: Vec<Account>,

    pub created_at: DateTime<Utc>,

    pub last_modified: DateTime<Utc>,
}

fn default_icon() -> String {
    "Folder".to_string()
}

impl AccountGroup {
    /// Create a new, empty group
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::new(),
            name: name.into(),
            icon: default_icon(),
            color_variant: String::new(),
            position: 0,
            is_default: false,
            accounts: Vec::new(),
            created_at: now,
            last_modified: now,
        }
    }

    /// A group is valid if it has a non-blank name
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Add an account and bump the modification time
    pub fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
        self.last_modified = Utc::now();
    }

    /// Number of accounts in this group
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of favourite accounts in this group
    pub fn favorite_count(&self) -> usize {
        self.accounts.iter().filter(|a| a.is_favorite).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_invalid() {
        assert!(!Account::new("  ", "user", "pw").is_valid());
        assert!(Account::new("Mail", "user", "pw").is_valid());
        assert!(!AccountGroup::new("").is_valid());
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let mut account = Account::new("GitHub", "octocat", "pw");
        account.website = "https://github.com".into();
        assert!(account.matches("GITHUB"));
        assert!(account.matches("octo"));
        assert!(!account.matches("gitlab"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let account = Account::new("Mail", "user", "pw");
        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("\"isFavorite\""));
        assert!(json.contains("\"lastModified\""));
    }

    #[test]
    fn test_group_counts() {
        let mut group = AccountGroup::new("Work");
        let mut fav = Account::new("VPN", "me", "pw");
        fav.is_favorite = true;
        group.add_account(fav);
        group.add_account(Account::new("Wiki", "me", "pw"));
        assert_eq!(group.account_count(), 2);
        assert_eq!(group.favorite_count(), 1);
    }
}
