//! Account display formatting
//!
//! Formats groups and accounts for terminal output. Passwords are never
//! rendered, only whether one is stored.

use crate::models::{Account, AccountGroup, AppData};

/// Format every group with its accounts as a table
pub fn format_group_list(data: &AppData) -> String {
    if data.groups.is_empty() {
        return "No groups found.".to_string();
    }

    let mut groups: Vec<&AccountGroup> = data.groups.iter().collect();
    groups.sort_by_key(|g| g.position);

    let mut output = String::new();
    for group in groups {
        output.push_str(&format!(
            "{} ({} accounts)\n",
            group.name,
            group.account_count()
        ));
        let accounts: Vec<&Account> = group.accounts.iter().collect();
        if !accounts.is_empty() {
            output.push_str(&format_account_list(&accounts));
        }
        output.push('\n');
    }
    output.push_str(&data.stats_text());
    output.push('\n');
    output
}

/// Format a list of accounts as a table
pub fn format_account_list(accounts: &[&Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    // Calculate column widths
    let name_width = accounts
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let user_width = accounts
        .iter()
        .map(|a| a.username.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<name_width$}  {:<user_width$}  {:<8}  {}\n",
        "Name",
        "Username",
        "Password",
        "Status",
        name_width = name_width,
        user_width = user_width,
    ));

    output.push_str(&format!(
        "  {:-<name_width$}  {:-<user_width$}  {:-<8}  {:-<10}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
        user_width = user_width,
    ));

    for account in accounts {
        let status = if account.is_trashed {
            "Trashed"
        } else if account.is_archived {
            "Archived"
        } else if account.is_favorite {
            "Favorite"
        } else {
            ""
        };
        let password = if account.password.is_empty() {
            ""
        } else {
            "********"
        };

        output.push_str(&format!(
            "  {:<name_width$}  {:<user_width$}  {:<8}  {}\n",
            account.name,
            account.username,
            password,
            status,
            name_width = name_width,
            user_width = user_width,
        ));
    }

    output
}
