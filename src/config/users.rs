//! Staff role configuration from environment variables.
//!
//! Administrators see every negotiation project; everyone else only sees the
//! projects they participate in. The admin roster is the comma-separated
//! `ADMIN_EMAILS` variable from the `.env` file.

use std::collections::HashSet;

/// Role of the person viewing the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Sees all projects
    Admin,
    /// Sees only projects they participate in
    Staff,
}

/// Parses a comma-separated list of emails into a lowercase set, skipping blanks.
#[must_use]
pub fn parse_admin_emails(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Gets the configured admin emails from `ADMIN_EMAILS`.
///
/// Returns an empty set when the variable is not set.
#[must_use]
pub fn get_admin_emails() -> HashSet<String> {
    std::env::var("ADMIN_EMAILS")
        .map(|raw| parse_admin_emails(&raw))
        .unwrap_or_default()
}

/// Resolves the role for `email` against an admin roster.
#[must_use]
pub fn role_for(email: &str, admins: &HashSet<String>) -> Role {
    if admins.contains(&email.trim().to_lowercase()) {
        Role::Admin
    } else {
        Role::Staff
    }
}

/// Resolves the role for `email`, treating `force_admin` as an explicit admin override.
#[must_use]
pub fn resolve_role(email: &str, force_admin: bool, admins: &HashSet<String>) -> Role {
    if force_admin {
        Role::Admin
    } else {
        role_for(email, admins)
    }
}
