//! Business policy loading from config.toml
//!
//! The payment cadence and the staleness window used for notifications are
//! business policy. They default to the current contract template (8 payments,
//! one every 6 days, 12 videos per payment; projects go stale after 48 hours)
//! and can be overridden per deployment in `config.toml`:
//!
//! ```toml
//! [payment]
//! payments_expected = 8
//! videos_per_payment = 12
//! cycle_days = 6
//!
//! [attention]
//! stale_after_hours = 48
//! terminal_statuses = ["completed", "dropped-by-us", "rejected-by-creator", "published"]
//! ```

use crate::{
    entities::ProjectStatus,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Payment cadence for a creator contract
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaymentPolicy {
    /// Number of payments a contract is split into (default 8)
    pub payments_expected: u32,
    /// Videos required per payment; payment `k` needs `k * videos_per_payment` (default 12)
    pub videos_per_payment: u32,
    /// Days between a payment (or the contract start) and the next due date (default 6)
    pub cycle_days: u32,
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        Self {
            payments_expected: 8,
            videos_per_payment: 12,
            cycle_days: 6,
        }
    }
}

/// When a negotiation project is considered stale
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AttentionPolicy {
    /// Hours without an update before an active project needs attention (default 48)
    pub stale_after_hours: i64,
    /// Statuses that never go stale
    pub terminal_statuses: Vec<ProjectStatus>,
}

impl AttentionPolicy {
    /// Whether projects in `status` are exempt from staleness checks
    #[must_use]
    pub fn is_terminal(&self, status: ProjectStatus) -> bool {
        self.terminal_statuses.contains(&status)
    }
}

impl Default for AttentionPolicy {
    fn default() -> Self {
        Self {
            stale_after_hours: 48,
            terminal_statuses: vec![
                ProjectStatus::Completed,
                ProjectStatus::DroppedByUs,
                ProjectStatus::RejectedByCreator,
                ProjectStatus::Published,
            ],
        }
    }
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Payment cadence
    pub payment: PaymentPolicy,
    /// Staleness window for negotiation projects
    pub attention: AttentionPolicy,
}

impl PolicyConfig {
    /// Rejects policies that cannot describe a contract.
    ///
    /// # Errors
    /// Returns [`Error::Config`] when `payments_expected` or `videos_per_payment` is
    /// zero, or when `stale_after_hours` is negative.
    pub fn validate(&self) -> Result<()> {
        if self.payment.payments_expected == 0 {
            return Err(Error::Config {
                message: "payment.payments_expected must be at least 1".to_string(),
            });
        }
        if self.payment.videos_per_payment == 0 {
            return Err(Error::Config {
                message: "payment.videos_per_payment must be at least 1".to_string(),
            });
        }
        if self.attention.stale_after_hours < 0 {
            return Err(Error::Config {
                message: format!(
                    "attention.stale_after_hours must not be negative, got {}",
                    self.attention.stale_after_hours
                ),
            });
        }
        Ok(())
    }
}

/// Loads policy configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value has the wrong type or an unknown status name
/// - The policy fails [`PolicyConfig::validate`]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PolicyConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading policy configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    let config: PolicyConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads policy configuration from `path`, using the built-in defaults when the
/// file does not exist.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<PolicyConfig> {
    let path_ref = path.as_ref();
    if path_ref.exists() {
        load_config(path_ref)
    } else {
        tracing::info!(
            "No config file at {}, using default policy",
            path_ref.display()
        );
        Ok(PolicyConfig::default())
    }
}
