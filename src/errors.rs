//! Unified error type for `CreatorDesk`.
//!
//! Every fallible operation in the crate returns [`Result`], so persistence helpers,
//! configuration loading and the binary can all propagate with `?`.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed, or input failed validation
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A date or timestamp string could not be parsed
    #[error("Invalid date: {value:?}")]
    InvalidDate {
        /// The rejected input
        value: String,
    },

    /// A monetary amount was negative or otherwise out of range
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// No profile exists for the given creator handle
    #[error("Profile not found: {handle}")]
    ProfileNotFound {
        /// Creator handle that was looked up
        handle: String,
    },

    /// A profile with the same creator handle already exists
    #[error("Profile already exists: {handle}")]
    DuplicateProfile {
        /// Creator handle that collided
        handle: String,
    },

    /// No negotiation project exists with the given id
    #[error("Negotiation project not found: {id}")]
    ProjectNotFound {
        /// Project id that was looked up
        id: i64,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Stored key-value payload could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
