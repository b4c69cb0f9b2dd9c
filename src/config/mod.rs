/// Database configuration and connection management
pub mod database;

/// Payment and attention policy loading from config.toml
pub mod policy;

/// Staff roles configured from environment variables
pub mod users;
