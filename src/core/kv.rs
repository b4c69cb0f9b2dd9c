//! Key-value persistence capability.
//!
//! Membership lists and invitation records are small JSON documents stored under
//! string keys. The stores that manage them only need `get` and `set`, so they are
//! written against [`KeyValueStore`] and can run on the `system_state` table in
//! production or on [`MemoryStore`] in tests.
//!
//! Writes replace the whole value. Concurrent read-modify-write cycles resolve as
//! last writer wins.

use crate::{
    entities::{SystemState, system_state},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use std::{
    collections::HashMap,
    future::Future,
    sync::{Mutex, PoisonError},
};

/// Minimal string key-value storage
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}

/// [`KeyValueStore`] backed by the `system_state` table
#[derive(Debug, Clone, Copy)]
pub struct SystemStateStore<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SystemStateStore<'a> {
    /// Wraps a database connection.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SystemStateStore<'_> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let state = SystemState::find()
            .filter(system_state::Column::Key.eq(key))
            .one(self.db)
            .await?;
        Ok(state.map(|s| s.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        let existing = SystemState::find()
            .filter(system_state::Column::Key.eq(key))
            .one(self.db)
            .await?;

        if let Some(state) = existing {
            let mut active_model: system_state::ActiveModel = state.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(self.db).await?;
        } else {
            let new_state = system_state::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            new_state.insert(self.db).await?;
        }

        Ok(())
    }
}

/// In-process [`KeyValueStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
