//! Project membership - which staff members participate in which project.
//!
//! Membership lists live in the key-value store under a key derived from the
//! project name (see [`project_key`]). Emails are compared case-insensitively.

use crate::{
    core::kv::KeyValueStore,
    entities::negotiation_project,
    errors::{Error, Result},
};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

const MEMBERS_KEY_PREFIX: &str = "project_members:";

/// Derives the membership key for a project name: the trimmed, lowercased name.
///
/// Names that differ in anything other than case or surrounding whitespace get
/// different keys. A blank name yields the empty key, which never has members.
#[must_use]
pub fn project_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Snapshot of project participants, keyed by [`project_key`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipIndex {
    members: HashMap<String, BTreeSet<String>>,
}

impl MembershipIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `email` as a participant of the project named `project_name`.
    pub fn insert(&mut self, project_name: &str, email: &str) {
        let key = project_key(project_name);
        if key.is_empty() {
            return;
        }
        self.members
            .entry(key)
            .or_default()
            .insert(normalize_email(email));
    }

    /// Whether `email` is listed for the project named `project_name`.
    ///
    /// Projects absent from the index, and blank names, have no participants.
    #[must_use]
    pub fn contains(&self, project_name: &str, email: &str) -> bool {
        let key = project_key(project_name);
        !key.is_empty()
            && self
                .members
                .get(&key)
                .is_some_and(|set| set.contains(&normalize_email(email)))
    }

    /// Participants of the project named `project_name`, in sorted order.
    pub fn members_of(&self, project_name: &str) -> impl Iterator<Item = &str> {
        self.members
            .get(&project_key(project_name))
            .into_iter()
            .flatten()
            .map(String::as_str)
    }
}

/// Reads and writes membership lists through a [`KeyValueStore`]
#[derive(Debug)]
pub struct MembershipStore<'a, S> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> MembershipStore<'a, S> {
    /// Wraps a key-value store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn key(project_name: &str) -> String {
        format!("{MEMBERS_KEY_PREFIX}{}", project_key(project_name))
    }

    /// Returns the participants of a project; an absent list or a blank name is empty.
    pub async fn members_of(&self, project_name: &str) -> Result<BTreeSet<String>> {
        if project_key(project_name).is_empty() {
            return Ok(BTreeSet::new());
        }
        match self.store.get(&Self::key(project_name)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Adds a participant. Returns `false` if they were already listed or the project
    /// name is blank.
    pub async fn add_member(&self, project_name: &str, email: &str) -> Result<bool> {
        if project_key(project_name).is_empty() {
            warn!("Not adding {} to a project with a blank name", email);
            return Ok(false);
        }
        let mut members = self.members_of(project_name).await?;
        if !members.insert(normalize_email(email)) {
            return Ok(false);
        }
        self.store
            .set(&Self::key(project_name), &serde_json::to_string(&members)?)
            .await?;
        Ok(true)
    }

    /// Removes a participant. Returns `false` if they were not listed.
    pub async fn remove_member(&self, project_name: &str, email: &str) -> Result<bool> {
        let mut members = self.members_of(project_name).await?;
        if !members.remove(&normalize_email(email)) {
            return Ok(false);
        }
        self.store
            .set(&Self::key(project_name), &serde_json::to_string(&members)?)
            .await?;
        Ok(true)
    }

    /// Builds a [`MembershipIndex`] for `projects`.
    ///
    /// A membership list that cannot be decoded is logged and treated as empty, so
    /// bad data never grants visibility.
    pub async fn load_index(
        &self,
        projects: &[negotiation_project::Model],
    ) -> Result<MembershipIndex> {
        let mut index = MembershipIndex::new();
        let mut seen = BTreeSet::new();

        for project in projects {
            if !seen.insert(project_key(&project.name)) {
                continue;
            }
            match self.members_of(&project.name).await {
                Ok(members) => {
                    for email in &members {
                        index.insert(&project.name, email);
                    }
                }
                Err(Error::Serialization(e)) => {
                    warn!(
                        "Ignoring unreadable membership list for {}: {}",
                        project.name, e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(index)
    }
}
