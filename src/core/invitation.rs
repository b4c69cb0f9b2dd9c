//! Project invitations.
//!
//! Invitations are the only notifications with durable state. Each recipient has one
//! JSON list in the key-value store; marking one read rewrites that list.

use crate::{
    core::{
        kv::KeyValueStore,
        membership::MembershipStore,
        notification::{NotificationKind, notification_id},
    },
    entities::negotiation_project,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const INVITATIONS_KEY_PREFIX: &str = "invitations:";

/// A staff member's invitation to join a negotiation project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique id of the invitation
    pub id: String,
    /// Who was invited
    pub recipient_email: String,
    /// Project the invitation is for
    pub project_id: i64,
    /// Project name at the time of the invitation
    pub project_name: String,
    /// Who sent the invitation
    pub inviter_email: String,
    /// When the invitation was sent
    pub invited_at: DateTime<Utc>,
    /// Whether the recipient has seen it
    #[serde(default)]
    pub read: bool,
}

impl Invitation {
    /// Id of the notification this invitation produces
    #[must_use]
    pub fn notification_id(&self) -> String {
        notification_id(NotificationKind::ProjectInvitation, &self.id)
    }

    /// Whether the invitation was sent to `email` (case-insensitive)
    #[must_use]
    pub fn is_addressed_to(&self, email: &str) -> bool {
        self.recipient_email
            .trim()
            .eq_ignore_ascii_case(email.trim())
    }
}

/// Reads and writes per-recipient invitation lists through a [`KeyValueStore`]
#[derive(Debug)]
pub struct InvitationStore<'a, S> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> InvitationStore<'a, S> {
    /// Wraps a key-value store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn key(email: &str) -> String {
        format!("{INVITATIONS_KEY_PREFIX}{}", email.trim().to_lowercase())
    }

    async fn save(&self, email: &str, invitations: &[Invitation]) -> Result<()> {
        self.store
            .set(&Self::key(email), &serde_json::to_string(invitations)?)
            .await
    }

    /// All invitations ever sent to `email`, read or not.
    pub async fn invitations_for(&self, email: &str) -> Result<Vec<Invitation>> {
        match self.store.get(&Self::key(email)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Invitations for `email` when building a feed.
    ///
    /// A list that cannot be decoded is logged and treated as empty, so the rest of
    /// the feed still renders.
    pub async fn feed_invitations_for(&self, email: &str) -> Result<Vec<Invitation>> {
        match self.invitations_for(email).await {
            Err(Error::Serialization(e)) => {
                warn!("Ignoring unreadable invitation list for {}: {}", email, e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Appends an invitation to its recipient's list.
    pub async fn add_invitation(&self, invitation: Invitation) -> Result<()> {
        let recipient = invitation.recipient_email.clone();
        let mut invitations = self.invitations_for(&recipient).await?;
        invitations.push(invitation);
        self.save(&recipient, &invitations).await
    }

    /// Marks the invitation behind `notification_id` as read.
    ///
    /// Returns `true` if a record changed. Unknown ids and already-read invitations
    /// are left alone and nothing is written.
    pub async fn mark_invitation_read(
        &self,
        recipient_email: &str,
        notification_id: &str,
    ) -> Result<bool> {
        let mut invitations = self.invitations_for(recipient_email).await?;

        let Some(invitation) = invitations
            .iter_mut()
            .find(|inv| inv.notification_id() == notification_id)
        else {
            debug!("No invitation {} for {}", notification_id, recipient_email);
            return Ok(false);
        };

        if invitation.read {
            return Ok(false);
        }
        invitation.read = true;

        self.save(recipient_email, &invitations).await?;
        Ok(true)
    }
}

/// Adds `recipient_email` to the project's members and records an invitation for them.
///
/// Returns `None` when the recipient was already a member; no invitation is sent then.
pub async fn invite_to_project<S: KeyValueStore>(
    store: &S,
    project: &negotiation_project::Model,
    inviter_email: &str,
    recipient_email: &str,
    now: DateTime<Utc>,
) -> Result<Option<Invitation>> {
    let added = MembershipStore::new(store)
        .add_member(&project.name, recipient_email)
        .await?;
    if !added {
        debug!(
            "{} is already a member of {}, not inviting",
            recipient_email, project.name
        );
        return Ok(None);
    }

    let invitation = Invitation {
        id: format!("{}-{}", project.id, now.timestamp_millis()),
        recipient_email: recipient_email.trim().to_lowercase(),
        project_id: project.id,
        project_name: project.name.clone(),
        inviter_email: inviter_email.to_string(),
        invited_at: now,
        read: false,
    };
    InvitationStore::new(store)
        .add_invitation(invitation.clone())
        .await?;

    info!(
        "{} invited {} to {}",
        inviter_email, invitation.recipient_email, project.name
    );
    Ok(Some(invitation))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::kv::{MemoryStore, SystemStateStore};
    use crate::test_utils::{invitation_snapshot, project_snapshot, setup_test_db, test_now};

    #[tokio::test]
    async fn test_invitations_for_unknown_recipient_is_empty() -> Result<()> {
        let kv = MemoryStore::new();
        let store = InvitationStore::new(&kv);
        assert!(store.invitations_for("nobody@x.com").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_invitation_keyed_by_recipient() -> Result<()> {
        let kv = MemoryStore::new();
        let store = InvitationStore::new(&kv);

        store
            .add_invitation(invitation_snapshot("a", "Ana@X.com", test_now()))
            .await?;
        store
            .add_invitation(invitation_snapshot("b", "ana@x.com", test_now()))
            .await?;
        store
            .add_invitation(invitation_snapshot("c", "max@x.com", test_now()))
            .await?;

        assert_eq!(store.invitations_for("ANA@x.com").await?.len(), 2);
        assert_eq!(store.invitations_for("max@x.com").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_feed_invitations_tolerate_corrupt_list() -> Result<()> {
        let kv = MemoryStore::new();
        kv.set("invitations:ana@x.com", "{broken").await?;
        let store = InvitationStore::new(&kv);

        assert!(matches!(
            store.invitations_for("ana@x.com").await,
            Err(Error::Serialization(_))
        ));
        assert!(store.feed_invitations_for("ana@x.com").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_invitation_read_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let kv = SystemStateStore::new(&db);
        let store = InvitationStore::new(&kv);

        store
            .add_invitation(invitation_snapshot("a", "ana@x.com", test_now()))
            .await?;
        store
            .add_invitation(invitation_snapshot("b", "ana@x.com", test_now()))
            .await?;

        assert!(
            store
                .mark_invitation_read("ana@x.com", "project-invitation-a")
                .await?
        );
        assert!(
            !store
                .mark_invitation_read("ana@x.com", "project-invitation-a")
                .await?
        );
        assert!(
            !store
                .mark_invitation_read("ana@x.com", "project-invitation-zzz")
                .await?
        );

        let invitations = store.invitations_for("ana@x.com").await?;
        let read: Vec<bool> = invitations.iter().map(|i| i.read).collect();
        assert_eq!(read, vec![true, false]);
        Ok(())
    }

    #[tokio::test]
    async fn test_invite_to_project_adds_member_once() -> Result<()> {
        let kv = MemoryStore::new();
        let project = project_snapshot(9, "Spring Launch");

        let first = invite_to_project(&kv, &project, "boss@x.com", "Ana@X.com", test_now())
            .await?
            .unwrap();
        assert_eq!(first.recipient_email, "ana@x.com");
        assert_eq!(first.project_id, 9);
        assert!(!first.read);

        let second =
            invite_to_project(&kv, &project, "boss@x.com", "ana@x.com", test_now()).await?;
        assert!(second.is_none());

        let members = MembershipStore::new(&kv).members_of("Spring Launch").await?;
        assert!(members.contains("ana@x.com"));

        let invitations = InvitationStore::new(&kv).invitations_for("ana@x.com").await?;
        assert_eq!(invitations, vec![first]);
        Ok(())
    }

    #[test]
    fn test_notification_id_and_addressing() {
        let invitation = invitation_snapshot("9-1700000000000", "ana@x.com", test_now());
        assert_eq!(
            invitation.notification_id(),
            "project-invitation-9-1700000000000"
        );
        assert!(invitation.is_addressed_to(" ANA@x.com"));
        assert!(!invitation.is_addressed_to("max@x.com"));
    }
}
