//! Notification aggregation for the negotiation pipeline.
//!
//! Notifications are derived, never stored: every call to [`aggregate`] rebuilds the
//! feed from a snapshot of projects, the membership index and the viewer's
//! invitation records. Only invitations carry a persisted read flag; project
//! notifications are always unread.
//!
//! Per visible project the feed holds either one `needs-attention` entry or up to one
//! `new-comment` and one `draft-submitted` entry. Staleness supersedes the others.

use crate::{
    config::{policy::AttentionPolicy, users::Role},
    core::{invitation::Invitation, membership::MembershipIndex},
    entities::negotiation_project,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Link target for invitation notifications
pub const INVITATION_LINK: &str = "/negotiations";

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// The viewer was invited to a project
    ProjectInvitation,
    /// A project has unread comments
    NewComment,
    /// A project has a submitted draft
    DraftSubmitted,
    /// A project moved to another stage
    StatusChanged,
    /// A creator became eligible for payment
    PaymentReady,
    /// A project has gone stale
    NeedsAttention,
}

impl NotificationKind {
    /// Wire name of the kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectInvitation => "project-invitation",
            Self::NewComment => "new-comment",
            Self::DraftSubmitted => "draft-submitted",
            Self::StatusChanged => "status-changed",
            Self::PaymentReady => "payment-ready",
            Self::NeedsAttention => "needs-attention",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency tier of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Stale project or pending invitation
    High,
    /// Unread comments or drafts waiting
    Medium,
    /// Nothing to act on
    Low,
}

/// One entry of the notification feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// `<kind>-<source id>`, stable across recomputations
    pub id: String,
    /// What the notification is about
    pub kind: NotificationKind,
    /// Urgency
    pub priority: Priority,
    /// Short headline
    pub title: String,
    /// Detail line
    pub message: String,
    /// When the underlying event happened
    pub timestamp: DateTime<Utc>,
    /// Whether the viewer has read it
    pub read: bool,
    /// Where clicking the notification leads
    pub link: Option<String>,
    /// Project the notification refers to
    pub project_id: Option<i64>,
}

/// The person the feed is computed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    /// Login email
    pub email: String,
    /// Role; admins see every project
    pub role: Role,
}

/// Builds the notification id for `kind` raised by the entity `source_id`.
#[must_use]
pub fn notification_id(kind: NotificationKind, source_id: impl fmt::Display) -> String {
    format!("{kind}-{source_id}")
}

/// Whether `viewer_email` participates in `project`: listed in the membership index
/// or assigned to it. Missing membership data means "no".
#[must_use]
pub fn is_participant(
    project: &negotiation_project::Model,
    viewer_email: &str,
    membership: &MembershipIndex,
) -> bool {
    let assigned = project
        .assigned_to
        .as_deref()
        .is_some_and(|owner| owner.trim().eq_ignore_ascii_case(viewer_email.trim()));
    assigned || membership.contains(&project.name, viewer_email)
}

/// Projects the viewer may see: all of them for admins, participations otherwise.
#[must_use]
pub fn visible_projects<'a>(
    projects: &'a [negotiation_project::Model],
    viewer: &Viewer,
    membership: &MembershipIndex,
) -> Vec<&'a negotiation_project::Model> {
    match viewer.role {
        Role::Admin => projects.iter().collect(),
        Role::Staff => projects
            .iter()
            .filter(|p| is_participant(p, &viewer.email, membership))
            .collect(),
    }
}

/// Whole hours since the project was last updated; negative if the timestamp is in
/// the future.
#[must_use]
pub fn hours_since_update(project: &negotiation_project::Model, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(project.last_updated_at)
        .num_hours()
}

/// Whether an active project has gone without updates for the staleness window.
#[must_use]
pub fn needs_attention(
    project: &negotiation_project::Model,
    now: DateTime<Utc>,
    policy: &AttentionPolicy,
) -> bool {
    !policy.is_terminal(project.status)
        && hours_since_update(project, now) >= policy.stale_after_hours
}

/// Urgency tier of a project.
#[must_use]
pub fn priority_of(
    project: &negotiation_project::Model,
    now: DateTime<Utc>,
    policy: &AttentionPolicy,
) -> Priority {
    if needs_attention(project, now, policy) {
        Priority::High
    } else if project.unread_comment_count > 0 || project.draft_count > 0 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn project_link(project: &negotiation_project::Model) -> Option<String> {
    Some(format!("{INVITATION_LINK}/{}", project.id))
}

fn invitation_notification(invitation: &Invitation) -> Notification {
    Notification {
        id: invitation.notification_id(),
        kind: NotificationKind::ProjectInvitation,
        priority: Priority::High,
        title: "Project invitation".to_string(),
        message: format!(
            "{} invited you to {}",
            invitation.inviter_email, invitation.project_name
        ),
        timestamp: invitation.invited_at,
        read: invitation.read,
        link: Some(INVITATION_LINK.to_string()),
        project_id: Some(invitation.project_id),
    }
}

fn project_notification(
    project: &negotiation_project::Model,
    kind: NotificationKind,
    priority: Priority,
    title: String,
    message: String,
) -> Notification {
    Notification {
        id: notification_id(kind, project.id),
        kind,
        priority,
        title,
        message,
        timestamp: project.last_updated_at,
        read: false,
        link: project_link(project),
        project_id: Some(project.id),
    }
}

fn project_notifications(
    project: &negotiation_project::Model,
    now: DateTime<Utc>,
    policy: &AttentionPolicy,
) -> Vec<Notification> {
    match priority_of(project, now, policy) {
        Priority::High => vec![project_notification(
            project,
            NotificationKind::NeedsAttention,
            Priority::High,
            format!("{} needs attention", project.name),
            format!(
                "No updates for {} hours ({})",
                hours_since_update(project, now),
                project.status
            ),
        )],
        Priority::Medium => {
            let mut out = Vec::with_capacity(2);
            if project.unread_comment_count > 0 {
                let noun = if project.unread_comment_count == 1 {
                    "comment"
                } else {
                    "comments"
                };
                out.push(project_notification(
                    project,
                    NotificationKind::NewComment,
                    Priority::Medium,
                    format!("New comments on {}", project.name),
                    format!("{} unread {noun}", project.unread_comment_count),
                ));
            }
            if project.draft_count > 0 {
                out.push(project_notification(
                    project,
                    NotificationKind::DraftSubmitted,
                    Priority::Medium,
                    format!("Draft submitted for {}", project.name),
                    format!(
                        "Draft v{} is ready for review",
                        project.latest_draft_version
                    ),
                ));
            }
            out
        }
        Priority::Low => Vec::new(),
    }
}

/// Builds the viewer's notification feed, most recent first.
///
/// Unread invitations addressed to the viewer are merged with the signals of every
/// project the viewer can see. Ties on timestamp keep invitations ahead of project
/// notifications, and projects in input order.
#[must_use]
pub fn aggregate(
    projects: &[negotiation_project::Model],
    viewer: &Viewer,
    membership: &MembershipIndex,
    invitations: &[Invitation],
    now: DateTime<Utc>,
    policy: &AttentionPolicy,
) -> Vec<Notification> {
    let mut feed: Vec<Notification> = invitations
        .iter()
        .filter(|inv| !inv.read && inv.is_addressed_to(&viewer.email))
        .map(invitation_notification)
        .collect();

    for project in visible_projects(projects, viewer, membership) {
        feed.extend(project_notifications(project, now, policy));
    }

    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed
}

/// Number of unread notifications, for the badge.
#[must_use]
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProjectStatus;
    use crate::test_utils::{invitation_snapshot, project_snapshot, test_now};
    use chrono::Duration;
    use std::collections::HashSet;

    const VIEWER: &str = "user@x.com";

    fn staff() -> Viewer {
        Viewer {
            email: VIEWER.to_string(),
            role: Role::Staff,
        }
    }

    fn admin() -> Viewer {
        Viewer {
            email: "boss@x.com".to_string(),
            role: Role::Admin,
        }
    }

    fn updated_hours_ago(
        mut project: negotiation_project::Model,
        hours: i64,
    ) -> negotiation_project::Model {
        project.last_updated_at = test_now() - Duration::hours(hours);
        project
    }

    #[test]
    fn test_is_participant_via_membership_or_assignment() {
        let mut index = MembershipIndex::new();
        index.insert("Listed", VIEWER);

        let listed = project_snapshot(1, "Listed");
        let mut assigned = project_snapshot(2, "Assigned");
        assigned.assigned_to = Some("User@X.com".to_string());
        let stranger = project_snapshot(3, "Stranger");

        assert!(is_participant(&listed, VIEWER, &index));
        assert!(is_participant(&assigned, VIEWER, &index));
        assert!(!is_participant(&stranger, VIEWER, &index));
    }

    #[test]
    fn test_missing_membership_is_not_participant() {
        let project = project_snapshot(1, "Anything");
        assert!(!is_participant(&project, VIEWER, &MembershipIndex::new()));
    }

    #[test]
    fn test_visible_projects_admin_sees_all() {
        let projects = vec![project_snapshot(1, "A"), project_snapshot(2, "B")];
        let index = MembershipIndex::new();

        assert_eq!(visible_projects(&projects, &admin(), &index).len(), 2);
        assert!(visible_projects(&projects, &staff(), &index).is_empty());
    }

    #[test]
    fn test_needs_attention_threshold() {
        let policy = AttentionPolicy::default();
        let now = test_now();
        let mut project = project_snapshot(1, "P");
        project.status = ProjectStatus::Negotiating;

        assert!(!needs_attention(&updated_hours_ago(project.clone(), 47), now, &policy));
        assert!(needs_attention(&updated_hours_ago(project.clone(), 48), now, &policy));
        assert!(needs_attention(&updated_hours_ago(project, 49), now, &policy));
    }

    #[test]
    fn test_terminal_statuses_never_need_attention() {
        let policy = AttentionPolicy::default();
        let now = test_now();

        for status in [
            ProjectStatus::Completed,
            ProjectStatus::DroppedByUs,
            ProjectStatus::RejectedByCreator,
            ProjectStatus::Published,
        ] {
            let mut project = updated_hours_ago(project_snapshot(1, "P"), 24 * 365);
            project.status = status;
            assert!(!needs_attention(&project, now, &policy), "{status}");
        }

        // Production stages are not terminal and do go stale
        let mut project = updated_hours_ago(project_snapshot(1, "P"), 72);
        project.status = ProjectStatus::InProduction;
        assert!(needs_attention(&project, now, &policy));
    }

    #[test]
    fn test_future_timestamp_is_not_stale() {
        let policy = AttentionPolicy::default();
        let project = updated_hours_ago(project_snapshot(1, "P"), -100);
        assert!(!needs_attention(&project, test_now(), &policy));
    }

    #[test]
    fn test_priority_of() {
        let policy = AttentionPolicy::default();
        let now = test_now();

        let stale = updated_hours_ago(project_snapshot(1, "P"), 50);
        assert_eq!(priority_of(&stale, now, &policy), Priority::High);

        let mut commented = project_snapshot(2, "Q");
        commented.unread_comment_count = 1;
        assert_eq!(priority_of(&commented, now, &policy), Priority::Medium);

        let mut drafted = project_snapshot(3, "R");
        drafted.draft_count = 1;
        assert_eq!(priority_of(&drafted, now, &policy), Priority::Medium);

        let quiet = project_snapshot(4, "S");
        assert_eq!(priority_of(&quiet, now, &policy), Priority::Low);
    }

    #[test]
    fn test_attention_supersedes_comments_and_drafts() {
        let policy = AttentionPolicy::default();
        let mut project = updated_hours_ago(project_snapshot(1, "Busy"), 60);
        project.unread_comment_count = 3;
        project.draft_count = 2;
        project.latest_draft_version = 2;

        let feed = aggregate(
            &[project],
            &admin(),
            &MembershipIndex::new(),
            &[],
            test_now(),
            &policy,
        );

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].kind, NotificationKind::NeedsAttention);
        assert_eq!(feed[0].priority, Priority::High);
        assert_eq!(feed[0].id, "needs-attention-1");
    }

    #[test]
    fn test_medium_project_emits_comment_and_draft() {
        let policy = AttentionPolicy::default();
        let mut project = updated_hours_ago(project_snapshot(7, "Launch"), 2);
        project.unread_comment_count = 1;
        project.draft_count = 2;
        project.latest_draft_version = 3;

        let feed = aggregate(
            &[project],
            &admin(),
            &MembershipIndex::new(),
            &[],
            test_now(),
            &policy,
        );

        let kinds: Vec<NotificationKind> = feed.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::NewComment, NotificationKind::DraftSubmitted]
        );
        assert_eq!(feed[0].message, "1 unread comment");
        assert_eq!(feed[1].message, "Draft v3 is ready for review");
        assert!(feed.iter().all(|n| !n.read));
        assert_eq!(feed[0].link.as_deref(), Some("/negotiations/7"));
    }

    #[test]
    fn test_no_project_mixes_attention_with_other_kinds() {
        let policy = AttentionPolicy::default();
        let projects: Vec<negotiation_project::Model> = (0..12)
            .map(|i| {
                let mut p = updated_hours_ago(project_snapshot(i, &format!("P{i}")), i * 8);
                p.unread_comment_count = i32::try_from(i % 3).unwrap_or(0);
                p.draft_count = i32::try_from(i % 2).unwrap_or(0);
                p
            })
            .collect();

        let feed = aggregate(
            &projects,
            &admin(),
            &MembershipIndex::new(),
            &[],
            test_now(),
            &policy,
        );

        let attention: HashSet<Option<i64>> = feed
            .iter()
            .filter(|n| n.kind == NotificationKind::NeedsAttention)
            .map(|n| n.project_id)
            .collect();
        assert!(!attention.is_empty());
        assert!(
            feed.iter()
                .filter(|n| n.kind != NotificationKind::NeedsAttention)
                .all(|n| !attention.contains(&n.project_id))
        );
    }

    #[test]
    fn test_staff_never_sees_foreign_projects() {
        let policy = AttentionPolicy::default();
        let mut index = MembershipIndex::new();
        index.insert("Mine", VIEWER);

        let mine = updated_hours_ago(project_snapshot(1, "Mine"), 72);
        let theirs = updated_hours_ago(project_snapshot(2, "Theirs"), 72);
        let mut commented = updated_hours_ago(project_snapshot(3, "Also Theirs"), 1);
        commented.unread_comment_count = 4;

        let feed = aggregate(
            &[mine, theirs, commented],
            &staff(),
            &index,
            &[],
            test_now(),
            &policy,
        );

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].project_id, Some(1));
    }

    #[test]
    fn test_similarly_named_project_stays_hidden() {
        let policy = AttentionPolicy::default();
        let mut index = MembershipIndex::new();
        index.insert("Glow Serum", VIEWER);
        index.insert("???", VIEWER);

        let lookalike = updated_hours_ago(project_snapshot(1, "glow-serum!"), 72);
        let punctuation = updated_hours_ago(project_snapshot(2, "!!!"), 72);

        assert!(!is_participant(&punctuation, VIEWER, &index));
        let feed = aggregate(
            &[lookalike, punctuation],
            &staff(),
            &index,
            &[],
            test_now(),
            &policy,
        );
        assert!(feed.is_empty());
    }

    #[test]
    fn test_invitation_and_attention_ordered_by_timestamp() {
        let policy = AttentionPolicy::default();
        let now = test_now();
        let mut index = MembershipIndex::new();
        index.insert("P1", VIEWER);

        // Project went stale 50 hours ago
        let project = updated_hours_ago(project_snapshot(1, "P1"), 50);

        // Invitation more recent than the project update: invitation first
        let recent = invitation_snapshot("inv-1", VIEWER, now - Duration::hours(1));
        let feed = aggregate(
            std::slice::from_ref(&project),
            &staff(),
            &index,
            std::slice::from_ref(&recent),
            now,
            &policy,
        );
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].kind, NotificationKind::ProjectInvitation);
        assert_eq!(feed[1].kind, NotificationKind::NeedsAttention);

        // Invitation older than the project update: attention first
        let old = invitation_snapshot("inv-1", VIEWER, now - Duration::hours(80));
        let feed = aggregate(&[project], &staff(), &index, &[old], now, &policy);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].kind, NotificationKind::NeedsAttention);
        assert_eq!(feed[1].kind, NotificationKind::ProjectInvitation);
    }

    #[test]
    fn test_read_and_foreign_invitations_are_skipped() {
        let policy = AttentionPolicy::default();
        let now = test_now();

        let mut read = invitation_snapshot("inv-1", VIEWER, now);
        read.read = true;
        let foreign = invitation_snapshot("inv-2", "other@x.com", now);
        let mine = invitation_snapshot("inv-3", "USER@x.com", now);

        let feed = aggregate(
            &[],
            &staff(),
            &MembershipIndex::new(),
            &[read, foreign, mine],
            now,
            &policy,
        );

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, "project-invitation-inv-3");
        assert_eq!(feed[0].link.as_deref(), Some(INVITATION_LINK));
        assert_eq!(feed[0].priority, Priority::High);
    }

    #[test]
    fn test_feed_sorted_most_recent_first() {
        let policy = AttentionPolicy::default();
        let projects: Vec<negotiation_project::Model> = [5, 1, 3]
            .into_iter()
            .map(|h| {
                let mut p = updated_hours_ago(project_snapshot(h, &format!("P{h}")), h);
                p.unread_comment_count = 1;
                p
            })
            .collect();

        let feed = aggregate(
            &projects,
            &admin(),
            &MembershipIndex::new(),
            &[],
            test_now(),
            &policy,
        );

        let order: Vec<Option<i64>> = feed.iter().map(|n| n.project_id).collect();
        assert_eq!(order, vec![Some(1), Some(3), Some(5)]);
    }

    #[test]
    fn test_unread_count() {
        let now = test_now();
        let mut read = invitation_notification(&invitation_snapshot("a", VIEWER, now));
        read.read = true;
        let unread = invitation_notification(&invitation_snapshot("b", VIEWER, now));

        assert_eq!(unread_count(&[read, unread]), 1);
        assert_eq!(unread_count(&[]), 0);
    }
}
