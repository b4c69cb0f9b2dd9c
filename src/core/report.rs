//! Report generation business logic.
//!
//! Loads the snapshots the scheduler and the notification aggregator need, runs them,
//! and formats the results as plain text for the command line. The structured report
//! types can be rendered by any other front end just as well.

use crate::{
    config::policy::PolicyConfig,
    core::{
        invitation::InvitationStore,
        kv::SystemStateStore,
        membership::MembershipStore,
        notification::{self, Notification, Viewer},
        payment, profile, project,
        schedule::{self, DueEntry, DueListSort},
        video,
    },
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use std::fmt::Write;
use tracing::debug;

/// Creators with a payment due for one brand
#[derive(Debug, Clone)]
pub struct DueReport {
    /// Brand the report covers
    pub brand: String,
    /// Evaluation day
    pub as_of: NaiveDate,
    /// Due installments in display order
    pub entries: Vec<DueEntry>,
    /// Sum of all due installments
    pub total_due: f64,
}

/// Notification feed for one viewer
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    /// Notifications, most recent first
    pub notifications: Vec<Notification>,
    /// Badge count
    pub unread: usize,
}

/// Builds the due report for `brand` on `as_of`, sorted by `sort`.
pub async fn generate_due_report(
    db: &DatabaseConnection,
    brand: &str,
    as_of: NaiveDate,
    sort: DueListSort,
    config: &PolicyConfig,
) -> Result<DueReport> {
    let profiles = profile::get_all_profiles(db).await?;
    let payments = payment::get_all_payments(db).await?;
    let videos = video::get_all_videos(db).await?;
    debug!(
        "Evaluating {} profiles, {} payments, {} videos for {}",
        profiles.len(),
        payments.len(),
        videos.len(),
        brand
    );

    let mut entries = schedule::build_due_list(
        &profiles,
        &payments,
        &videos,
        brand,
        as_of,
        &config.payment,
    );
    sort.apply(&mut entries);
    let total_due = entries.iter().map(|e| e.amount).sum();

    Ok(DueReport {
        brand: brand.trim().to_string(),
        as_of,
        entries,
        total_due,
    })
}

/// Builds the notification feed for `viewer` at `now`.
pub async fn generate_notification_feed(
    db: &DatabaseConnection,
    viewer: &Viewer,
    now: DateTime<Utc>,
    config: &PolicyConfig,
) -> Result<NotificationFeed> {
    let kv = SystemStateStore::new(db);
    let projects = project::get_all_projects(db).await?;
    let membership = MembershipStore::new(&kv).load_index(&projects).await?;
    let invitations = InvitationStore::new(&kv)
        .feed_invitations_for(&viewer.email)
        .await?;

    let notifications = notification::aggregate(
        &projects,
        viewer,
        &membership,
        &invitations,
        now,
        &config.attention,
    );
    let unread = notification::unread_count(&notifications);

    Ok(NotificationFeed {
        notifications,
        unread,
    })
}

/// Formats a dollar amount with two decimals, e.g. `"$1250.00"`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Formats a due report as a table-like listing.
#[must_use]
pub fn format_due_report(report: &DueReport) -> String {
    let mut out = format!(
        "Payments due for {} as of {} - {} creator(s), {} total\n",
        report.brand,
        report.as_of,
        report.entries.len(),
        format_amount(report.total_due)
    );

    if report.entries.is_empty() {
        out.push_str("  Nothing due.\n");
        return out;
    }

    for entry in &report.entries {
        let _ = writeln!(
            out,
            "  {} | payment {} | due {} ({}) | {} | videos {}/{}",
            entry.creator_handle,
            entry.payment_number,
            entry.due_date,
            entry.status.label(),
            format_amount(entry.amount),
            entry.video_count,
            entry.required_videos
        );
    }

    out
}

/// Formats a notification feed, one line per notification.
#[must_use]
pub fn format_notification_feed(feed: &NotificationFeed) -> String {
    let mut out = format!(
        "{} notification(s), {} unread\n",
        feed.notifications.len(),
        feed.unread
    );

    for n in &feed.notifications {
        let marker = if n.read { " " } else { "*" };
        let _ = writeln!(
            out,
            "{marker} [{}] {} {} - {} ({})",
            n.timestamp.format("%Y-%m-%d %H:%M"),
            n.id,
            n.title,
            n.message,
            n.link.as_deref().unwrap_or("-")
        );
    }

    out
}
