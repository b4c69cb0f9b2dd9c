//! Shared test utilities for `CreatorDesk`.
//!
//! This module provides helpers for setting up test databases, inserting records with
//! sensible defaults, and building in-memory snapshots for the pure scheduling and
//! notification logic.

use crate::{
    core::{
        invitation::Invitation,
        payment,
        profile::{self, NewProfile},
        project::{self, NewProject},
        video::{self, NewVideo},
    },
    entities::{self, ProjectStatus},
    errors::Result,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Fixed "now" used across tests: 2024-03-10 12:00:00 UTC.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).single().unwrap()
}

/// Profile input with defaults: $800 contract, 96 videos, "PayPal".
#[must_use]
pub fn new_profile(handle: &str, start_date: &str) -> NewProfile {
    NewProfile {
        creator_handle: handle.to_string(),
        contract_amount: 800.0,
        start_date: start_date.to_string(),
        total_videos: 96,
        payment_info: "PayPal".to_string(),
    }
}

/// Creates a profile starting 2024-01-01 with an $800 contract.
pub async fn create_test_profile(
    db: &DatabaseConnection,
    handle: &str,
) -> Result<entities::profile::Model> {
    profile::create_profile(db, new_profile(handle, "2024-01-01")).await
}

/// Records a $100 payment for `handle` on `date`.
pub async fn create_test_payment(
    db: &DatabaseConnection,
    handle: &str,
    date: &str,
) -> Result<entities::payment::Model> {
    payment::record_payment(db, handle, 100.0, date, None).await
}

/// Records `count` videos for `handle` tagged with `brand`, uploaded 2024-01-02.
pub async fn create_test_videos(
    db: &DatabaseConnection,
    handle: &str,
    brand: &str,
    count: usize,
) -> Result<Vec<entities::video::Model>> {
    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        let video = video::record_video(
            db,
            NewVideo {
                creator_handle: handle.to_string(),
                video_id: format!("{handle}-{brand}-{i}"),
                upload_date: "2024-01-02".to_string(),
                brand: brand.to_string(),
                notes: String::new(),
                attachment_ref: None,
            },
        )
        .await?;
        created.push(video);
    }
    Ok(created)
}

/// Creates a project for brand "Glow", created and last updated at [`test_now`].
pub async fn create_test_project(
    db: &DatabaseConnection,
    name: &str,
    assigned_to: Option<&str>,
) -> Result<entities::negotiation_project::Model> {
    project::create_project(
        db,
        NewProject {
            name: name.to_string(),
            brand: "Glow".to_string(),
            product_line: "Serum".to_string(),
            region: "US".to_string(),
            creator_handle: "ana".to_string(),
            assigned_to: assigned_to.map(str::to_string),
        },
        test_now(),
    )
    .await
}

/// In-memory profile snapshot.
#[must_use]
pub fn profile_snapshot(
    handle: &str,
    start_date: NaiveDate,
    contract_amount: f64,
) -> entities::profile::Model {
    entities::profile::Model {
        creator_handle: handle.to_string(),
        contract_amount,
        start_date,
        total_videos: 96,
        payment_info: String::new(),
        created_at: test_now(),
    }
}

/// In-memory payment snapshot of $100.
#[must_use]
pub fn payment_snapshot(id: i64, handle: &str, payment_date: NaiveDate) -> entities::payment::Model {
    entities::payment::Model {
        id,
        creator_handle: handle.to_string(),
        amount: 100.0,
        payment_date,
        invoice_ref: None,
        created_at: test_now(),
    }
}

/// `count` in-memory video snapshots for `handle` and `brand`.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn video_snapshots(handle: &str, brand: &str, count: usize) -> Vec<entities::video::Model> {
    (0..count)
        .map(|i| entities::video::Model {
            id: i64::try_from(i).unwrap(),
            creator_handle: handle.to_string(),
            video_id: format!("{handle}-{i}"),
            upload_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            brand: brand.to_string(),
            notes: String::new(),
            attachment_ref: None,
        })
        .collect()
}

/// In-memory project snapshot: `email-sent`, unassigned, no comments or drafts,
/// last updated at [`test_now`].
#[must_use]
pub fn project_snapshot(id: i64, name: &str) -> entities::negotiation_project::Model {
    entities::negotiation_project::Model {
        id,
        name: name.to_string(),
        brand: "Glow".to_string(),
        product_line: "Serum".to_string(),
        region: "US".to_string(),
        creator_handle: "ana".to_string(),
        status: ProjectStatus::EmailSent,
        assigned_to: None,
        unread_comment_count: 0,
        draft_count: 0,
        latest_draft_version: 0,
        last_updated_at: test_now(),
        created_at: test_now(),
    }
}

/// Unread invitation from `boss@x.com` to project 1, "P1".
#[must_use]
pub fn invitation_snapshot(id: &str, recipient: &str, invited_at: DateTime<Utc>) -> Invitation {
    Invitation {
        id: id.to_string(),
        recipient_email: recipient.to_string(),
        project_id: 1,
        project_name: "P1".to_string(),
        inviter_email: "boss@x.com".to_string(),
        invited_at,
        read: false,
    }
}
