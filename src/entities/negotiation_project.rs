//! Negotiation project entity - One creator deal moving through the outreach
//! pipeline: outreach, negotiation, production, payment, completion.
//!
//! Comment and draft counters are maintained by the project helpers in
//! `core::project`; the notification aggregator only reads them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage of a negotiation project
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// First outreach email went out
    #[sea_orm(string_value = "email-sent")]
    EmailSent,
    /// Creator answered the outreach
    #[sea_orm(string_value = "response-received")]
    ResponseReceived,
    /// Terms are being discussed
    #[sea_orm(string_value = "negotiating")]
    Negotiating,
    /// Terms were agreed
    #[sea_orm(string_value = "agreed")]
    Agreed,
    /// Creator is producing the content
    #[sea_orm(string_value = "in-production")]
    InProduction,
    /// A draft is waiting for staff review
    #[sea_orm(string_value = "draft-review")]
    DraftReview,
    /// Content is live
    #[sea_orm(string_value = "published")]
    Published,
    /// Content is live and the creator is waiting to be paid
    #[sea_orm(string_value = "payment-pending")]
    PaymentPending,
    /// Deal closed and paid
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Creator turned the deal down
    #[sea_orm(string_value = "rejected-by-creator")]
    RejectedByCreator,
    /// We walked away from the deal
    #[sea_orm(string_value = "dropped-by-us")]
    DroppedByUs,
}

impl ProjectStatus {
    /// Wire name of the status, as stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmailSent => "email-sent",
            Self::ResponseReceived => "response-received",
            Self::Negotiating => "negotiating",
            Self::Agreed => "agreed",
            Self::InProduction => "in-production",
            Self::DraftReview => "draft-review",
            Self::Published => "published",
            Self::PaymentPending => "payment-pending",
            Self::Completed => "completed",
            Self::RejectedByCreator => "rejected-by-creator",
            Self::DroppedByUs => "dropped-by-us",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Negotiation project database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "negotiation_projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Project name; the membership key is derived from it
    pub name: String,
    /// Sponsoring brand
    pub brand: String,
    /// Product line the deal promotes
    pub product_line: String,
    /// Market region
    pub region: String,
    /// Handle of the creator being negotiated with
    pub creator_handle: String,
    /// Current pipeline stage
    pub status: ProjectStatus,
    /// Email of the staff member who owns the project, if assigned
    pub assigned_to: Option<String>,
    /// Comments nobody has read yet
    pub unread_comment_count: i32,
    /// Drafts submitted so far
    pub draft_count: i32,
    /// Version number of the most recent draft (0 before the first draft)
    pub latest_draft_version: i32,
    /// Last time anything changed on the project
    pub last_updated_at: DateTimeUtc,
    /// When the project was created
    pub created_at: DateTimeUtc,
}

/// Projects reference creators and staff by string only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
