//! Negotiation project business logic - Pipeline records for creator deals.
//!
//! Every mutation that represents activity on a project moves `last_updated_at`
//! forward, which is what the notification aggregator measures staleness against.
//! Reading comments is not activity and leaves the timestamp alone.

use crate::{
    entities::{NegotiationProject, ProjectStatus, negotiation_project},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Input for [`create_project`]
#[derive(Debug, Clone)]
pub struct NewProject {
    /// Project name
    pub name: String,
    /// Sponsoring brand
    pub brand: String,
    /// Product line the deal promotes
    pub product_line: String,
    /// Market region
    pub region: String,
    /// Creator being negotiated with
    pub creator_handle: String,
    /// Owning staff member, if any
    pub assigned_to: Option<String>,
}

/// Creates a project in the `email-sent` stage.
pub async fn create_project(
    db: &DatabaseConnection,
    new: NewProject,
    now: DateTime<Utc>,
) -> Result<negotiation_project::Model> {
    let name = new.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Project name cannot be empty".to_string(),
        });
    }

    let project = negotiation_project::ActiveModel {
        name: Set(name),
        brand: Set(new.brand),
        product_line: Set(new.product_line),
        region: Set(new.region),
        creator_handle: Set(new.creator_handle),
        status: Set(ProjectStatus::EmailSent),
        assigned_to: Set(new.assigned_to),
        unread_comment_count: Set(0),
        draft_count: Set(0),
        latest_draft_version: Set(0),
        last_updated_at: Set(now),
        created_at: Set(now),
        ..Default::default()
    };

    let result = project.insert(db).await?;
    info!("Created negotiation project {} ({})", result.name, result.id);
    Ok(result)
}

/// Retrieves every project, most recently updated first.
pub async fn get_all_projects(db: &DatabaseConnection) -> Result<Vec<negotiation_project::Model>> {
    NegotiationProject::find()
        .order_by_desc(negotiation_project::Column::LastUpdatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a project by id.
pub async fn get_project_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<negotiation_project::Model>> {
    NegotiationProject::find_by_id(id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn find_existing(db: &DatabaseConnection, id: i64) -> Result<negotiation_project::Model> {
    get_project_by_id(db, id)
        .await?
        .ok_or(Error::ProjectNotFound { id })
}

/// Moves a project to `status`.
pub async fn update_project_status(
    db: &DatabaseConnection,
    id: i64,
    status: ProjectStatus,
    now: DateTime<Utc>,
) -> Result<negotiation_project::Model> {
    let existing = find_existing(db, id).await?;
    debug!(
        "Project {} status {} -> {}",
        existing.id, existing.status, status
    );

    let mut active_model: negotiation_project::ActiveModel = existing.into();
    active_model.status = Set(status);
    active_model.last_updated_at = Set(now);
    active_model.update(db).await.map_err(Into::into)
}

/// Assigns (or unassigns) the owning staff member.
pub async fn assign_project(
    db: &DatabaseConnection,
    id: i64,
    assigned_to: Option<String>,
    now: DateTime<Utc>,
) -> Result<negotiation_project::Model> {
    let mut active_model: negotiation_project::ActiveModel = find_existing(db, id).await?.into();
    active_model.assigned_to = Set(assigned_to);
    active_model.last_updated_at = Set(now);
    active_model.update(db).await.map_err(Into::into)
}

/// Counts a new unread comment on the project.
pub async fn record_comment(
    db: &DatabaseConnection,
    id: i64,
    now: DateTime<Utc>,
) -> Result<negotiation_project::Model> {
    let existing = find_existing(db, id).await?;
    let unread = existing.unread_comment_count + 1;

    let mut active_model: negotiation_project::ActiveModel = existing.into();
    active_model.unread_comment_count = Set(unread);
    active_model.last_updated_at = Set(now);
    active_model.update(db).await.map_err(Into::into)
}

/// Clears the unread comment counter.
pub async fn mark_comments_read(
    db: &DatabaseConnection,
    id: i64,
) -> Result<negotiation_project::Model> {
    let mut active_model: negotiation_project::ActiveModel = find_existing(db, id).await?.into();
    active_model.unread_comment_count = Set(0);
    active_model.update(db).await.map_err(Into::into)
}

/// Records a newly submitted draft, bumping the draft count and version.
pub async fn submit_draft(
    db: &DatabaseConnection,
    id: i64,
    now: DateTime<Utc>,
) -> Result<negotiation_project::Model> {
    let existing = find_existing(db, id).await?;
    let draft_count = existing.draft_count + 1;
    let version = existing.latest_draft_version + 1;

    let mut active_model: negotiation_project::ActiveModel = existing.into();
    active_model.draft_count = Set(draft_count);
    active_model.latest_draft_version = Set(version);
    active_model.last_updated_at = Set(now);
    active_model.update(db).await.map_err(Into::into)
}
