//! Video entity - One uploaded creator video, tagged with the sponsoring brand.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Uploaded video database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Handle of the creator who uploaded the video
    pub creator_handle: String,
    /// Video id on the external platform
    pub video_id: String,
    /// Day the video went live
    pub upload_date: Date,
    /// Brand the video was made for
    pub brand: String,
    /// Free-text notes from staff
    pub notes: String,
    /// Optional reference to the archived video file in blob storage
    pub attachment_ref: Option<String>,
}

/// Videos are linked to profiles by handle only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
