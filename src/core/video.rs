//! Video business logic - Records uploaded creator videos and counts them per brand.

use crate::{
    core::dates::parse_date,
    entities::{Video, video},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::HashMap;

/// Input for [`record_video`]
#[derive(Debug, Clone)]
pub struct NewVideo {
    /// Handle of the uploading creator
    pub creator_handle: String,
    /// Video id on the external platform
    pub video_id: String,
    /// Upload date as text (`YYYY-MM-DD` or `MM/DD/YYYY`)
    pub upload_date: String,
    /// Brand the video was made for
    pub brand: String,
    /// Free-text notes
    pub notes: String,
    /// Optional reference to the archived file
    pub attachment_ref: Option<String>,
}

/// Records an uploaded video. The brand tag is required; it drives payment eligibility.
pub async fn record_video(db: &DatabaseConnection, new: NewVideo) -> Result<video::Model> {
    let brand = new.brand.trim().to_string();
    if brand.is_empty() {
        return Err(Error::Config {
            message: format!("Video {} has no brand tag", new.video_id),
        });
    }

    let upload_date = parse_date(&new.upload_date)?;

    let video = video::ActiveModel {
        creator_handle: Set(new.creator_handle.trim().to_string()),
        video_id: Set(new.video_id),
        upload_date: Set(upload_date),
        brand: Set(brand),
        notes: Set(new.notes),
        attachment_ref: Set(new.attachment_ref),
        ..Default::default()
    };

    video.insert(db).await.map_err(Into::into)
}

/// Retrieves every video, newest upload first.
pub async fn get_all_videos(db: &DatabaseConnection) -> Result<Vec<video::Model>> {
    Video::find()
        .order_by_desc(video::Column::UploadDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts videos per creator handle for a single brand.
///
/// Creators without any video for the brand are absent from the map.
#[must_use]
pub fn count_videos_for_brand(videos: &[video::Model], brand: &str) -> HashMap<String, u32> {
    let brand = brand.trim();
    let mut counts = HashMap::new();
    for video in videos.iter().filter(|v| v.brand == brand) {
        *counts.entry(video.creator_handle.clone()).or_insert(0) += 1;
    }
    counts
}
