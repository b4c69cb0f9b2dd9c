//! Profile business logic - Handles creator contract records.
//!
//! Provides functions for creating, retrieving, updating and bulk-deleting
//! profiles. All functions are async and return Result types for error handling.

use crate::{
    core::dates::parse_date,
    entities::{Profile, profile},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Input for [`create_profile`], as entered on the onboarding form
#[derive(Debug, Clone)]
pub struct NewProfile {
    /// Creator handle; surrounding whitespace is trimmed
    pub creator_handle: String,
    /// Total contract amount in dollars
    pub contract_amount: f64,
    /// Contract start date as text (`YYYY-MM-DD` or `MM/DD/YYYY`)
    pub start_date: String,
    /// Videos committed over the whole contract
    pub total_videos: i32,
    /// Free-text payout details
    pub payment_info: String,
}

/// Creates a new profile, validating the handle, amount, video count and start date.
///
/// Fails with [`Error::DuplicateProfile`] if a profile already exists for the handle.
pub async fn create_profile(db: &DatabaseConnection, new: NewProfile) -> Result<profile::Model> {
    let handle = new.creator_handle.trim().to_string();
    if handle.is_empty() {
        return Err(Error::Config {
            message: "Creator handle cannot be empty".to_string(),
        });
    }

    if new.contract_amount < 0.0 || !new.contract_amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: new.contract_amount,
        });
    }

    if new.total_videos < 0 {
        return Err(Error::Config {
            message: format!("Video commitment cannot be negative: {}", new.total_videos),
        });
    }

    let start_date = parse_date(&new.start_date)?;

    if get_profile_by_handle(db, &handle).await?.is_some() {
        return Err(Error::DuplicateProfile { handle });
    }

    let profile = profile::ActiveModel {
        creator_handle: Set(handle),
        contract_amount: Set(new.contract_amount),
        start_date: Set(start_date),
        total_videos: Set(new.total_videos),
        payment_info: Set(new.payment_info),
        created_at: Set(Utc::now()),
    };

    let result = profile.insert(db).await?;
    info!("Created profile for {}", result.creator_handle);
    Ok(result)
}

/// Finds a profile by creator handle.
pub async fn get_profile_by_handle(
    db: &DatabaseConnection,
    handle: &str,
) -> Result<Option<profile::Model>> {
    Profile::find_by_id(handle.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every profile, ordered alphabetically by creator handle.
pub async fn get_all_profiles(db: &DatabaseConnection) -> Result<Vec<profile::Model>> {
    Profile::find()
        .order_by_asc(profile::Column::CreatorHandle)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn find_existing(db: &DatabaseConnection, handle: &str) -> Result<profile::Model> {
    get_profile_by_handle(db, handle)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            handle: handle.to_string(),
        })
}

/// Replaces the contract amount of an existing profile.
pub async fn update_contract_amount(
    db: &DatabaseConnection,
    handle: &str,
    contract_amount: f64,
) -> Result<profile::Model> {
    if contract_amount < 0.0 || !contract_amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: contract_amount,
        });
    }

    let mut active_model: profile::ActiveModel = find_existing(db, handle).await?.into();
    active_model.contract_amount = Set(contract_amount);
    active_model.update(db).await.map_err(Into::into)
}

/// Replaces the free-text payment info of an existing profile.
pub async fn update_payment_info(
    db: &DatabaseConnection,
    handle: &str,
    payment_info: String,
) -> Result<profile::Model> {
    let mut active_model: profile::ActiveModel = find_existing(db, handle).await?.into();
    active_model.payment_info = Set(payment_info);
    active_model.update(db).await.map_err(Into::into)
}

/// Deletes every profile whose handle is in `handles`, returning how many were removed.
///
/// Payments and videos for those creators are left in place.
pub async fn delete_profiles(db: &DatabaseConnection, handles: &[String]) -> Result<u64> {
    if handles.is_empty() {
        return Ok(0);
    }

    let result = Profile::delete_many()
        .filter(profile::Column::CreatorHandle.is_in(handles.iter().map(String::as_str)))
        .exec(db)
        .await?;
    info!("Deleted {} profiles", result.rows_affected);
    Ok(result.rows_affected)
}
