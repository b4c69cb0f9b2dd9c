//! Profile entity - One creator contract per creator handle.
//!
//! Profiles are created once at onboarding. Staff may later change the contract
//! amount and the free-text payment info; everything else is fixed for the life
//! of the contract. Payments and videos refer back to a profile by handle only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Creator contract database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Unique creator handle on the video platform
    #[sea_orm(primary_key, auto_increment = false)]
    pub creator_handle: String,
    /// Total contract amount in dollars
    pub contract_amount: f64,
    /// Day the contract started; the first payment cycle counts from here
    pub start_date: Date,
    /// Number of videos the creator committed to over the whole contract
    pub total_videos: i32,
    /// Free-text payout details (account, method, notes)
    pub payment_info: String,
    /// When the profile was created
    pub created_at: DateTimeUtc,
}

/// Profiles are joined to payments and videos by handle, not by foreign key
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
