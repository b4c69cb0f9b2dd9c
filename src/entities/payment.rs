//! Payment entity - A single payout made against a creator contract.
//!
//! Payments are never edited: they are created, and removed only in bulk.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Handle of the creator that was paid
    pub creator_handle: String,
    /// Amount paid in dollars
    pub amount: f64,
    /// Day the payment was made
    pub payment_date: Date,
    /// Optional reference to the uploaded invoice in blob storage
    pub invoice_ref: Option<String>,
    /// When the payment record was created
    pub created_at: DateTimeUtc,
}

/// Payments are linked to profiles by handle only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
