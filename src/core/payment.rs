//! Payment business logic - Records payouts against creator contracts.
//!
//! Payments are append-only: there is no update operation, only creation and
//! bulk deletion.

use crate::{
    core::{dates::parse_date, profile::get_profile_by_handle},
    entities::{Payment, payment},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Records a payment for an existing creator.
///
/// The amount must be positive and the date must parse; the creator must have a profile.
pub async fn record_payment(
    db: &DatabaseConnection,
    creator_handle: &str,
    amount: f64,
    payment_date: &str,
    invoice_ref: Option<String>,
) -> Result<payment::Model> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }

    let payment_date = parse_date(payment_date)?;

    let profile = get_profile_by_handle(db, creator_handle)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            handle: creator_handle.to_string(),
        })?;

    let payment = payment::ActiveModel {
        creator_handle: Set(profile.creator_handle),
        amount: Set(amount),
        payment_date: Set(payment_date),
        invoice_ref: Set(invoice_ref),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = payment.insert(db).await?;
    info!(
        "Recorded payment of ${:.2} to {} on {}",
        result.amount, result.creator_handle, result.payment_date
    );
    Ok(result)
}

/// Retrieves the payments for one creator, most recent first.
pub async fn get_payments_for_creator(
    db: &DatabaseConnection,
    creator_handle: &str,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::CreatorHandle.eq(creator_handle))
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every payment, most recent first.
pub async fn get_all_payments(db: &DatabaseConnection) -> Result<Vec<payment::Model>> {
    Payment::find()
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes the payments with the given ids, returning how many were removed.
pub async fn delete_payments(db: &DatabaseConnection, ids: &[i64]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = Payment::delete_many()
        .filter(payment::Column::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    info!("Deleted {} payments", result.rows_affected);
    Ok(result.rows_affected)
}
