//! Payment scheduling.
//!
//! A contract is paid out in `payments_expected` equal installments. Installment `k`
//! (1-indexed) becomes due `cycle_days` after the previous payment (or after the
//! contract start for the first one), and only once the creator has uploaded at
//! least `k * videos_per_payment` videos for the brand being paid.
//!
//! Everything here is pure: callers pass in snapshots of profiles, payments and
//! videos plus the evaluation date.

use crate::{
    config::policy::PaymentPolicy,
    core::video::count_videos_for_brand,
    entities::{payment, profile, video},
};
use chrono::{Days, NaiveDate};
use std::{cmp::Ordering, collections::HashMap};

/// Payments already made to one creator
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaymentHistory<'a> {
    /// How many payments were recorded
    pub payments_made: u32,
    /// The payment with the latest date, if any
    pub last_payment: Option<&'a payment::Model>,
}

impl<'a> PaymentHistory<'a> {
    fn record(&mut self, payment: &'a payment::Model) {
        self.payments_made = self.payments_made.saturating_add(1);
        let is_later = self.last_payment.is_none_or(|last| {
            (payment.payment_date, payment.id) > (last.payment_date, last.id)
        });
        if is_later {
            self.last_payment = Some(payment);
        }
    }
}

/// Groups payments by creator handle.
#[must_use]
pub fn payment_histories(payments: &[payment::Model]) -> HashMap<&str, PaymentHistory<'_>> {
    let mut histories: HashMap<&str, PaymentHistory<'_>> = HashMap::new();
    for payment in payments {
        histories
            .entry(payment.creator_handle.as_str())
            .or_default()
            .record(payment);
    }
    histories
}

/// Date the next installment falls due, or `None` once every installment was paid.
#[must_use]
pub fn compute_next_due_date(
    profile: &profile::Model,
    last_payment: Option<&payment::Model>,
    payments_made: u32,
    policy: &PaymentPolicy,
) -> Option<NaiveDate> {
    if payments_made >= policy.payments_expected {
        return None;
    }

    let base = last_payment.map_or(profile.start_date, |p| p.payment_date);
    base.checked_add_days(Days::new(u64::from(policy.cycle_days)))
}

/// Cumulative brand videos needed before the next installment can be paid.
#[must_use]
pub const fn required_videos(payments_made: u32, policy: &PaymentPolicy) -> u32 {
    payments_made
        .saturating_add(1)
        .saturating_mul(policy.videos_per_payment)
}

/// Whether the next installment is due on `as_of`: the due date has been reached and
/// the video threshold is met.
#[must_use]
pub fn is_payment_due(
    profile: &profile::Model,
    video_count_for_brand: u32,
    last_payment: Option<&payment::Model>,
    payments_made: u32,
    as_of: NaiveDate,
    policy: &PaymentPolicy,
) -> bool {
    compute_next_due_date(profile, last_payment, payments_made, policy)
        .is_some_and(|due| due <= as_of)
        && video_count_for_brand >= required_videos(payments_made, policy)
}

/// Size of one installment, at full precision.
#[must_use]
pub fn amount_per_payment(profile: &profile::Model, policy: &PaymentPolicy) -> f64 {
    profile.contract_amount / f64::from(policy.payments_expected.max(1))
}

/// How a due date should be emphasized when displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Past due
    Error,
    /// Due today
    Warning,
    /// Nothing pressing
    Neutral,
}

/// Overdue classification of a due date relative to a reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// The due date passed this many days ago
    Overdue {
        /// Whole days past the due date, at least 1
        days: i64,
    },
    /// The due date is the reference day
    DueToday,
    /// No due date, or it lies in the future
    NotDue,
}

impl DueStatus {
    /// Classifies `due` relative to `as_of`.
    #[must_use]
    pub fn classify(due: Option<NaiveDate>, as_of: NaiveDate) -> Self {
        let Some(due) = due else {
            return Self::NotDue;
        };
        match as_of.signed_duration_since(due).num_days() {
            days if days > 0 => Self::Overdue { days },
            0 => Self::DueToday,
            _ => Self::NotDue,
        }
    }

    /// Display text: `"3 days overdue"`, `"Due Today"` or `"N/A"`
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Overdue { days: 1 } => "1 day overdue".to_string(),
            Self::Overdue { days } => format!("{days} days overdue"),
            Self::DueToday => "Due Today".to_string(),
            Self::NotDue => "N/A".to_string(),
        }
    }

    /// Display emphasis for the status
    #[must_use]
    pub const fn emphasis(self) -> Emphasis {
        match self {
            Self::Overdue { .. } => Emphasis::Error,
            Self::DueToday => Emphasis::Warning,
            Self::NotDue => Emphasis::Neutral,
        }
    }
}

/// A creator with an installment due
#[derive(Debug, Clone, PartialEq)]
pub struct DueEntry {
    /// Creator to pay
    pub creator_handle: String,
    /// 1-indexed installment number
    pub payment_number: u32,
    /// When it fell due
    pub due_date: NaiveDate,
    /// Installment amount
    pub amount: f64,
    /// Brand videos uploaded so far
    pub video_count: u32,
    /// Brand videos required for this installment
    pub required_videos: u32,
    /// Overdue classification on the evaluation day
    pub status: DueStatus,
}

/// Column the due list is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Due date; ties broken by handle, ascending
    DueDate,
    /// Creator handle; ties broken by due date, ascending
    CreatorHandle,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// Current sort of the due list. Defaults to due date, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueListSort {
    /// Primary key
    pub key: SortKey,
    /// Direction of the primary key
    pub direction: SortDirection,
}

impl Default for DueListSort {
    fn default() -> Self {
        Self {
            key: SortKey::DueDate,
            direction: SortDirection::Ascending,
        }
    }
}

impl DueListSort {
    /// Applies a sort request: the same key again flips direction, a new key starts
    /// ascending.
    #[must_use]
    pub const fn toggle(self, key: SortKey) -> Self {
        let direction = match (self.key, key, self.direction) {
            (SortKey::DueDate, SortKey::DueDate, SortDirection::Ascending)
            | (SortKey::CreatorHandle, SortKey::CreatorHandle, SortDirection::Ascending) => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        Self { key, direction }
    }

    fn compare(self, a: &DueEntry, b: &DueEntry) -> Ordering {
        let (primary, secondary) = match self.key {
            SortKey::DueDate => (
                a.due_date.cmp(&b.due_date),
                a.creator_handle.cmp(&b.creator_handle),
            ),
            SortKey::CreatorHandle => (
                a.creator_handle.cmp(&b.creator_handle),
                a.due_date.cmp(&b.due_date),
            ),
        };
        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then(secondary)
    }

    /// Sorts `entries` in place.
    pub fn apply(self, entries: &mut [DueEntry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }
}

/// Lists every creator whose next installment is due on `as_of` for `brand`, sorted
/// by due date then handle.
#[must_use]
pub fn build_due_list(
    profiles: &[profile::Model],
    payments: &[payment::Model],
    videos: &[video::Model],
    brand: &str,
    as_of: NaiveDate,
    policy: &PaymentPolicy,
) -> Vec<DueEntry> {
    let histories = payment_histories(payments);
    let video_counts = count_videos_for_brand(videos, brand);

    let mut entries: Vec<DueEntry> = profiles
        .iter()
        .filter_map(|profile| {
            let history = histories
                .get(profile.creator_handle.as_str())
                .copied()
                .unwrap_or_default();
            let video_count = video_counts
                .get(&profile.creator_handle)
                .copied()
                .unwrap_or(0);

            if !is_payment_due(
                profile,
                video_count,
                history.last_payment,
                history.payments_made,
                as_of,
                policy,
            ) {
                return None;
            }

            let due_date = compute_next_due_date(
                profile,
                history.last_payment,
                history.payments_made,
                policy,
            )?;
            Some(DueEntry {
                creator_handle: profile.creator_handle.clone(),
                payment_number: history.payments_made + 1,
                due_date,
                amount: amount_per_payment(profile, policy),
                video_count,
                required_videos: required_videos(history.payments_made, policy),
                status: DueStatus::classify(Some(due_date), as_of),
            })
        })
        .collect();

    DueListSort::default().apply(&mut entries);
    entries
}
