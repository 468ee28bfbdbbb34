//! Borrow records and the derived loan view.
//!
//! Borrow records are owned by the backend; this layer only reads them.
//! The loan view is computed at read time from the record list and the
//! evaluation clock — never stored, always derived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a loan is outstanding or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
  Borrowed,
  Returned,
}

/// One loan transaction for a book against a student profile.
///
/// Invariant: `returned_at` is set if and only if `status` is
/// [`LoanStatus::Returned`], and never precedes `borrowed_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowRecord {
  pub record_id:   Uuid,
  pub book_id:     Uuid,
  /// Denormalised from the catalog at issue time.
  pub title:       String,
  pub author:      String,
  /// Foreign key to the borrowing [`crate::profile::StudentProfile`].
  pub profile_id:  Uuid,
  pub borrowed_at: DateTime<Utc>,
  pub due_at:      DateTime<Utc>,
  pub returned_at: Option<DateTime<Utc>>,
  pub status:      LoanStatus,
}

impl BorrowRecord {
  /// Check the `returned_at`/`status` invariant.
  pub fn is_consistent(&self) -> bool {
    match (self.status, self.returned_at) {
      (LoanStatus::Returned, Some(at)) => at >= self.borrowed_at,
      (LoanStatus::Borrowed, None) => true,
      _ => false,
    }
  }
}

// ─── Derived view ────────────────────────────────────────────────────────────

/// An outstanding loan with its display-time overdue flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveLoan {
  pub record:  BorrowRecord,
  /// True iff `record.due_at` was in the past at evaluation time. Pure
  /// presentation state; recomputed on every view because "now" moves.
  pub overdue: bool,
}

/// The computed read model of a profile's loans — never stored, always
/// derived from fresh records and the evaluation clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanView {
  pub active:   Vec<ActiveLoan>,
  pub returned: Vec<BorrowRecord>,
  /// The instant `overdue` was evaluated at.
  pub as_of:    DateTime<Utc>,
}

impl LoanView {
  /// Partition `records` by status and flag each outstanding loan whose due
  /// date has passed `now`. Input ordering is preserved within each
  /// partition.
  pub fn partition(records: Vec<BorrowRecord>, now: DateTime<Utc>) -> Self {
    let mut active = Vec::new();
    let mut returned = Vec::new();

    for record in records {
      match record.status {
        LoanStatus::Borrowed => {
          let overdue = record.due_at < now;
          active.push(ActiveLoan { record, overdue });
        }
        LoanStatus::Returned => returned.push(record),
      }
    }

    Self { active, returned, as_of: now }
  }

  /// Outstanding loans past their due date.
  pub fn overdue_count(&self) -> usize {
    self.active.iter().filter(|l| l.overdue).count()
  }
}
