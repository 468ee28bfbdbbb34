//! [`LoanService`] — the derived loan view over a profile's borrow records.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use shelf_core::{Error, Result, backend::LibraryBackend, loan::LoanView};

use crate::manager::SessionManager;

/// Builds the active/returned loan view for the currently signed-in student.
///
/// The view is recomputed from fresh records on every call — `overdue`
/// depends on the evaluation clock, so nothing here is cached.
pub struct LoanService<B: LibraryBackend> {
  backend: Arc<B>,
  manager: SessionManager<B>,
}

impl<B: LibraryBackend + 'static> LoanService<B> {
  pub fn new(backend: Arc<B>, manager: SessionManager<B>) -> Self {
    Self { backend, manager }
  }

  /// Fetch and partition the current profile's loans.
  ///
  /// Returns [`Error::NotAuthenticated`] while no profile is resolved (the
  /// operation is disabled in that state), and `Ok(None)` when the signed-in
  /// subject changed while the fetch was in flight — a stale result, dropped
  /// without reaching the user.
  pub async fn current_loans(&self) -> Result<Option<LoanView>> {
    let profile = self
      .manager
      .snapshot()
      .profile
      .ok_or(Error::NotAuthenticated)?;

    let records = self
      .backend
      .borrow_records(profile.profile_id)
      .await
      .map_err(Error::backend)?;

    if self.manager.snapshot().subject_id() != Some(profile.subject_id) {
      debug!(subject_id = %profile.subject_id, "discarding stale loan fetch");
      return Ok(None);
    }

    Ok(Some(LoanView::partition(records, Utc::now())))
  }
}
