//! The `LibraryBackend` trait — the capability surface of the hosted backend.
//!
//! The trait is implemented by concrete backends (e.g. `shelf-backend-mem`).
//! Higher layers (`shelf-session`, the CLI) depend on this abstraction, not
//! on any concrete backend. The real service owns authorization, password
//! storage, and persistence; none of that leaks through this surface.

use std::future::Future;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
  book::Book,
  loan::BorrowRecord,
  profile::{NewStudentProfile, StudentProfile},
  session::Session,
};

/// A session-change notification: the new session, or `None` on sign-out and
/// expiry.
pub type SessionEvent = Option<Session>;

/// Abstraction over the hosted authentication + row-store backend.
///
/// All methods return `Send` futures so the trait can be used from spawned
/// tasks on a multi-threaded runtime.
///
/// Re-entrancy rule: implementations deliver [`SessionEvent`]s only through
/// the channel returned by [`subscribe`](Self::subscribe), never by calling
/// into subscriber code while internal locks are held. Subscribers in turn
/// must not issue backend calls from the delivery frame; follow-up lookups
/// are scheduled on the next turn of the event loop.
pub trait LibraryBackend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Authentication ────────────────────────────────────────────────────

  /// Exchange credentials for a session. Fires a session-change event on
  /// success.
  fn authenticate<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + 'a;

  /// Create a new identity and sign it in. The returned session embeds the
  /// freshly assigned subject id. Fires a session-change event on success.
  fn register<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + 'a;

  /// Terminate the current session. Best-effort: callers clear their local
  /// state regardless of the outcome.
  fn end_session(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The session that already exists at attach time, if any.
  ///
  /// Needed on startup because [`subscribe`](Self::subscribe) does not
  /// replay a pre-existing session to a fresh subscriber.
  fn current_session(
    &self,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// Subscribe to session transitions: sign-in, sign-out, token refresh,
  /// and expiry.
  fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Insert the student profile row for a newly registered identity.
  fn insert_profile(
    &self,
    profile: NewStudentProfile,
  ) -> impl Future<Output = Result<StudentProfile, Self::Error>> + Send + '_;

  /// Look up the profile keyed by `subject_id`. Returns `None` for an
  /// identity whose registration never completed.
  fn profile_by_subject(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Option<StudentProfile>, Self::Error>> + Send + '_;

  // ── Loans & catalog ───────────────────────────────────────────────────

  /// All borrow records for `profile_id`, ordered by borrow timestamp
  /// descending (most recent first).
  fn borrow_records(
    &self,
    profile_id: Uuid,
  ) -> impl Future<Output = Result<Vec<BorrowRecord>, Self::Error>> + Send + '_;

  /// The full book catalog.
  fn list_books(
    &self,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;
}
