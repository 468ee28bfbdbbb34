//! [`SessionManager`] — the authentication state machine.
//!
//! The manager mirrors the backend's session into local state and reconciles
//! it with the application-level student profile. Identity updates apply
//! immediately when a session-change notification arrives; the matching
//! profile lookup is deferred to a freshly spawned task, never issued from
//! the notification delivery frame (the backend client forbids re-entrant
//! calls from its own callback stack).
//!
//! Every in-flight profile fetch is keyed by the subject id it was issued
//! for; a completion whose subject is no longer current is discarded. No
//! cancellation primitive is needed beyond that check.

use std::sync::Arc;

use tokio::sync::{broadcast::error::RecvError, watch};
use tracing::{debug, warn};
use uuid::Uuid;

use shelf_core::{
  Error, Result,
  backend::LibraryBackend,
  profile::{NewStudentProfile, Registration, StudentProfile},
  session::{Identity, Session},
};

// ─── Published state ─────────────────────────────────────────────────────────

/// The manager's state as seen by consumers, published through a watch
/// channel on every transition.
#[derive(Debug, Clone)]
pub struct AuthSnapshot {
  /// Read-only cached copy of the backend session.
  pub session:   Option<Session>,
  pub identity:  Option<Identity>,
  pub profile:   Option<StudentProfile>,
  /// True until the first of {initial session check, first notification}
  /// completes. While set, `profile` is not authoritative.
  pub resolving: bool,
}

impl AuthSnapshot {
  fn initial() -> Self {
    Self { session: None, identity: None, profile: None, resolving: true }
  }

  pub fn subject_id(&self) -> Option<Uuid> {
    self.identity.as_ref().map(|i| i.subject_id)
  }

  pub fn phase(&self) -> AuthPhase {
    if self.resolving {
      return AuthPhase::Unknown;
    }
    match (&self.identity, &self.profile) {
      (None, _) => AuthPhase::Anonymous,
      (Some(_), None) => AuthPhase::AuthenticatedNoProfile,
      (Some(_), Some(_)) => AuthPhase::AuthenticatedWithProfile,
    }
  }
}

/// Where the state machine currently stands. There is no terminal phase; the
/// machine cycles between `Anonymous` and the authenticated phases for the
/// lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
  /// Before the first session check completes.
  Unknown,
  /// No session.
  Anonymous,
  /// Session present, profile not yet resolved or absent (this is also the
  /// partial-registration state).
  AuthenticatedNoProfile,
  /// Session present and profile resolved.
  AuthenticatedWithProfile,
}

// ─── Manager ─────────────────────────────────────────────────────────────────

/// Owns the current identity and student profile. Cheap to clone; all clones
/// share the same state.
pub struct SessionManager<B: LibraryBackend> {
  backend: Arc<B>,
  state:   watch::Sender<AuthSnapshot>,
}

impl<B: LibraryBackend> Clone for SessionManager<B> {
  fn clone(&self) -> Self {
    Self { backend: Arc::clone(&self.backend), state: self.state.clone() }
  }
}

impl<B: LibraryBackend + 'static> SessionManager<B> {
  /// Attach a manager to `backend`: subscribe to session notifications,
  /// then resolve any session that already existed at attach time.
  ///
  /// Subscription happens before the initial check so that no transition
  /// falls between the two. The subscription alone is not enough — the
  /// backend does not replay a pre-existing session to a fresh subscriber.
  pub fn attach(backend: Arc<B>) -> Self {
    let (state, _) = watch::channel(AuthSnapshot::initial());
    let manager = Self { backend, state };

    let mut events = manager.backend.subscribe();
    let listener = manager.clone();
    tokio::spawn(async move {
      loop {
        match events.recv().await {
          Ok(event) => listener.apply_session(event),
          Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "session notifications lagged");
          }
          Err(RecvError::Closed) => break,
        }
      }
    });

    let startup = manager.clone();
    tokio::spawn(async move {
      match startup.backend.current_session().await {
        Ok(session) => startup.apply_initial(session),
        Err(e) => {
          // Degrade to a visible anonymous state rather than spinning on
          // "resolving" forever.
          warn!(error = %e, "initial session check failed");
          startup.apply_initial(None);
        }
      }
    });

    manager
  }

  // ── Operations ────────────────────────────────────────────────────────

  /// Sign up a new student: create the backend identity, then its profile
  /// row keyed by the returned subject id.
  ///
  /// Validation failures never reach the backend. A profile-insert failure
  /// after a successful identity creation is reported as
  /// [`Error::ProfileCreation`] and leaves the machine in
  /// [`AuthPhase::AuthenticatedNoProfile`]; the remote identity is not
  /// rolled back.
  pub async fn register(&self, registration: Registration) -> Result<()> {
    registration.validate()?;

    let session = self
      .backend
      .register(&registration.email, &registration.password)
      .await
      .map_err(Error::backend)?;

    let row = self
      .backend
      .insert_profile(NewStudentProfile {
        subject_id: session.identity.subject_id,
        full_name:  registration.full_name,
        student_id: registration.student_id,
        email:      registration.email,
        phone:      registration.phone,
      })
      .await
      .map_err(|e| Error::ProfileCreation(Box::new(e)))?;

    // The sign-up notification may have fetched the profile before the row
    // existed; install it directly if this subject is still current.
    self.install_profile(row.subject_id, Some(row.clone()));
    Ok(())
  }

  /// Sign in. On success the session-change notification drives the state
  /// transition; on failure nothing changes.
  pub async fn login(&self, email: &str, password: &str) -> Result<()> {
    self
      .backend
      .authenticate(email, password)
      .await
      .map_err(Error::backend)?;
    Ok(())
  }

  /// Sign out: best-effort remote termination, authoritative local clear.
  /// Local identity and profile are gone when this returns, whatever the
  /// backend said.
  pub async fn logout(&self) {
    if let Err(e) = self.backend.end_session().await {
      warn!(error = %e, "remote sign-out failed; clearing local state anyway");
    }
    self.state.send_modify(|snap| {
      snap.session = None;
      snap.identity = None;
      snap.profile = None;
      snap.resolving = false;
    });
  }

  // ── Consumer surface ──────────────────────────────────────────────────

  /// The current state. Not authoritative while `resolving` is set.
  pub fn snapshot(&self) -> AuthSnapshot {
    self.state.borrow().clone()
  }

  pub fn phase(&self) -> AuthPhase {
    self.state.borrow().phase()
  }

  /// Watch every state transition. The receiver starts at the current
  /// snapshot.
  pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
    self.state.subscribe()
  }

  // ── Transitions ───────────────────────────────────────────────────────

  /// Apply a session-change notification: identity immediately, profile via
  /// a deferred keyed fetch.
  fn apply_session(&self, session: Option<Session>) {
    let identity = session.as_ref().map(|s| s.identity.clone());
    let subject = identity.as_ref().map(|i| i.subject_id);

    self.state.send_modify(|snap| {
      if snap.subject_id() != subject {
        // The profile belongs to the previous subject; never show it
        // against the new identity.
        snap.profile = None;
      }
      snap.session = session.clone();
      snap.identity = identity.clone();
      snap.resolving = false;
    });

    if let Some(subject_id) = subject {
      self.spawn_profile_fetch(subject_id);
    }
  }

  /// Apply the startup `current_session` result, unless a notification got
  /// there first — once the notification stream has spoken it is
  /// authoritative.
  fn apply_initial(&self, session: Option<Session>) {
    let mut fetch = None;
    self.state.send_if_modified(|snap| {
      if !snap.resolving {
        return false;
      }
      snap.session = session.clone();
      snap.identity = session.as_ref().map(|s| s.identity.clone());
      snap.resolving = false;
      fetch = snap.subject_id();
      true
    });

    if let Some(subject_id) = fetch {
      self.spawn_profile_fetch(subject_id);
    }
  }

  /// Resolve the profile for `subject_id` on the next scheduling turn.
  ///
  /// Runs as its own task so the lookup never happens inside the
  /// notification delivery frame. The result is installed only if the
  /// subject is still current when it lands.
  fn spawn_profile_fetch(&self, subject_id: Uuid) {
    let manager = self.clone();
    tokio::spawn(async move {
      match manager.backend.profile_by_subject(subject_id).await {
        Ok(profile) => manager.install_profile(subject_id, profile),
        Err(e) => {
          // Non-fatal: the consumer sees an authenticated identity with no
          // profile and renders accordingly.
          warn!(%subject_id, error = %e, "profile fetch failed");
        }
      }
    });
  }

  /// Install a fetched profile, discarding it if `subject_id` is no longer
  /// the current identity. A missing row never overwrites a resolved
  /// profile — the profile was already cleared when the subject changed.
  fn install_profile(&self, subject_id: Uuid, mut profile: Option<StudentProfile>) {
    self.state.send_if_modified(|snap| {
      if snap.subject_id() != Some(subject_id) {
        debug!(%subject_id, "discarding stale profile fetch");
        return false;
      }
      match profile.take() {
        Some(row) => {
          snap.profile = Some(row);
          true
        }
        None => false,
      }
    });
  }
}
