//! [`MemoryBackend`] — the in-memory implementation of [`LibraryBackend`].

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use shelf_core::{
  backend::{LibraryBackend, SessionEvent},
  book::Book,
  loan::BorrowRecord,
  profile::{NewStudentProfile, StudentProfile},
  session::{Identity, Session},
};

use crate::{Error, Result, seed};

/// Notification channel capacity. Subscribers that fall further behind than
/// this observe a `Lagged` error and resynchronise from the next event.
const NOTIFY_CAPACITY: usize = 16;

// ─── Tables ──────────────────────────────────────────────────────────────────

/// A registered credential pair and its assigned subject id.
#[derive(Debug, Clone)]
pub(crate) struct Account {
  pub subject_id: Uuid,
  pub email:      String,
  /// Plain text: this backend only emulates the hosted service, which owns
  /// real password storage.
  pub password:   String,
}

#[derive(Default)]
pub(crate) struct Tables {
  pub accounts:         Vec<Account>,
  pub session:          Option<Session>,
  pub profiles:         Vec<StudentProfile>,
  pub records:          Vec<BorrowRecord>,
  pub books:            Vec<Book>,
  pub fail_end_session: bool,
}

// ─── Backend ─────────────────────────────────────────────────────────────────

/// An in-process stand-in for the hosted auth + row-store backend.
///
/// Cloning is cheap — all clones share the same tables and notification
/// channel. The table lock is never held across an await or a notification
/// send.
#[derive(Clone)]
pub struct MemoryBackend {
  inner:  Arc<Mutex<Tables>>,
  notify: broadcast::Sender<SessionEvent>,
  ttl:    Duration,
}

impl MemoryBackend {
  /// An empty backend with a one-hour session lifetime.
  pub fn new() -> Self {
    Self::with_tables(Tables::default(), Duration::hours(1))
  }

  /// A backend pre-loaded with the demo dataset: the eight-book catalog,
  /// three student accounts (`STU001`–`STU003`, password `secret`), and
  /// their loans.
  pub fn seeded() -> Self {
    Self::with_tables(seed::demo_tables(), Duration::hours(1))
  }

  /// Override the session lifetime (mainly for expiry tests).
  pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  fn with_tables(tables: Tables, ttl: Duration) -> Self {
    let (notify, _) = broadcast::channel(NOTIFY_CAPACITY);
    Self { inner: Arc::new(Mutex::new(tables)), notify, ttl }
  }

  fn lock(&self) -> MutexGuard<'_, Tables> {
    // Table mutations never panic, so the lock cannot be poisoned.
    self.inner.lock().expect("backend table lock poisoned")
  }

  fn open_session(&self, tables: &mut Tables, subject_id: Uuid, email: &str) -> Session {
    let session = Session {
      token:      Uuid::new_v4().to_string(),
      identity:   Identity { subject_id, email: to_lower(email) },
      expires_at: Utc::now() + self.ttl,
    };
    tables.session = Some(session.clone());
    session
  }

  fn publish(&self, event: SessionEvent) {
    // No subscribers is fine; ignore the send result.
    let _ = self.notify.send(event);
  }

  // ── Test & ops hooks ──────────────────────────────────────────────────

  /// Make the next [`end_session`](LibraryBackend::end_session) call fail
  /// without clearing the remote session.
  pub fn fail_next_end_session(&self) {
    self.lock().fail_end_session = true;
  }

  /// Drop the current session and emit the expiry notification, as the
  /// hosted service does when a token lapses.
  pub fn expire_session(&self) {
    let expired = self.lock().session.take();
    if expired.is_some() {
      self.publish(None);
    }
  }
}

impl Default for MemoryBackend {
  fn default() -> Self {
    Self::new()
  }
}

fn to_lower(email: &str) -> String {
  email.trim().to_ascii_lowercase()
}

// ─── LibraryBackend impl ─────────────────────────────────────────────────────

impl LibraryBackend for MemoryBackend {
  type Error = Error;

  // ── Authentication ────────────────────────────────────────────────────

  async fn authenticate(&self, email: &str, password: &str) -> Result<Session> {
    let session = {
      let mut tables = self.lock();
      let account = tables
        .accounts
        .iter()
        .find(|a| a.email == to_lower(email) && a.password == password)
        .cloned()
        .ok_or(Error::InvalidCredentials)?;
      self.open_session(&mut tables, account.subject_id, &account.email)
    };
    self.publish(Some(session.clone()));
    Ok(session)
  }

  async fn register(&self, email: &str, password: &str) -> Result<Session> {
    let session = {
      let mut tables = self.lock();
      let email = to_lower(email);
      if tables.accounts.iter().any(|a| a.email == email) {
        return Err(Error::EmailTaken(email));
      }
      let account = Account {
        subject_id: Uuid::new_v4(),
        email:      email.clone(),
        password:   password.to_owned(),
      };
      let subject_id = account.subject_id;
      tables.accounts.push(account);
      self.open_session(&mut tables, subject_id, &email)
    };
    self.publish(Some(session.clone()));
    Ok(session)
  }

  async fn end_session(&self) -> Result<()> {
    let ended = {
      let mut tables = self.lock();
      if tables.fail_end_session {
        tables.fail_end_session = false;
        return Err(Error::Unavailable("session termination"));
      }
      tables.session.take()
    };
    if ended.is_some() {
      self.publish(None);
    }
    Ok(())
  }

  async fn current_session(&self) -> Result<Option<Session>> {
    Ok(self.lock().session.clone())
  }

  fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
    self.notify.subscribe()
  }

  // ── Profiles ──────────────────────────────────────────────────────────

  async fn insert_profile(&self, profile: NewStudentProfile) -> Result<StudentProfile> {
    let mut tables = self.lock();

    if tables.profiles.iter().any(|p| p.subject_id == profile.subject_id) {
      return Err(Error::ProfileExists(profile.subject_id));
    }
    if tables.profiles.iter().any(|p| p.student_id == profile.student_id) {
      return Err(Error::DuplicateStudentId(profile.student_id));
    }

    let now = Utc::now();
    let row = StudentProfile {
      profile_id: Uuid::new_v4(),
      subject_id: profile.subject_id,
      full_name:  profile.full_name,
      student_id: profile.student_id,
      email:      to_lower(&profile.email),
      phone:      profile.phone,
      created_at: now,
      updated_at: now,
    };
    tables.profiles.push(row.clone());
    Ok(row)
  }

  async fn profile_by_subject(&self, subject_id: Uuid) -> Result<Option<StudentProfile>> {
    Ok(
      self
        .lock()
        .profiles
        .iter()
        .find(|p| p.subject_id == subject_id)
        .cloned(),
    )
  }

  // ── Loans & catalog ───────────────────────────────────────────────────

  async fn borrow_records(&self, profile_id: Uuid) -> Result<Vec<BorrowRecord>> {
    let mut records: Vec<BorrowRecord> = self
      .lock()
      .records
      .iter()
      .filter(|r| r.profile_id == profile_id)
      .cloned()
      .collect();
    records.sort_by(|a, b| b.borrowed_at.cmp(&a.borrowed_at));
    Ok(records)
  }

  async fn list_books(&self) -> Result<Vec<Book>> {
    Ok(self.lock().books.clone())
  }
}
