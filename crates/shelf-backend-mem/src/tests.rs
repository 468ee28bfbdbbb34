//! Integration tests for `MemoryBackend`.

use shelf_core::{
  backend::LibraryBackend,
  loan::LoanStatus,
  profile::NewStudentProfile,
};
use uuid::Uuid;

use crate::{Error, MemoryBackend};

fn new_profile(subject_id: Uuid, student_id: &str) -> NewStudentProfile {
  NewStudentProfile {
    subject_id,
    full_name: "Dana Test".into(),
    student_id: student_id.into(),
    email: "dana@example.com".into(),
    phone: Some("555-0100".into()),
  }
}

// ─── Authentication ──────────────────────────────────────────────────────────

#[tokio::test]
async fn register_creates_a_session() {
  let b = MemoryBackend::new();

  let session = b.register("dana@example.com", "pw").await.unwrap();
  assert_eq!(session.identity.email, "dana@example.com");

  let current = b.current_session().await.unwrap().unwrap();
  assert_eq!(current.identity.subject_id, session.identity.subject_id);
}

#[tokio::test]
async fn register_duplicate_email_errors() {
  let b = MemoryBackend::new();
  b.register("dana@example.com", "pw").await.unwrap();

  let err = b.register("Dana@Example.com", "other").await.unwrap_err();
  assert!(matches!(err, Error::EmailTaken(_)));
}

#[tokio::test]
async fn authenticate_with_wrong_password_errors() {
  let b = MemoryBackend::new();
  b.register("dana@example.com", "pw").await.unwrap();

  let err = b.authenticate("dana@example.com", "wrong").await.unwrap_err();
  assert!(matches!(err, Error::InvalidCredentials));
}

#[tokio::test]
async fn authenticate_unknown_email_errors() {
  let b = MemoryBackend::new();
  let err = b.authenticate("nobody@example.com", "pw").await.unwrap_err();
  assert!(matches!(err, Error::InvalidCredentials));
}

#[tokio::test]
async fn end_session_clears_the_current_session() {
  let b = MemoryBackend::new();
  b.register("dana@example.com", "pw").await.unwrap();

  b.end_session().await.unwrap();
  assert!(b.current_session().await.unwrap().is_none());
}

#[tokio::test]
async fn injected_end_session_failure_keeps_the_session() {
  let b = MemoryBackend::new();
  b.register("dana@example.com", "pw").await.unwrap();

  b.fail_next_end_session();
  let err = b.end_session().await.unwrap_err();
  assert!(matches!(err, Error::Unavailable(_)));
  assert!(b.current_session().await.unwrap().is_some());

  // The fault is one-shot.
  b.end_session().await.unwrap();
  assert!(b.current_session().await.unwrap().is_none());
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_in_and_sign_out_are_broadcast() {
  let b = MemoryBackend::new();
  let mut rx = b.subscribe();

  let session = b.register("dana@example.com", "pw").await.unwrap();
  let event = rx.recv().await.unwrap();
  assert_eq!(
    event.map(|s| s.identity.subject_id),
    Some(session.identity.subject_id)
  );

  b.end_session().await.unwrap();
  assert!(rx.recv().await.unwrap().is_none());
}

#[tokio::test]
async fn expire_session_notifies_subscribers() {
  let b = MemoryBackend::new();
  b.register("dana@example.com", "pw").await.unwrap();

  let mut rx = b.subscribe();
  b.expire_session();

  assert!(rx.recv().await.unwrap().is_none());
  assert!(b.current_session().await.unwrap().is_none());
}

#[tokio::test]
async fn subscribers_do_not_see_a_pre_existing_session() {
  let b = MemoryBackend::new();
  b.register("dana@example.com", "pw").await.unwrap();

  // Fresh subscription after sign-in: nothing is replayed.
  let mut rx = b.subscribe();
  assert!(matches!(
    rx.try_recv(),
    Err(tokio::sync::broadcast::error::TryRecvError::Empty)
  ));
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_fetch_profile() {
  let b = MemoryBackend::new();
  let session = b.register("dana@example.com", "pw").await.unwrap();
  let subject_id = session.identity.subject_id;

  let inserted = b.insert_profile(new_profile(subject_id, "STU042")).await.unwrap();
  assert_eq!(inserted.subject_id, subject_id);
  assert_eq!(inserted.student_id, "STU042");

  let fetched = b.profile_by_subject(subject_id).await.unwrap().unwrap();
  assert_eq!(fetched.profile_id, inserted.profile_id);
}

#[tokio::test]
async fn profile_missing_returns_none() {
  let b = MemoryBackend::new();
  assert!(b.profile_by_subject(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_student_id_errors() {
  let b = MemoryBackend::new();
  b.insert_profile(new_profile(Uuid::new_v4(), "STU042")).await.unwrap();

  let mut second = new_profile(Uuid::new_v4(), "STU042");
  second.email = "other@example.com".into();
  let err = b.insert_profile(second).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateStudentId(id) if id == "STU042"));
}

#[tokio::test]
async fn second_profile_for_same_subject_errors() {
  let b = MemoryBackend::new();
  let subject_id = Uuid::new_v4();
  b.insert_profile(new_profile(subject_id, "STU042")).await.unwrap();

  let err = b
    .insert_profile(new_profile(subject_id, "STU043"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ProfileExists(id) if id == subject_id));
}

// ─── Loans & catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn seeded_catalog_has_eight_books() {
  let b = MemoryBackend::seeded();
  let books = b.list_books().await.unwrap();
  assert_eq!(books.len(), 8);
  assert!(books.iter().any(|bk| bk.title == "1984" && !bk.available));
}

#[tokio::test]
async fn borrow_records_are_scoped_to_the_profile() {
  let b = MemoryBackend::seeded();
  let session = b.authenticate("alice@example.com", "secret").await.unwrap();
  let profile = b
    .profile_by_subject(session.identity.subject_id)
    .await
    .unwrap()
    .unwrap();

  let records = b.borrow_records(profile.profile_id).await.unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].title, "1984");
  assert_eq!(records[0].status, LoanStatus::Borrowed);
}

#[tokio::test]
async fn borrow_records_are_newest_first() {
  let b = MemoryBackend::seeded();
  let session = b.authenticate("carol@example.com", "secret").await.unwrap();
  let profile = b
    .profile_by_subject(session.identity.subject_id)
    .await
    .unwrap()
    .unwrap();

  let records = b.borrow_records(profile.profile_id).await.unwrap();
  assert!(records.windows(2).all(|w| w[0].borrowed_at >= w[1].borrowed_at));
  assert!(records.iter().all(|r| r.is_consistent()));
}

#[tokio::test]
async fn seeded_returned_loan_is_consistent() {
  let b = MemoryBackend::seeded();
  let session = b.authenticate("carol@example.com", "secret").await.unwrap();
  let profile = b
    .profile_by_subject(session.identity.subject_id)
    .await
    .unwrap()
    .unwrap();

  let records = b.borrow_records(profile.profile_id).await.unwrap();
  let returned = records
    .iter()
    .find(|r| r.status == LoanStatus::Returned)
    .unwrap();
  assert!(returned.returned_at.is_some());
  assert!(returned.is_consistent());
}
