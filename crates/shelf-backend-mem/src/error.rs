//! Error type for `shelf-backend-mem`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("an account already exists for {0}")]
  EmailTaken(String),

  #[error("a profile already exists for subject {0}")]
  ProfileExists(Uuid),

  #[error("student id {0:?} is already registered")]
  DuplicateStudentId(String),

  /// Injected fault, raised by the test hooks.
  #[error("backend unavailable: {0}")]
  Unavailable(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
