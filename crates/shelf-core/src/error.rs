//! Error types for `shelf-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required input field was missing or blank. Raised before any remote
  /// call is issued.
  #[error("missing required field: {field}")]
  Validation { field: &'static str },

  /// The remote identity was created but the profile insert failed. The
  /// account is registered but has no profile until reconciled.
  #[error("profile creation failed: {0}")]
  ProfileCreation(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// An operation was attempted that requires a resolved student profile.
  #[error("no authenticated student profile")]
  NotAuthenticated,

  /// Any failure reported by the backend client.
  #[error("backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend-specific error for transport across the trait seam.
  pub fn backend<E>(source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Backend(Box::new(source))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
