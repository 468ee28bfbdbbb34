//! Session and identity — the authentication-side view of a user.
//!
//! Both are owned by the backend: the session manager only holds read-only
//! cached copies, replaced wholesale whenever the backend reports a session
//! transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The minimal authenticated principal. Exists only while a session exists;
/// 1:1 with [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  /// Stable subject id assigned by the backend at registration.
  pub subject_id: Uuid,
  pub email:      String,
}

/// A short-lived authenticated credential bound to an [`Identity`].
///
/// Created on successful authentication or registration, replaced on token
/// refresh, cleared on sign-out or expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  /// Opaque token; the backend alone interprets it.
  pub token:      String,
  pub identity:   Identity,
  pub expires_at: DateTime<Utc>,
}
