//! Student profile — the application-level record extending an identity.
//!
//! Every identity that has completed registration has exactly one profile,
//! keyed by subject id. An identity without one is in the transient
//! partial-registration state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A student's library record, keyed by the backend subject id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
  pub profile_id: Uuid,
  /// Foreign key to the authentication identity.
  pub subject_id: Uuid,
  pub full_name:  String,
  /// Institution-assigned identifier, e.g. `STU001`. Unique per profile.
  pub student_id: String,
  pub email:      String,
  pub phone:      Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::backend::LibraryBackend::insert_profile`].
/// `profile_id` and the timestamps are always set by the backend.
#[derive(Debug, Clone)]
pub struct NewStudentProfile {
  pub subject_id: Uuid,
  pub full_name:  String,
  pub student_id: String,
  pub email:      String,
  pub phone:      Option<String>,
}

// ─── Registration input ──────────────────────────────────────────────────────

/// The sign-up form payload, validated before any remote call.
#[derive(Debug, Clone)]
pub struct Registration {
  pub email:      String,
  pub password:   String,
  pub full_name:  String,
  pub student_id: String,
  pub phone:      Option<String>,
}

impl Registration {
  /// Check that every required field is non-blank after trimming.
  ///
  /// A failing registration must never reach the backend, so this runs
  /// first in the sign-up flow.
  pub fn validate(&self) -> Result<()> {
    fn required(value: &str, field: &'static str) -> Result<()> {
      if value.trim().is_empty() {
        Err(Error::Validation { field })
      } else {
        Ok(())
      }
    }

    required(&self.email, "email")?;
    required(&self.password, "password")?;
    required(&self.full_name, "full_name")?;
    required(&self.student_id, "student_id")?;
    Ok(())
  }
}
