//! Clinical sessions — dated visit logs owned by a patient.

use serde::{Deserialize, Serialize};

/// A persisted session. Unlike kid rows, sessions keep a stable id and are
/// edited and deleted individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub id:    i64,
  pub title: String,
  /// ISO-style `YYYY-MM-DD`; session lists sort on it lexicographically.
  pub date:  String,
  pub log:   String,
  pub progress_note: String,
}

/// Input to `add_session` / `update_session`.
///
/// Non-empty `title` and `date` are the caller layer's responsibility; the
/// store writes what it is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSession {
  pub title: String,
  pub date:  String,
  #[serde(default)]
  pub log:   String,
  #[serde(default)]
  pub progress_note: String,
}
