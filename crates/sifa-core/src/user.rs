//! The clinician credential record.

use serde::{Deserialize, Serialize};

/// A row in the `users` table, minus the credential itself — verification
/// returns who matched, never the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       i64,
  pub username: String,
}
