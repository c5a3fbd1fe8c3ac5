//! Error types for `sifa-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field was empty at validation time.
  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("patient not found: {0}")]
  PatientNotFound(i64),

  #[error("session not found: {0}")]
  SessionNotFound(i64),

  #[error("tracked issue not found: {0}")]
  TrackedIssueNotFound(i64),

  #[error("schedule event not found: {0}")]
  EventNotFound(i64),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Whether this error means "the record no longer exists" — callers
  /// navigate away on these instead of showing a failure message.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::PatientNotFound(_)
        | Self::SessionNotFound(_)
        | Self::TrackedIssueNotFound(_)
        | Self::EventNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
