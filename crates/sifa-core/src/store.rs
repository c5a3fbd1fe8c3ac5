//! The `ClinicStore` trait — the repository surface the UI consumes.
//!
//! The trait is implemented by storage backends (e.g. `sifa-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.
//!
//! All operations are single-shot async calls: the backend owns one
//! process-wide connection and serializes work on it. Multi-statement
//! writes are atomic per operation; nothing spans two calls.

use std::future::Future;

use crate::{
  core_issues::CoreIssues,
  patient::{NewPatient, Patient, PatientSummary},
  progress::{NewTrackedIssue, TrackedIssue},
  schedule::{EventStatus, NewScheduleEvent, ScheduleEvent},
  session::{NewSession, Session},
  user::User,
};

/// Abstraction over the clinic's embedded store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ClinicStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Auth ──────────────────────────────────────────────────────────────

  /// Equality-match a credential pair against the users table.
  /// `None` means no matching user.
  fn verify_user<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Patients ──────────────────────────────────────────────────────────

  /// List `{id, name, phone, reason, created_at}` projections, newest
  /// first. Never loads children.
  fn list_patients(
    &self,
  ) -> impl Future<Output = Result<Vec<PatientSummary>, Self::Error>> + Send + '_;

  /// Load the full nested aggregate. Returns `None` if the patient does
  /// not exist; a missing core-issues row is synthesized with defaults.
  fn get_patient(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Patient>, Self::Error>> + Send + '_;

  /// Validate required fields, insert the patient with its kid rows and a
  /// default core-issues row, and return the generated id so the caller
  /// can navigate straight to the detail view.
  fn create_patient(
    &self,
    input: NewPatient,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Overwrite all scalar fields and replace the entire kid set. Core
  /// issues, sessions, and tracked issues are untouched — they have their
  /// own operations.
  fn update_patient(
    &self,
    id: i64,
    input: NewPatient,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete the patient row; the storage engine cascades deletion to all
  /// owned children.
  fn delete_patient(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Upsert the 1:1 core-issues record: ensure the row exists, then apply
  /// the full update. Never fails for a missing row, never creates two.
  fn update_core_issues(
    &self,
    patient_id: i64,
    issues: CoreIssues,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn add_session(
    &self,
    patient_id: i64,
    input: NewSession,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  fn update_session(
    &self,
    id: i64,
    input: NewSession,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_session(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Tracked issues ────────────────────────────────────────────────────

  fn add_tracked_issue(
    &self,
    patient_id: i64,
    input: NewTrackedIssue,
  ) -> impl Future<Output = Result<TrackedIssue, Self::Error>> + Send + '_;

  fn update_tracked_issue(
    &self,
    id: i64,
    input: NewTrackedIssue,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_tracked_issue(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Schedule ──────────────────────────────────────────────────────────

  /// All events ordered by `time` ascending (lexicographic on the stored
  /// string).
  fn list_schedule(
    &self,
  ) -> impl Future<Output = Result<Vec<ScheduleEvent>, Self::Error>> + Send + '_;

  fn add_schedule_event(
    &self,
    input: NewScheduleEvent,
  ) -> impl Future<Output = Result<ScheduleEvent, Self::Error>> + Send + '_;

  fn set_event_status(
    &self,
    id: i64,
    status: EventStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_schedule_event(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
