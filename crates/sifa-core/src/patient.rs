//! Patient — the aggregate root of the clinic store.
//!
//! A patient exclusively owns its kids, core-issues checklist, sessions,
//! and tracked issues; deleting a patient removes all four. List screens
//! consume [`PatientSummary`] so the full aggregate is only assembled for
//! the detail view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  core_issues::CoreIssues,
  progress::{TrackedIssue, average_progress},
  session::Session,
};

// ─── Kids ────────────────────────────────────────────────────────────────────

/// One child of a patient.
///
/// Kid rows are fully replaced on every patient write, so they carry no
/// identity of their own across edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kid {
  /// Open string, conventionally `"Male"` / `"Female"`.
  #[serde(default)]
  pub sex: String,
  pub age: Option<i64>,
}

impl Kid {
  /// Form rows left entirely blank are dropped rather than stored.
  pub fn is_blank(&self) -> bool {
    self.sex.is_empty() && self.age.is_none()
  }
}

// ─── Intake fields ───────────────────────────────────────────────────────────

/// The scalar intake fields of a patient, shared by create and update.
///
/// List-typed fields are JSON-encoded into single columns by the storage
/// backend; callers only ever see them as vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientIntake {
  pub full_name:    String,
  pub phone_number: String,
  pub age:          Option<i64>,
  pub place:        Option<String>,
  pub father_name:  Option<String>,

  pub school_class_studied:  Option<String>,
  pub madrasa_class_studied: Option<String>,

  #[serde(default)]
  pub is_married:   bool,
  pub husband_name: Option<String>,
  pub husband_job:  Option<String>,

  #[serde(default)]
  pub is_working:   bool,
  #[serde(default)]
  pub has_siblings: bool,
  #[serde(default)]
  pub siblings_have_issues: bool,

  /// The presenting issue, shown on list screens next to the name.
  pub core_reason:     Option<String>,
  pub when_it_started: Option<String>,

  /// Provider categories the patient sought help from before intake.
  #[serde(default)]
  pub previously_sought_help:       Vec<String>,
  pub previously_sought_help_other: Option<String>,

  pub medicine_status:   Option<String>,
  pub other_medications: Option<String>,
  pub other_diseases:    Option<String>,
  pub years_on_medicine: Option<i64>,

  #[serde(default)]
  pub is_genetic:            bool,
  pub genetic_relative_name: Option<String>,

  pub job_field: Option<String>,

  /// Practitioner names per provider category; each category may hold
  /// several names.
  #[serde(default)]
  pub psychologist_names: Vec<String>,
  #[serde(default)]
  pub psychiatrist_names: Vec<String>,
  #[serde(default)]
  pub spiritual_names:    Vec<String>,
  #[serde(default)]
  pub homeopathy_names:   Vec<String>,
  #[serde(default)]
  pub ayurveda_names:     Vec<String>,
  #[serde(default)]
  pub unani_names:        Vec<String>,
}

impl PatientIntake {
  /// Required-field check applied before any patient write.
  pub fn validate(&self) -> Result<()> {
    if self.full_name.trim().is_empty() {
      return Err(Error::MissingField("full_name"));
    }
    if self.phone_number.trim().is_empty() {
      return Err(Error::MissingField("phone_number"));
    }
    Ok(())
  }
}

// ─── NewPatient ──────────────────────────────────────────────────────────────

/// Input to `create_patient` / `update_patient`.
///
/// There is no `kids_count` here: the store derives the counter from the
/// kid entries it actually keeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPatient {
  #[serde(flatten)]
  pub intake: PatientIntake,
  #[serde(default)]
  pub kids:   Vec<Kid>,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// The projection used by list and search screens. Never carries children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSummary {
  pub id:           i64,
  pub full_name:    String,
  pub phone_number: String,
  pub core_reason:  Option<String>,
  pub created_at:   DateTime<Utc>,
}

/// The full nested aggregate assembled by `get_patient`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
  pub id:         i64,
  pub created_at: DateTime<Utc>,

  #[serde(flatten)]
  pub intake: PatientIntake,

  /// Denormalized kid counter; the store recomputes it on every write so
  /// it always equals `kids.len()`.
  pub kids_count: i64,

  pub kids:           Vec<Kid>,
  pub core_issues:    CoreIssues,
  /// Ordered by date, newest first.
  pub sessions:       Vec<Session>,
  pub tracked_issues: Vec<TrackedIssue>,
}

impl Patient {
  /// Aggregate cure progress across this patient's tracked issues.
  pub fn average_progress(&self) -> i64 {
    average_progress(&self.tracked_issues)
  }
}
