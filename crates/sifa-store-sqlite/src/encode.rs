//! Encoding and decoding helpers between domain types and the plain-text /
//! integer representations stored in SQLite columns.
//!
//! List-typed fields are stored as compact JSON in single TEXT columns;
//! boolean flags as `0`/`1`. Reads of encoded fields are deliberately
//! lenient — a malformed or legacy value degrades to a usable default
//! instead of failing the whole record.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Row, ToSql};
use serde::Deserialize;
use sifa_core::{
  core_issues::{BeliefEntry, CoreIssues},
  patient::{Kid, Patient, PatientIntake, PatientSummary},
  progress::TrackedIssue,
  schedule::EventStatus,
  session::Session,
};

use crate::{Error, Result};

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// `created_at` is written by SQLite's `datetime('now')` default, which
/// also keeps the column lexicographically sortable.
const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(s, SQLITE_DATETIME)
    .map(|dt| dt.and_utc())
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Boolean flags ───────────────────────────────────────────────────────────

pub fn encode_flag(b: bool) -> i64 { i64::from(b) }

/// `NULL` reads as false.
pub fn decode_flag(v: Option<i64>) -> bool { v.unwrap_or(0) != 0 }

// ─── JSON-encoded lists ──────────────────────────────────────────────────────

/// Encode a list of strings for a single TEXT column; `[]` when empty.
pub fn encode_string_list(list: &[String]) -> Result<String> {
  Ok(serde_json::to_string(list)?)
}

/// Lenient decode: `NULL`, malformed JSON, or a non-list value all read as
/// the empty list, so one corrupt field never blocks the record.
pub fn decode_string_list(s: Option<&str>) -> Vec<String> {
  s.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default()
}

/// Like [`decode_string_list`], but a bare non-JSON string upgrades to a
/// one-element list. The provider-name columns predate the list encoding
/// and may still hold a single plain name.
pub fn decode_name_list(s: Option<&str>) -> Vec<String> {
  let Some(s) = s else { return Vec::new() };
  match serde_json::from_str(s) {
    Ok(list) => list,
    Err(_) if !s.trim().is_empty() => vec![s.to_owned()],
    Err(_) => Vec::new(),
  }
}

// ─── Belief entries ──────────────────────────────────────────────────────────

/// Stored belief element: either the current object form or the legacy
/// bare string, which upgrades to an untitled entry on read.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBelief {
  Entry(BeliefEntry),
  Legacy(String),
}

impl From<StoredBelief> for BeliefEntry {
  fn from(b: StoredBelief) -> Self {
    match b {
      StoredBelief::Entry(e) => e,
      StoredBelief::Legacy(description) => {
        BeliefEntry { title: String::new(), description }
      }
    }
  }
}

pub fn encode_belief_list(list: &[BeliefEntry]) -> Result<String> {
  Ok(serde_json::to_string(list)?)
}

pub fn decode_belief_list(s: Option<&str>) -> Vec<BeliefEntry> {
  s.and_then(|s| serde_json::from_str::<Vec<StoredBelief>>(s).ok())
    .map(|list| list.into_iter().map(BeliefEntry::from).collect())
    .unwrap_or_default()
}

// ─── Schedule status ─────────────────────────────────────────────────────────

pub fn encode_event_status(s: EventStatus) -> &'static str {
  match s {
    EventStatus::Scheduled => "Scheduled",
    EventStatus::Completed => "Completed",
    EventStatus::Canceled => "Canceled",
  }
}

/// Unknown stored values read as `Scheduled` rather than failing the list.
pub fn decode_event_status(s: &str) -> EventStatus {
  match s {
    "Completed" => EventStatus::Completed,
    "Canceled" => EventStatus::Canceled,
    _ => EventStatus::Scheduled,
  }
}

// ─── Write-side helpers ──────────────────────────────────────────────────────

/// Empty text from a form is stored as `NULL`, not as `''`.
fn text_or_null(v: &str) -> Option<String> {
  if v.is_empty() { None } else { Some(v.to_owned()) }
}

fn opt_or_null(v: Option<&str>) -> Option<String> {
  v.and_then(text_or_null)
}

/// Owned, encoded parameter set for writing a `patients` row.
///
/// [`Self::params`] fixes the column order shared by the INSERT and UPDATE
/// statements, so the two can never drift apart.
pub struct EncodedIntake {
  full_name:    String,
  phone_number: String,
  age:          Option<i64>,
  place:        Option<String>,
  father_name:  Option<String>,
  school_class_studied:  Option<String>,
  madrasa_class_studied: Option<String>,
  is_married:   i64,
  husband_name: Option<String>,
  husband_job:  Option<String>,
  kids_count:   i64,
  is_working:   i64,
  has_siblings: i64,
  siblings_have_issues: i64,
  core_reason:     Option<String>,
  when_it_started: Option<String>,
  previously_sought_help:       String,
  previously_sought_help_other: Option<String>,
  medicine_status:   Option<String>,
  other_medications: Option<String>,
  other_diseases:    Option<String>,
  is_genetic:            i64,
  genetic_relative_name: Option<String>,
  job_field: Option<String>,
  psychologist_name: String,
  psychiatrist_name: String,
  spiritual_name:    String,
  homeopathy_name:   String,
  ayurveda_name:     String,
  unani_name:        String,
  years_on_medicine: Option<i64>,
}

impl EncodedIntake {
  /// `kids_count` is passed in by the store, derived from the kid rows it
  /// actually keeps — the caller-side counter is never trusted.
  pub fn new(intake: &PatientIntake, kids_count: i64) -> Result<Self> {
    Ok(Self {
      full_name:    intake.full_name.clone(),
      phone_number: intake.phone_number.clone(),
      age:          intake.age,
      place:        opt_or_null(intake.place.as_deref()),
      father_name:  opt_or_null(intake.father_name.as_deref()),
      school_class_studied: opt_or_null(intake.school_class_studied.as_deref()),
      madrasa_class_studied: opt_or_null(intake.madrasa_class_studied.as_deref()),
      is_married:   encode_flag(intake.is_married),
      husband_name: opt_or_null(intake.husband_name.as_deref()),
      husband_job:  opt_or_null(intake.husband_job.as_deref()),
      kids_count,
      is_working:   encode_flag(intake.is_working),
      has_siblings: encode_flag(intake.has_siblings),
      siblings_have_issues: encode_flag(intake.siblings_have_issues),
      core_reason:     opt_or_null(intake.core_reason.as_deref()),
      when_it_started: opt_or_null(intake.when_it_started.as_deref()),
      previously_sought_help: encode_string_list(&intake.previously_sought_help)?,
      previously_sought_help_other: opt_or_null(
        intake.previously_sought_help_other.as_deref(),
      ),
      medicine_status:   opt_or_null(intake.medicine_status.as_deref()),
      other_medications: opt_or_null(intake.other_medications.as_deref()),
      other_diseases:    opt_or_null(intake.other_diseases.as_deref()),
      is_genetic:            encode_flag(intake.is_genetic),
      genetic_relative_name: opt_or_null(intake.genetic_relative_name.as_deref()),
      job_field: opt_or_null(intake.job_field.as_deref()),
      psychologist_name: encode_string_list(&intake.psychologist_names)?,
      psychiatrist_name: encode_string_list(&intake.psychiatrist_names)?,
      spiritual_name:    encode_string_list(&intake.spiritual_names)?,
      homeopathy_name:   encode_string_list(&intake.homeopathy_names)?,
      ayurveda_name:     encode_string_list(&intake.ayurveda_names)?,
      unani_name:        encode_string_list(&intake.unani_names)?,
      years_on_medicine: intake.years_on_medicine,
    })
  }

  /// Parameters `?1..?31`, in the column order of the patient INSERT and
  /// UPDATE statements.
  pub fn params(&self) -> [&dyn ToSql; 31] {
    [
      &self.full_name,
      &self.phone_number,
      &self.age,
      &self.place,
      &self.father_name,
      &self.school_class_studied,
      &self.madrasa_class_studied,
      &self.is_married,
      &self.husband_name,
      &self.husband_job,
      &self.kids_count,
      &self.is_working,
      &self.has_siblings,
      &self.siblings_have_issues,
      &self.core_reason,
      &self.when_it_started,
      &self.previously_sought_help,
      &self.previously_sought_help_other,
      &self.medicine_status,
      &self.other_medications,
      &self.other_diseases,
      &self.is_genetic,
      &self.genetic_relative_name,
      &self.job_field,
      &self.psychologist_name,
      &self.psychiatrist_name,
      &self.spiritual_name,
      &self.homeopathy_name,
      &self.ayurveda_name,
      &self.unani_name,
      &self.years_on_medicine,
    ]
  }
}

/// Owned, encoded parameter set for updating a `core_issues` row.
pub struct EncodedCoreIssues {
  is_about_belief: i64,
  belief_types:    String,
  niyyath_related:      String,
  wudu_niyyath_time:    Option<String>,
  namaz_niyyath_time:   Option<String>,
  ghusl_niyyath_time:   Option<String>,
  fasting_niyyath_time: Option<String>,
  najas_related:      String,
  urination_time:     Option<String>,
  motion_time:        Option<String>,
  ghusl_najas_time:   Option<String>,
  normal_bath_time:   Option<String>,
  hand_washing_time:  Option<String>,
  dress_washing_time: Option<String>,
  dog_related:          i64,
  pig_related:          i64,
  over_soaping:         i64,
  insects_related:      i64,
  gas_locking_related:  i64,
  fear_of_death:        i64,
  fear_of_disease:      i64,
  door_locking_related: i64,
  wudu_time:    Option<String>,
  namaz_time:   Option<String>,
  other_issues: Option<String>,
}

impl EncodedCoreIssues {
  pub fn new(issues: &CoreIssues) -> Result<Self> {
    Ok(Self {
      is_about_belief: encode_flag(issues.is_about_belief),
      belief_types:    encode_belief_list(&issues.belief_types)?,
      niyyath_related:      encode_string_list(&issues.niyyath_related)?,
      wudu_niyyath_time:    text_or_null(&issues.wudu_niyyath_time),
      namaz_niyyath_time:   text_or_null(&issues.namaz_niyyath_time),
      ghusl_niyyath_time:   text_or_null(&issues.ghusl_niyyath_time),
      fasting_niyyath_time: text_or_null(&issues.fasting_niyyath_time),
      najas_related:      encode_string_list(&issues.najas_related)?,
      urination_time:     text_or_null(&issues.urination_time),
      motion_time:        text_or_null(&issues.motion_time),
      ghusl_najas_time:   text_or_null(&issues.ghusl_najas_time),
      normal_bath_time:   text_or_null(&issues.normal_bath_time),
      hand_washing_time:  text_or_null(&issues.hand_washing_time),
      dress_washing_time: text_or_null(&issues.dress_washing_time),
      dog_related:          encode_flag(issues.dog_related),
      pig_related:          encode_flag(issues.pig_related),
      over_soaping:         encode_flag(issues.over_soaping),
      insects_related:      encode_flag(issues.insects_related),
      gas_locking_related:  encode_flag(issues.gas_locking_related),
      fear_of_death:        encode_flag(issues.fear_of_death),
      fear_of_disease:      encode_flag(issues.fear_of_disease),
      door_locking_related: encode_flag(issues.door_locking_related),
      wudu_time:    text_or_null(&issues.wudu_time),
      namaz_time:   text_or_null(&issues.namaz_time),
      other_issues: text_or_null(&issues.other_issues),
    })
  }

  /// Parameters `?1..?25`, in the column order of the core-issues UPDATE
  /// statement.
  pub fn params(&self) -> [&dyn ToSql; 25] {
    [
      &self.is_about_belief,
      &self.belief_types,
      &self.niyyath_related,
      &self.wudu_niyyath_time,
      &self.namaz_niyyath_time,
      &self.ghusl_niyyath_time,
      &self.fasting_niyyath_time,
      &self.najas_related,
      &self.urination_time,
      &self.motion_time,
      &self.ghusl_najas_time,
      &self.normal_bath_time,
      &self.hand_washing_time,
      &self.dress_washing_time,
      &self.dog_related,
      &self.pig_related,
      &self.over_soaping,
      &self.insects_related,
      &self.gas_locking_related,
      &self.fear_of_death,
      &self.fear_of_disease,
      &self.door_locking_related,
      &self.wudu_time,
      &self.namaz_time,
      &self.other_issues,
    ]
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw column values read from a `patients` row, in the shared column
/// order (`id` first, `created_at` last).
pub struct RawPatient {
  pub id: i64,
  pub full_name:    String,
  pub phone_number: String,
  pub age:          Option<i64>,
  pub place:        Option<String>,
  pub father_name:  Option<String>,
  pub school_class_studied:  Option<String>,
  pub madrasa_class_studied: Option<String>,
  pub is_married:   Option<i64>,
  pub husband_name: Option<String>,
  pub husband_job:  Option<String>,
  pub kids_count:   Option<i64>,
  pub is_working:   Option<i64>,
  pub has_siblings: Option<i64>,
  pub siblings_have_issues: Option<i64>,
  pub core_reason:     Option<String>,
  pub when_it_started: Option<String>,
  pub previously_sought_help:       Option<String>,
  pub previously_sought_help_other: Option<String>,
  pub medicine_status:   Option<String>,
  pub other_medications: Option<String>,
  pub other_diseases:    Option<String>,
  pub is_genetic:            Option<i64>,
  pub genetic_relative_name: Option<String>,
  pub job_field: Option<String>,
  pub psychologist_name: Option<String>,
  pub psychiatrist_name: Option<String>,
  pub spiritual_name:    Option<String>,
  pub homeopathy_name:   Option<String>,
  pub ayurveda_name:     Option<String>,
  pub unani_name:        Option<String>,
  pub years_on_medicine: Option<i64>,
  pub created_at: String,
}

impl RawPatient {
  pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
    Ok(Self {
      id: row.get(0)?,
      full_name:    row.get(1)?,
      phone_number: row.get(2)?,
      age:          row.get(3)?,
      place:        row.get(4)?,
      father_name:  row.get(5)?,
      school_class_studied:  row.get(6)?,
      madrasa_class_studied: row.get(7)?,
      is_married:   row.get(8)?,
      husband_name: row.get(9)?,
      husband_job:  row.get(10)?,
      kids_count:   row.get(11)?,
      is_working:   row.get(12)?,
      has_siblings: row.get(13)?,
      siblings_have_issues: row.get(14)?,
      core_reason:     row.get(15)?,
      when_it_started: row.get(16)?,
      previously_sought_help:       row.get(17)?,
      previously_sought_help_other: row.get(18)?,
      medicine_status:   row.get(19)?,
      other_medications: row.get(20)?,
      other_diseases:    row.get(21)?,
      is_genetic:            row.get(22)?,
      genetic_relative_name: row.get(23)?,
      job_field: row.get(24)?,
      psychologist_name: row.get(25)?,
      psychiatrist_name: row.get(26)?,
      spiritual_name:    row.get(27)?,
      homeopathy_name:   row.get(28)?,
      ayurveda_name:     row.get(29)?,
      unani_name:        row.get(30)?,
      years_on_medicine: row.get(31)?,
      created_at: row.get(32)?,
    })
  }

  /// Assemble the full aggregate from this row plus its loaded children.
  pub fn into_patient(
    self,
    kids: Vec<Kid>,
    core_issues: CoreIssues,
    sessions: Vec<Session>,
    tracked_issues: Vec<TrackedIssue>,
  ) -> Result<Patient> {
    let created_at = decode_dt(&self.created_at)?;

    Ok(Patient {
      id: self.id,
      created_at,
      intake: PatientIntake {
        full_name:    self.full_name,
        phone_number: self.phone_number,
        age:          self.age,
        place:        self.place,
        father_name:  self.father_name,
        school_class_studied:  self.school_class_studied,
        madrasa_class_studied: self.madrasa_class_studied,
        is_married:   decode_flag(self.is_married),
        husband_name: self.husband_name,
        husband_job:  self.husband_job,
        is_working:   decode_flag(self.is_working),
        has_siblings: decode_flag(self.has_siblings),
        siblings_have_issues: decode_flag(self.siblings_have_issues),
        core_reason:     self.core_reason,
        when_it_started: self.when_it_started,
        previously_sought_help: decode_string_list(
          self.previously_sought_help.as_deref(),
        ),
        previously_sought_help_other: self.previously_sought_help_other,
        medicine_status:   self.medicine_status,
        other_medications: self.other_medications,
        other_diseases:    self.other_diseases,
        years_on_medicine: self.years_on_medicine,
        is_genetic:            decode_flag(self.is_genetic),
        genetic_relative_name: self.genetic_relative_name,
        job_field: self.job_field,
        psychologist_names: decode_name_list(self.psychologist_name.as_deref()),
        psychiatrist_names: decode_name_list(self.psychiatrist_name.as_deref()),
        spiritual_names:    decode_name_list(self.spiritual_name.as_deref()),
        homeopathy_names:   decode_name_list(self.homeopathy_name.as_deref()),
        ayurveda_names:     decode_name_list(self.ayurveda_name.as_deref()),
        unani_names:        decode_name_list(self.unani_name.as_deref()),
      },
      kids_count: self.kids_count.unwrap_or(0),
      kids,
      core_issues,
      sessions,
      tracked_issues,
    })
  }
}

/// Raw column values read from a `core_issues` row.
pub struct RawCoreIssues {
  pub is_about_belief: Option<i64>,
  pub belief_types:    Option<String>,
  pub niyyath_related:      Option<String>,
  pub wudu_niyyath_time:    Option<String>,
  pub namaz_niyyath_time:   Option<String>,
  pub ghusl_niyyath_time:   Option<String>,
  pub fasting_niyyath_time: Option<String>,
  pub najas_related:      Option<String>,
  pub urination_time:     Option<String>,
  pub motion_time:        Option<String>,
  pub ghusl_najas_time:   Option<String>,
  pub normal_bath_time:   Option<String>,
  pub hand_washing_time:  Option<String>,
  pub dress_washing_time: Option<String>,
  pub dog_related:          Option<i64>,
  pub pig_related:          Option<i64>,
  pub over_soaping:         Option<i64>,
  pub insects_related:      Option<i64>,
  pub gas_locking_related:  Option<i64>,
  pub fear_of_death:        Option<i64>,
  pub fear_of_disease:      Option<i64>,
  pub door_locking_related: Option<i64>,
  pub wudu_time:    Option<String>,
  pub namaz_time:   Option<String>,
  pub other_issues: Option<String>,
}

impl RawCoreIssues {
  pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
    Ok(Self {
      is_about_belief: row.get(0)?,
      belief_types:    row.get(1)?,
      niyyath_related:      row.get(2)?,
      wudu_niyyath_time:    row.get(3)?,
      namaz_niyyath_time:   row.get(4)?,
      ghusl_niyyath_time:   row.get(5)?,
      fasting_niyyath_time: row.get(6)?,
      najas_related:      row.get(7)?,
      urination_time:     row.get(8)?,
      motion_time:        row.get(9)?,
      ghusl_najas_time:   row.get(10)?,
      normal_bath_time:   row.get(11)?,
      hand_washing_time:  row.get(12)?,
      dress_washing_time: row.get(13)?,
      dog_related:          row.get(14)?,
      pig_related:          row.get(15)?,
      over_soaping:         row.get(16)?,
      insects_related:      row.get(17)?,
      gas_locking_related:  row.get(18)?,
      fear_of_death:        row.get(19)?,
      fear_of_disease:      row.get(20)?,
      door_locking_related: row.get(21)?,
      wudu_time:    row.get(22)?,
      namaz_time:   row.get(23)?,
      other_issues: row.get(24)?,
    })
  }

  /// Fully lenient: every field has a defined default, so this never fails
  /// and a missing row decodes identically via [`CoreIssues::default`].
  pub fn into_core_issues(self) -> CoreIssues {
    CoreIssues {
      is_about_belief: decode_flag(self.is_about_belief),
      belief_types:    decode_belief_list(self.belief_types.as_deref()),
      niyyath_related: decode_string_list(self.niyyath_related.as_deref()),
      wudu_niyyath_time:    self.wudu_niyyath_time.unwrap_or_default(),
      namaz_niyyath_time:   self.namaz_niyyath_time.unwrap_or_default(),
      ghusl_niyyath_time:   self.ghusl_niyyath_time.unwrap_or_default(),
      fasting_niyyath_time: self.fasting_niyyath_time.unwrap_or_default(),
      najas_related: decode_string_list(self.najas_related.as_deref()),
      urination_time:     self.urination_time.unwrap_or_default(),
      motion_time:        self.motion_time.unwrap_or_default(),
      ghusl_najas_time:   self.ghusl_najas_time.unwrap_or_default(),
      normal_bath_time:   self.normal_bath_time.unwrap_or_default(),
      hand_washing_time:  self.hand_washing_time.unwrap_or_default(),
      dress_washing_time: self.dress_washing_time.unwrap_or_default(),
      dog_related:          decode_flag(self.dog_related),
      pig_related:          decode_flag(self.pig_related),
      over_soaping:         decode_flag(self.over_soaping),
      insects_related:      decode_flag(self.insects_related),
      gas_locking_related:  decode_flag(self.gas_locking_related),
      fear_of_death:        decode_flag(self.fear_of_death),
      fear_of_disease:      decode_flag(self.fear_of_disease),
      door_locking_related: decode_flag(self.door_locking_related),
      wudu_time:    self.wudu_time.unwrap_or_default(),
      namaz_time:   self.namaz_time.unwrap_or_default(),
      other_issues: self.other_issues.unwrap_or_default(),
    }
  }
}

/// Raw strings read for the list-screen projection.
pub struct RawSummary {
  pub id:           i64,
  pub full_name:    String,
  pub phone_number: String,
  pub core_reason:  Option<String>,
  pub created_at:   String,
}

impl RawSummary {
  pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      full_name:    row.get(1)?,
      phone_number: row.get(2)?,
      core_reason:  row.get(3)?,
      created_at:   row.get(4)?,
    })
  }

  pub fn into_summary(self) -> Result<PatientSummary> {
    Ok(PatientSummary {
      id:           self.id,
      full_name:    self.full_name,
      phone_number: self.phone_number,
      core_reason:  self.core_reason,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
