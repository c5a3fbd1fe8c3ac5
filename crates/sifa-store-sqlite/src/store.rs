//! [`SqliteStore`] — the SQLite implementation of [`ClinicStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, ToSql, params};

use sifa_core::{
  core_issues::CoreIssues,
  patient::{Kid, NewPatient, Patient, PatientSummary},
  progress::{NewTrackedIssue, TrackedIssue},
  schedule::{EventStatus, NewScheduleEvent, ScheduleEvent},
  session::{NewSession, Session},
  store::ClinicStore,
  user::User,
};

use crate::{
  Error, Result,
  encode::{
    EncodedCoreIssues, EncodedIntake, RawCoreIssues, RawPatient, RawSummary,
    decode_event_status, encode_event_status,
  },
  schema::{BOOTSTRAP_PASSWORD, BOOTSTRAP_USERNAME, SCHEMA},
};

// ─── Statements ──────────────────────────────────────────────────────────────

/// Parameter order `?1..?31` matches [`EncodedIntake::params`].
const INSERT_PATIENT: &str = "
  INSERT INTO patients (
    full_name, phone_number, age, place, father_name,
    school_class_studied, madrasa_class_studied, is_married, husband_name,
    husband_job, kids_count, is_working, has_siblings, siblings_have_issues,
    core_reason, when_it_started, previously_sought_help,
    previously_sought_help_other, medicine_status, other_medications,
    other_diseases, is_genetic, genetic_relative_name, job_field,
    psychologist_name, psychiatrist_name, spiritual_name, homeopathy_name,
    ayurveda_name, unani_name, years_on_medicine
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
            ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26,
            ?27, ?28, ?29, ?30, ?31)";

const UPDATE_PATIENT: &str = "
  UPDATE patients SET
    full_name = ?1, phone_number = ?2, age = ?3, place = ?4,
    father_name = ?5, school_class_studied = ?6, madrasa_class_studied = ?7,
    is_married = ?8, husband_name = ?9, husband_job = ?10, kids_count = ?11,
    is_working = ?12, has_siblings = ?13, siblings_have_issues = ?14,
    core_reason = ?15, when_it_started = ?16, previously_sought_help = ?17,
    previously_sought_help_other = ?18, medicine_status = ?19,
    other_medications = ?20, other_diseases = ?21, is_genetic = ?22,
    genetic_relative_name = ?23, job_field = ?24, psychologist_name = ?25,
    psychiatrist_name = ?26, spiritual_name = ?27, homeopathy_name = ?28,
    ayurveda_name = ?29, unani_name = ?30, years_on_medicine = ?31
  WHERE id = ?32";

/// Column order matches [`RawPatient::from_row`].
const SELECT_PATIENT: &str = "
  SELECT id, full_name, phone_number, age, place, father_name,
         school_class_studied, madrasa_class_studied, is_married,
         husband_name, husband_job, kids_count, is_working, has_siblings,
         siblings_have_issues, core_reason, when_it_started,
         previously_sought_help, previously_sought_help_other,
         medicine_status, other_medications, other_diseases, is_genetic,
         genetic_relative_name, job_field, psychologist_name,
         psychiatrist_name, spiritual_name, homeopathy_name, ayurveda_name,
         unani_name, years_on_medicine, created_at
  FROM patients WHERE id = ?1";

/// Parameter order `?1..?25` matches [`EncodedCoreIssues::params`].
const UPDATE_CORE_ISSUES: &str = "
  UPDATE core_issues SET
    is_about_belief = ?1, belief_types = ?2, niyyath_related = ?3,
    wudu_niyyath_time = ?4, namaz_niyyath_time = ?5,
    ghusl_niyyath_time = ?6, fasting_niyyath_time = ?7, najas_related = ?8,
    urination_time = ?9, motion_time = ?10, ghusl_najas_time = ?11,
    normal_bath_time = ?12, hand_washing_time = ?13,
    dress_washing_time = ?14, dog_related = ?15, pig_related = ?16,
    over_soaping = ?17, insects_related = ?18, gas_locking_related = ?19,
    fear_of_death = ?20, fear_of_disease = ?21, door_locking_related = ?22,
    wudu_time = ?23, namaz_time = ?24, other_issues = ?25
  WHERE patient_id = ?26";

/// Column order matches [`RawCoreIssues::from_row`].
const SELECT_CORE_ISSUES: &str = "
  SELECT is_about_belief, belief_types, niyyath_related, wudu_niyyath_time,
         namaz_niyyath_time, ghusl_niyyath_time, fasting_niyyath_time,
         najas_related, urination_time, motion_time, ghusl_najas_time,
         normal_bath_time, hand_washing_time, dress_washing_time,
         dog_related, pig_related, over_soaping, insects_related,
         gas_locking_related, fear_of_death, fear_of_disease,
         door_locking_related, wudu_time, namaz_time, other_issues
  FROM core_issues WHERE patient_id = ?1";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A clinic store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, so the
/// whole process shares one serialized connection for its lifetime.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Create all tables and seed the bootstrap credential. Safe to run on
  /// every start.
  pub(crate) async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        conn.execute(
          "INSERT INTO users (username, hashed_password)
           SELECT ?1, ?2 WHERE NOT EXISTS (SELECT 1 FROM users)",
          params![BOOTSTRAP_USERNAME, BOOTSTRAP_PASSWORD],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the underlying connection. Tests use this to set
  /// up legacy and corrupted column values.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Single-value query helper for test assertions.
  #[cfg(test)]
  pub(crate) async fn query_i64(&self, sql: String) -> Result<i64> {
    let value = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
      .await?;
    Ok(value)
  }
}

// ─── ClinicStore impl ────────────────────────────────────────────────────────

impl ClinicStore for SqliteStore {
  type Error = Error;

  // ── Auth ──────────────────────────────────────────────────────────────────

  async fn verify_user(
    &self,
    username: &str,
    password: &str,
  ) -> Result<Option<User>> {
    let username = username.to_owned();
    let password = password.to_owned();

    let user = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, username FROM users
               WHERE username = ?1 AND hashed_password = ?2",
              params![username, password],
              |row| {
                Ok(User { id: row.get(0)?, username: row.get(1)? })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(user)
  }

  // ── Patients ──────────────────────────────────────────────────────────────

  async fn list_patients(&self) -> Result<Vec<PatientSummary>> {
    let raws: Vec<RawSummary> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, full_name, phone_number, core_reason, created_at
           FROM patients
           ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
          .query_map([], |row| RawSummary::from_row(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn get_patient(&self, id: i64) -> Result<Option<Patient>> {
    let loaded = self
      .conn
      .call(move |conn| {
        let patient = conn
          .query_row(SELECT_PATIENT, [id], RawPatient::from_row)
          .optional()?;
        let Some(patient) = patient else { return Ok(None) };

        let mut stmt =
          conn.prepare("SELECT sex, age FROM kids WHERE patient_id = ?1")?;
        let kids = stmt
          .query_map([id], |row| {
            Ok(Kid {
              sex: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
              age: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let core = conn
          .query_row(SELECT_CORE_ISSUES, [id], RawCoreIssues::from_row)
          .optional()?;

        let mut stmt = conn.prepare(
          "SELECT id, title, date, log, progress_note FROM sessions
           WHERE patient_id = ?1
           ORDER BY date DESC",
        )?;
        let sessions = stmt
          .query_map([id], |row| {
            Ok(Session {
              id:    row.get(0)?,
              title: row.get(1)?,
              date:  row.get(2)?,
              log:   row.get::<_, Option<String>>(3)?.unwrap_or_default(),
              progress_note: row
                .get::<_, Option<String>>(4)?
                .unwrap_or_default(),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT id, name, percentage_cured FROM tracked_issues
           WHERE patient_id = ?1",
        )?;
        let tracked = stmt
          .query_map([id], |row| {
            Ok(TrackedIssue {
              id:   row.get(0)?,
              name: row.get(1)?,
              percentage_cured: row
                .get::<_, Option<i64>>(2)?
                .unwrap_or(0),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((patient, kids, core, sessions, tracked)))
      })
      .await?;

    let Some((raw, kids, core, sessions, tracked)) = loaded else {
      return Ok(None);
    };

    // A missing checklist row reads as the same all-default shape the
    // persisted default row decodes to.
    let core_issues =
      core.map(RawCoreIssues::into_core_issues).unwrap_or_default();

    raw
      .into_patient(kids, core_issues, sessions, tracked)
      .map(Some)
  }

  async fn create_patient(&self, input: NewPatient) -> Result<i64> {
    input.intake.validate().map_err(Error::Core)?;

    let kids: Vec<Kid> =
      input.kids.into_iter().filter(|k| !k.is_blank()).collect();
    let encoded = EncodedIntake::new(&input.intake, kids.len() as i64)?;

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(INSERT_PATIENT, encoded.params().as_slice())?;
        let patient_id = tx.last_insert_rowid();

        for kid in &kids {
          tx.execute(
            "INSERT INTO kids (sex, age, patient_id) VALUES (?1, ?2, ?3)",
            params![kid.sex, kid.age, patient_id],
          )?;
        }

        // The default checklist row; column defaults supply the empty
        // shape.
        tx.execute(
          "INSERT INTO core_issues (patient_id) VALUES (?1)",
          [patient_id],
        )?;

        tx.commit()?;
        Ok(patient_id)
      })
      .await?;

    Ok(id)
  }

  async fn update_patient(&self, id: i64, input: NewPatient) -> Result<()> {
    input.intake.validate().map_err(Error::Core)?;

    let kids: Vec<Kid> =
      input.kids.into_iter().filter(|k| !k.is_blank()).collect();
    let encoded = EncodedIntake::new(&input.intake, kids.len() as i64)?;

    let rows = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let mut params_vec: Vec<&dyn ToSql> = encoded.params().to_vec();
        params_vec.push(&id);
        let rows = tx.execute(UPDATE_PATIENT, params_vec.as_slice())?;

        if rows > 0 {
          // Kid rows have no identity across edits; replace wholesale.
          tx.execute("DELETE FROM kids WHERE patient_id = ?1", [id])?;
          for kid in &kids {
            tx.execute(
              "INSERT INTO kids (sex, age, patient_id) VALUES (?1, ?2, ?3)",
              params![kid.sex, kid.age, id],
            )?;
          }
        }

        tx.commit()?;
        Ok(rows)
      })
      .await?;

    if rows == 0 {
      return Err(sifa_core::Error::PatientNotFound(id).into());
    }
    Ok(())
  }

  async fn delete_patient(&self, id: i64) -> Result<()> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM patients WHERE id = ?1", [id])?)
      })
      .await?;

    if rows == 0 {
      return Err(sifa_core::Error::PatientNotFound(id).into());
    }
    Ok(())
  }

  async fn update_core_issues(
    &self,
    patient_id: i64,
    issues: CoreIssues,
  ) -> Result<()> {
    let encoded = EncodedCoreIssues::new(&issues)?;

    let found = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists: bool = tx.query_row(
          "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
          [patient_id],
          |row| row.get(0),
        )?;
        if !exists {
          return Ok(false);
        }

        // Ensure the 1:1 row, then apply the full update. `patient_id` is
        // UNIQUE, so this can never produce a second row.
        tx.execute(
          "INSERT OR IGNORE INTO core_issues (patient_id) VALUES (?1)",
          [patient_id],
        )?;
        let mut params_vec: Vec<&dyn ToSql> = encoded.params().to_vec();
        params_vec.push(&patient_id);
        tx.execute(UPDATE_CORE_ISSUES, params_vec.as_slice())?;

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !found {
      return Err(sifa_core::Error::PatientNotFound(patient_id).into());
    }
    Ok(())
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn add_session(
    &self,
    patient_id: i64,
    input: NewSession,
  ) -> Result<Session> {
    let insert = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        let exists: bool = conn.query_row(
          "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
          [patient_id],
          |row| row.get(0),
        )?;
        if !exists {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO sessions (title, date, log, progress_note, patient_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![
            insert.title,
            insert.date,
            insert.log,
            insert.progress_note,
            patient_id,
          ],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let Some(id) = id else {
      return Err(sifa_core::Error::PatientNotFound(patient_id).into());
    };

    Ok(Session {
      id,
      title: input.title,
      date:  input.date,
      log:   input.log,
      progress_note: input.progress_note,
    })
  }

  async fn update_session(&self, id: i64, input: NewSession) -> Result<()> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE sessions SET title = ?1, date = ?2, log = ?3,
                               progress_note = ?4
           WHERE id = ?5",
          params![input.title, input.date, input.log, input.progress_note, id],
        )?)
      })
      .await?;

    if rows == 0 {
      return Err(sifa_core::Error::SessionNotFound(id).into());
    }
    Ok(())
  }

  async fn delete_session(&self, id: i64) -> Result<()> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?)
      })
      .await?;

    if rows == 0 {
      return Err(sifa_core::Error::SessionNotFound(id).into());
    }
    Ok(())
  }

  // ── Tracked issues ────────────────────────────────────────────────────────

  async fn add_tracked_issue(
    &self,
    patient_id: i64,
    input: NewTrackedIssue,
  ) -> Result<TrackedIssue> {
    let insert = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        let exists: bool = conn.query_row(
          "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
          [patient_id],
          |row| row.get(0),
        )?;
        if !exists {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO tracked_issues (name, percentage_cured, patient_id)
           VALUES (?1, ?2, ?3)",
          params![insert.name, insert.percentage_cured, patient_id],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    let Some(id) = id else {
      return Err(sifa_core::Error::PatientNotFound(patient_id).into());
    };

    Ok(TrackedIssue {
      id,
      name: input.name,
      percentage_cured: input.percentage_cured,
    })
  }

  async fn update_tracked_issue(
    &self,
    id: i64,
    input: NewTrackedIssue,
  ) -> Result<()> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE tracked_issues SET name = ?1, percentage_cured = ?2
           WHERE id = ?3",
          params![input.name, input.percentage_cured, id],
        )?)
      })
      .await?;

    if rows == 0 {
      return Err(sifa_core::Error::TrackedIssueNotFound(id).into());
    }
    Ok(())
  }

  async fn delete_tracked_issue(&self, id: i64) -> Result<()> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM tracked_issues WHERE id = ?1", [id])?)
      })
      .await?;

    if rows == 0 {
      return Err(sifa_core::Error::TrackedIssueNotFound(id).into());
    }
    Ok(())
  }

  // ── Schedule ──────────────────────────────────────────────────────────────

  async fn list_schedule(&self) -> Result<Vec<ScheduleEvent>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, title, time, status FROM schedule_events
           ORDER BY time ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, String>(2)?,
              row.get::<_, Option<String>>(3)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(id, title, time, status)| ScheduleEvent {
          id,
          title,
          time,
          status: decode_event_status(status.as_deref().unwrap_or("")),
        })
        .collect(),
    )
  }

  async fn add_schedule_event(
    &self,
    input: NewScheduleEvent,
  ) -> Result<ScheduleEvent> {
    let insert = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO schedule_events (title, time, status)
           VALUES (?1, ?2, ?3)",
          params![
            insert.title,
            insert.time,
            encode_event_status(EventStatus::Scheduled),
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ScheduleEvent {
      id,
      title:  input.title,
      time:   input.time,
      status: EventStatus::Scheduled,
    })
  }

  async fn set_event_status(
    &self,
    id: i64,
    status: EventStatus,
  ) -> Result<()> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE schedule_events SET status = ?1 WHERE id = ?2",
          params![encode_event_status(status), id],
        )?)
      })
      .await?;

    if rows == 0 {
      return Err(sifa_core::Error::EventNotFound(id).into());
    }
    Ok(())
  }

  async fn delete_schedule_event(&self, id: i64) -> Result<()> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM schedule_events WHERE id = ?1", [id])?)
      })
      .await?;

    if rows == 0 {
      return Err(sifa_core::Error::EventNotFound(id).into());
    }
    Ok(())
  }
}
