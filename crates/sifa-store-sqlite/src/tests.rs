//! Integration tests for `SqliteStore` against an in-memory database.

use sifa_core::{
  core_issues::{BeliefEntry, CoreIssues},
  patient::{Kid, NewPatient, PatientIntake},
  progress::NewTrackedIssue,
  schedule::{EventStatus, NewScheduleEvent},
  session::NewSession,
  store::ClinicStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_patient(name: &str) -> NewPatient {
  NewPatient {
    intake: PatientIntake {
      full_name:    name.into(),
      phone_number: "0471 555 120".into(),
      ..Default::default()
    },
    kids: Vec::new(),
  }
}

fn session(title: &str, date: &str) -> NewSession {
  NewSession {
    title: title.into(),
    date:  date.into(),
    log:   "went well".into(),
    progress_note: String::new(),
  }
}

fn tracked(name: &str, pct: i64) -> NewTrackedIssue {
  NewTrackedIssue { name: name.into(), percentage_cured: pct }
}

// ─── Initialization ──────────────────────────────────────────────────────────

#[tokio::test]
async fn init_is_idempotent_and_seeds_one_user() {
  let s = store().await;
  s.init_schema().await.expect("second init");

  let users = s
    .query_i64("SELECT COUNT(*) FROM users".into())
    .await
    .unwrap();
  assert_eq!(users, 1);

  let admin = s.verify_user("admin", "admin123").await.unwrap();
  assert_eq!(admin.unwrap().username, "admin");
}

#[tokio::test]
async fn verify_user_rejects_wrong_password() {
  let s = store().await;
  assert!(s.verify_user("admin", "nope").await.unwrap().is_none());
  assert!(s.verify_user("ghost", "admin123").await.unwrap().is_none());
}

// ─── Patient CRUD ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_requires_name_and_phone() {
  let s = store().await;

  let mut input = new_patient("Amina K");
  input.intake.full_name = "  ".into();
  let err = s.create_patient(input).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(sifa_core::Error::MissingField("full_name"))
  ));

  let mut input = new_patient("Amina K");
  input.intake.phone_number = String::new();
  let err = s.create_patient(input).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(sifa_core::Error::MissingField("phone_number"))
  ));
}

#[tokio::test]
async fn encoded_lists_round_trip() {
  let s = store().await;

  let mut input = new_patient("Amina K");
  // Duplicates and order are part of the contract.
  input.intake.previously_sought_help = vec![
    "psychologist".into(),
    "spiritual".into(),
    "psychologist".into(),
  ];
  input.intake.psychologist_names = vec!["Dr. A".into(), "Dr. B".into()];
  input.intake.unani_names = vec!["Hakim C".into()];

  let id = s.create_patient(input).await.unwrap();
  let patient = s.get_patient(id).await.unwrap().unwrap();

  assert_eq!(patient.intake.previously_sought_help, vec![
    "psychologist", "spiritual", "psychologist",
  ]);
  assert_eq!(patient.intake.psychologist_names, vec!["Dr. A", "Dr. B"]);
  assert_eq!(patient.intake.unani_names, vec!["Hakim C"]);
  assert!(patient.intake.spiritual_names.is_empty());
}

#[tokio::test]
async fn get_missing_patient_returns_none() {
  let s = store().await;
  assert!(s.get_patient(999).await.unwrap().is_none());
}

#[tokio::test]
async fn summaries_are_newest_first_and_carry_no_children() {
  let s = store().await;
  let first = s.create_patient(new_patient("First")).await.unwrap();
  let second = s.create_patient(new_patient("Second")).await.unwrap();

  let summaries = s.list_patients().await.unwrap();
  assert_eq!(summaries.len(), 2);
  assert_eq!(summaries[0].id, second);
  assert_eq!(summaries[0].full_name, "Second");
  assert_eq!(summaries[1].id, first);
}

#[tokio::test]
async fn blank_kid_entries_are_skipped_and_counter_derived() {
  let s = store().await;

  let mut input = new_patient("Amina K");
  input.kids = vec![
    Kid { sex: String::new(), age: None },
    Kid { sex: "Female".into(), age: Some(4) },
    Kid { sex: "Male".into(), age: None },
  ];

  let id = s.create_patient(input).await.unwrap();
  let patient = s.get_patient(id).await.unwrap().unwrap();

  assert_eq!(patient.kids.len(), 2);
  assert_eq!(patient.kids_count, 2);
}

#[tokio::test]
async fn update_replaces_kid_rows() {
  let s = store().await;

  let mut input = new_patient("Amina K");
  input.kids = vec![
    Kid { sex: "Female".into(), age: Some(4) },
    Kid { sex: "Male".into(), age: Some(7) },
  ];
  let id = s.create_patient(input).await.unwrap();

  let mut update = new_patient("Amina K");
  update.kids = vec![Kid { sex: "Female".into(), age: Some(5) }];
  s.update_patient(id, update).await.unwrap();

  let patient = s.get_patient(id).await.unwrap().unwrap();
  assert_eq!(patient.kids, vec![Kid { sex: "Female".into(), age: Some(5) }]);
  assert_eq!(patient.kids_count, 1);

  let rows = s
    .query_i64(format!("SELECT COUNT(*) FROM kids WHERE patient_id = {id}"))
    .await
    .unwrap();
  assert_eq!(rows, 1);
}

#[tokio::test]
async fn update_missing_patient_is_not_found() {
  let s = store().await;
  let err = s.update_patient(42, new_patient("Ghost")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(sifa_core::Error::PatientNotFound(42))
  ));
}

#[tokio::test]
async fn delete_cascades_to_all_children() {
  let s = store().await;

  let mut input = new_patient("Amina K");
  input.kids = vec![
    Kid { sex: "Female".into(), age: Some(4) },
    Kid { sex: "Male".into(), age: Some(7) },
  ];
  let id = s.create_patient(input).await.unwrap();
  s.add_session(id, session("Intake", "2024-03-01")).await.unwrap();
  s.add_tracked_issue(id, tracked("waswas", 20)).await.unwrap();

  s.delete_patient(id).await.unwrap();

  for table in ["kids", "core_issues", "sessions", "tracked_issues"] {
    let rows = s
      .query_i64(format!(
        "SELECT COUNT(*) FROM {table} WHERE patient_id = {id}"
      ))
      .await
      .unwrap();
    assert_eq!(rows, 0, "{table} not cascaded");
  }
}

// ─── Core issues ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn default_checklist_is_identical_from_both_paths() {
  let s = store().await;
  let id = s.create_patient(new_patient("Amina K")).await.unwrap();

  // Path one: the row persisted at creation.
  let persisted = s.get_patient(id).await.unwrap().unwrap().core_issues;
  assert_eq!(persisted, CoreIssues::default());

  // Path two: synthesized when the row is gone.
  s.execute_raw(format!(
    "DELETE FROM core_issues WHERE patient_id = {id}"
  ))
  .await
  .unwrap();
  let synthesized = s.get_patient(id).await.unwrap().unwrap().core_issues;
  assert_eq!(synthesized, persisted);
}

#[tokio::test]
async fn core_issues_update_round_trips() {
  let s = store().await;
  let id = s.create_patient(new_patient("Amina K")).await.unwrap();

  let issues = CoreIssues {
    is_about_belief: true,
    belief_types: vec![BeliefEntry {
      title:       "Creation".into(),
      description: "Recurring doubt".into(),
    }],
    niyyath_related: vec!["Wudu".into(), "Fasting".into()],
    wudu_niyyath_time: "20 min".into(),
    najas_related: vec!["Hand washing time".into()],
    hand_washing_time: "15 min".into(),
    dog_related: true,
    fear_of_death: true,
    other_issues: "sleep".into(),
    ..Default::default()
  };
  s.update_core_issues(id, issues.clone()).await.unwrap();

  let stored = s.get_patient(id).await.unwrap().unwrap().core_issues;
  assert_eq!(stored, issues);
}

#[tokio::test]
async fn core_issues_upsert_recreates_missing_row_once() {
  let s = store().await;
  let id = s.create_patient(new_patient("Amina K")).await.unwrap();

  s.execute_raw(format!(
    "DELETE FROM core_issues WHERE patient_id = {id}"
  ))
  .await
  .unwrap();

  let issues = CoreIssues { pig_related: true, ..Default::default() };
  s.update_core_issues(id, issues.clone()).await.unwrap();
  s.update_core_issues(id, issues.clone()).await.unwrap();

  let rows = s
    .query_i64(format!(
      "SELECT COUNT(*) FROM core_issues WHERE patient_id = {id}"
    ))
    .await
    .unwrap();
  assert_eq!(rows, 1);

  let stored = s.get_patient(id).await.unwrap().unwrap().core_issues;
  assert_eq!(stored, issues);
}

#[tokio::test]
async fn core_issues_update_for_missing_patient_is_not_found() {
  let s = store().await;
  let err = s
    .update_core_issues(7, CoreIssues::default())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(sifa_core::Error::PatientNotFound(7))
  ));
}

// ─── Legacy and corrupted fields ─────────────────────────────────────────────

#[tokio::test]
async fn legacy_belief_strings_upgrade_on_read() {
  let s = store().await;
  let id = s.create_patient(new_patient("Amina K")).await.unwrap();

  s.execute_raw(format!(
    "UPDATE core_issues SET belief_types = '[\"Shirk\"]'
     WHERE patient_id = {id}"
  ))
  .await
  .unwrap();

  let issues = s.get_patient(id).await.unwrap().unwrap().core_issues;
  assert_eq!(issues.belief_types, vec![BeliefEntry {
    title:       String::new(),
    description: "Shirk".into(),
  }]);
}

#[tokio::test]
async fn legacy_single_provider_name_upgrades_to_list() {
  let s = store().await;
  let id = s.create_patient(new_patient("Amina K")).await.unwrap();

  s.execute_raw(format!(
    "UPDATE patients SET psychologist_name = 'Dr. Rahman' WHERE id = {id}"
  ))
  .await
  .unwrap();

  let patient = s.get_patient(id).await.unwrap().unwrap();
  assert_eq!(patient.intake.psychologist_names, vec!["Dr. Rahman"]);
}

#[tokio::test]
async fn malformed_json_field_degrades_to_empty_list() {
  let s = store().await;

  let mut input = new_patient("Amina K");
  input.intake.previously_sought_help = vec!["psychiatrist".into()];
  let id = s.create_patient(input).await.unwrap();

  s.execute_raw(format!(
    "UPDATE patients SET previously_sought_help = 'not json' WHERE id = {id}"
  ))
  .await
  .unwrap();

  // The corrupt field falls back; the rest of the record still loads.
  let patient = s.get_patient(id).await.unwrap().unwrap();
  assert!(patient.intake.previously_sought_help.is_empty());
  assert_eq!(patient.intake.full_name, "Amina K");
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sessions_are_ordered_newest_date_first() {
  let s = store().await;
  let id = s.create_patient(new_patient("Amina K")).await.unwrap();

  s.add_session(id, session("Second", "2024-02-10")).await.unwrap();
  s.add_session(id, session("Third", "2024-03-05")).await.unwrap();
  s.add_session(id, session("First", "2024-01-20")).await.unwrap();

  let patient = s.get_patient(id).await.unwrap().unwrap();
  let titles: Vec<_> =
    patient.sessions.iter().map(|s| s.title.as_str()).collect();
  assert_eq!(titles, ["Third", "Second", "First"]);
}

#[tokio::test]
async fn session_edit_and_delete_by_own_id() {
  let s = store().await;
  let id = s.create_patient(new_patient("Amina K")).await.unwrap();

  let created =
    s.add_session(id, session("Intake", "2024-03-01")).await.unwrap();

  let mut edit = session("Intake call", "2024-03-02");
  edit.progress_note = "calmer".into();
  s.update_session(created.id, edit).await.unwrap();

  let patient = s.get_patient(id).await.unwrap().unwrap();
  assert_eq!(patient.sessions[0].title, "Intake call");
  assert_eq!(patient.sessions[0].progress_note, "calmer");

  s.delete_session(created.id).await.unwrap();
  let patient = s.get_patient(id).await.unwrap().unwrap();
  assert!(patient.sessions.is_empty());
}

#[tokio::test]
async fn session_operations_report_missing_rows() {
  let s = store().await;

  let err = s
    .add_session(99, session("Intake", "2024-03-01"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(sifa_core::Error::PatientNotFound(99))
  ));

  let err = s
    .update_session(99, session("Intake", "2024-03-01"))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(sifa_core::Error::SessionNotFound(99))
  ));

  let err = s.delete_session(99).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(sifa_core::Error::SessionNotFound(99))
  ));
}

// ─── Tracked issues ──────────────────────────────────────────────────────────

#[tokio::test]
async fn average_progress_is_rounded_mean() {
  let s = store().await;
  let id = s.create_patient(new_patient("Amina K")).await.unwrap();

  let patient = s.get_patient(id).await.unwrap().unwrap();
  assert_eq!(patient.average_progress(), 0);

  s.add_tracked_issue(id, tracked("waswas", 40)).await.unwrap();
  s.add_tracked_issue(id, tracked("sleep", 70)).await.unwrap();

  let patient = s.get_patient(id).await.unwrap().unwrap();
  assert_eq!(patient.average_progress(), 55);
}

#[tokio::test]
async fn tracked_issue_edit_and_delete() {
  let s = store().await;
  let id = s.create_patient(new_patient("Amina K")).await.unwrap();

  let issue = s.add_tracked_issue(id, tracked("waswas", 20)).await.unwrap();
  s.update_tracked_issue(issue.id, tracked("waswas", 45)).await.unwrap();

  let patient = s.get_patient(id).await.unwrap().unwrap();
  assert_eq!(patient.tracked_issues[0].percentage_cured, 45);

  s.delete_tracked_issue(issue.id).await.unwrap();
  let patient = s.get_patient(id).await.unwrap().unwrap();
  assert!(patient.tracked_issues.is_empty());

  let err = s.delete_tracked_issue(issue.id).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(sifa_core::Error::TrackedIssueNotFound(_))
  ));
}

// ─── Schedule ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schedule_lists_time_ascending() {
  let s = store().await;

  s.add_schedule_event(NewScheduleEvent {
    title: "Follow-up".into(),
    time:  "2024-03-12 15:00".into(),
  })
  .await
  .unwrap();
  s.add_schedule_event(NewScheduleEvent {
    title: "Intake".into(),
    time:  "2024-03-12 09:30".into(),
  })
  .await
  .unwrap();

  let events = s.list_schedule().await.unwrap();
  let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
  assert_eq!(titles, ["Intake", "Follow-up"]);
}

#[tokio::test]
async fn new_events_start_scheduled_and_transition() {
  let s = store().await;

  let event = s
    .add_schedule_event(NewScheduleEvent {
      title: "Intake".into(),
      time:  "2024-03-12 09:30".into(),
    })
    .await
    .unwrap();
  assert_eq!(event.status, EventStatus::Scheduled);

  s.set_event_status(event.id, EventStatus::Completed).await.unwrap();
  let events = s.list_schedule().await.unwrap();
  assert_eq!(events[0].status, EventStatus::Completed);

  s.delete_schedule_event(event.id).await.unwrap();
  assert!(s.list_schedule().await.unwrap().is_empty());

  let err = s
    .set_event_status(event.id, EventStatus::Canceled)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(sifa_core::Error::EventNotFound(_))
  ));
}

#[tokio::test]
async fn unknown_stored_status_reads_as_scheduled() {
  let s = store().await;

  let event = s
    .add_schedule_event(NewScheduleEvent {
      title: "Intake".into(),
      time:  "2024-03-12 09:30".into(),
    })
    .await
    .unwrap();

  s.execute_raw(format!(
    "UPDATE schedule_events SET status = 'Postponed' WHERE id = {}",
    event.id
  ))
  .await
  .unwrap();

  let events = s.list_schedule().await.unwrap();
  assert_eq!(events[0].status, EventStatus::Scheduled);
}
