//! Standalone calendar events — independent of any patient.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a schedule event.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum EventStatus {
  #[default]
  Scheduled,
  Completed,
  Canceled,
}

/// A calendar entry. `time` is free text sorted ascending, so callers must
/// supply a lexicographically sortable format such as ISO date-time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
  pub id:     i64,
  pub title:  String,
  pub time:   String,
  pub status: EventStatus,
}

/// Input to `add_schedule_event`; new events always start out `Scheduled`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewScheduleEvent {
  pub title: String,
  pub time:  String,
}
