//! Handlers for `/schedule` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/schedule` | Time ascending |
//! | `POST`   | `/schedule` | Status always starts `Scheduled` |
//! | `PUT`    | `/schedule/:id/status` | Body: `{"status":"Completed"}` |
//! | `DELETE` | `/schedule/:id` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use sifa_core::{
  schedule::{EventStatus, NewScheduleEvent, ScheduleEvent},
  store::ClinicStore,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /schedule`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ScheduleEvent>>, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let events = store.list_schedule().await.map_err(ApiError::from_store)?;
  Ok(Json(events))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /schedule`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewScheduleEvent>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::Validation("title is required".into()));
  }
  if body.time.trim().is_empty() {
    return Err(ApiError::Validation("time is required".into()));
  }

  let event = store
    .add_schedule_event(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(event)))
}

// ─── Status ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: EventStatus,
}

/// `PUT /schedule/:id/status`
pub async fn set_status<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<StatusBody>,
) -> Result<StatusCode, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .set_event_status(id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /schedule/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_schedule_event(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
