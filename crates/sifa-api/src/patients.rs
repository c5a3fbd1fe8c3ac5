//! Handlers for `/patients` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/patients` | Summaries, newest first |
//! | `POST`   | `/patients` | Body: [`NewPatient`]; returns 201 + `{"id": n}` |
//! | `GET`    | `/patients/:id` | Full aggregate + `average_progress`; 404 |
//! | `PUT`    | `/patients/:id` | Overwrites scalars, replaces kids |
//! | `DELETE` | `/patients/:id` | Cascades to all children |
//! | `PUT`    | `/patients/:id/core-issues` | Upsert of the 1:1 checklist |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;
use sifa_core::{
  core_issues::CoreIssues,
  patient::{NewPatient, Patient, PatientSummary},
  store::ClinicStore,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /patients`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<PatientSummary>>, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let summaries =
    store.list_patients().await.map_err(ApiError::from_store)?;
  Ok(Json(summaries))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /patients` — returns `{"id": n}` so the client can navigate
/// straight to the new detail view.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPatient>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = store
    .create_patient(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// The full aggregate plus the derived progress figure, so every client
/// shows the same rounding.
#[derive(Debug, Serialize)]
pub struct PatientDetail {
  #[serde(flatten)]
  pub patient: Patient,
  pub average_progress: i64,
}

/// `GET /patients/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<PatientDetail>, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let patient = store
    .get_patient(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("patient {id} not found")))?;

  let average_progress = patient.average_progress();
  Ok(Json(PatientDetail { patient, average_progress }))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /patients/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewPatient>,
) -> Result<StatusCode, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .update_patient(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /patients/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_patient(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Core issues ──────────────────────────────────────────────────────────────

/// `PUT /patients/:id/core-issues` — upsert semantics; never fails because
/// the checklist row is missing.
pub async fn update_core_issues<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<CoreIssues>,
) -> Result<StatusCode, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .update_core_issues(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
