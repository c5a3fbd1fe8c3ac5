//! Handlers for tracked-issue endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/patients/:id/tracked-issues` | Percentage clamped to [0, 100] |
//! | `PUT`    | `/tracked-issues/:id` | Same clamping |
//! | `DELETE` | `/tracked-issues/:id` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use sifa_core::{progress::NewTrackedIssue, store::ClinicStore};

use crate::error::ApiError;

/// The store persists percentages as given; this boundary keeps them in
/// [0, 100] the way the progress controls do.
fn clamped(mut input: NewTrackedIssue) -> Result<NewTrackedIssue, ApiError> {
  if input.name.trim().is_empty() {
    return Err(ApiError::Validation("name is required".into()));
  }
  input.percentage_cured = input.percentage_cured.clamp(0, 100);
  Ok(input)
}

/// `POST /patients/:id/tracked-issues`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(patient_id): Path<i64>,
  Json(body): Json<NewTrackedIssue>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let issue = store
    .add_tracked_issue(patient_id, clamped(body)?)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(issue)))
}

/// `PUT /tracked-issues/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewTrackedIssue>,
) -> Result<StatusCode, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .update_tracked_issue(id, clamped(body)?)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /tracked-issues/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_tracked_issue(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
