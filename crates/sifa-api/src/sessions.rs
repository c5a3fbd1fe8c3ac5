//! Handlers for session endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/patients/:id/sessions` | 400 on empty title/date |
//! | `PUT`    | `/sessions/:id` | Same validation |
//! | `DELETE` | `/sessions/:id` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use sifa_core::{session::NewSession, store::ClinicStore};

use crate::error::ApiError;

/// The store writes sessions as given; required fields are checked here at
/// the caller boundary.
fn validate(input: &NewSession) -> Result<(), ApiError> {
  if input.title.trim().is_empty() {
    return Err(ApiError::Validation("title is required".into()));
  }
  if input.date.trim().is_empty() {
    return Err(ApiError::Validation("date is required".into()));
  }
  Ok(())
}

/// `POST /patients/:id/sessions`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(patient_id): Path<i64>,
  Json(body): Json<NewSession>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  validate(&body)?;
  let session = store
    .add_session(patient_id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(session)))
}

/// `PUT /sessions/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewSession>,
) -> Result<StatusCode, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  validate(&body)?;
  store
    .update_session(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /sessions/:id`
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_session(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
