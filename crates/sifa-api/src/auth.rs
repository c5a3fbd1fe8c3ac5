//! Handler for `/login`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/login` | Body: `{"username":"...","password":"..."}`; 401 on mismatch |

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use sifa_core::{store::ClinicStore, user::User};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /login`
///
/// Single equality match against the users table. There is no rate
/// limiting or lockout; the device holds one clinician's records.
pub async fn login<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<User>, ApiError>
where
  S: ClinicStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = store
    .verify_user(&body.username, &body.password)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Unauthorized)?;
  Ok(Json(user))
}
