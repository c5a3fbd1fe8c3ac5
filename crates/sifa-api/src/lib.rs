//! JSON REST API for sifa.
//!
//! Exposes an axum [`Router`] backed by any [`sifa_core::store::ClinicStore`].
//! TLS and transport concerns are the caller's responsibility. This layer
//! also owns the caller-side validation the store deliberately skips:
//! session title/date checks and percentage clamping.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sifa_api::router(store.clone()))
//! ```

pub mod auth;
pub mod error;
pub mod patients;
pub mod schedule;
pub mod sessions;
pub mod tracked_issues;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use sifa_core::store::ClinicStore;

pub use error::ApiError;

#[cfg(test)]
mod tests;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn router<S>(store: Arc<S>) -> Router<()>
where
  S: ClinicStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Auth
    .route("/login", post(auth::login::<S>))
    // Patients
    .route(
      "/patients",
      get(patients::list::<S>).post(patients::create::<S>),
    )
    .route(
      "/patients/{id}",
      get(patients::get_one::<S>)
        .put(patients::update::<S>)
        .delete(patients::remove::<S>),
    )
    .route(
      "/patients/{id}/core-issues",
      put(patients::update_core_issues::<S>),
    )
    // Sessions
    .route("/patients/{id}/sessions", post(sessions::create::<S>))
    .route(
      "/sessions/{id}",
      put(sessions::update::<S>).delete(sessions::remove::<S>),
    )
    // Tracked issues
    .route(
      "/patients/{id}/tracked-issues",
      post(tracked_issues::create::<S>),
    )
    .route(
      "/tracked-issues/{id}",
      put(tracked_issues::update::<S>).delete(tracked_issues::remove::<S>),
    )
    // Schedule
    .route(
      "/schedule",
      get(schedule::list::<S>).post(schedule::create::<S>),
    )
    .route("/schedule/{id}/status", put(schedule::set_status::<S>))
    .route("/schedule/{id}", delete(schedule::remove::<S>))
    .with_state(store)
}
