//! Router-level tests against a real in-memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use serde_json::{Value, json};
use sifa_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  crate::router(Arc::new(store))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

async fn body_json(res: Response) -> Value {
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn create_patient(app: &Router, name: &str) -> i64 {
  let res = app
    .clone()
    .oneshot(json_request(
      "POST",
      "/patients",
      json!({ "full_name": name, "phone_number": "0471 555 120" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
  body_json(res).await["id"].as_i64().unwrap()
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_accepts_bootstrap_credentials() {
  let app = app().await;
  let res = app
    .oneshot(json_request(
      "POST",
      "/login",
      json!({ "username": "admin", "password": "admin123" }),
    ))
    .await
    .unwrap();

  assert_eq!(res.status(), StatusCode::OK);
  let user = body_json(res).await;
  assert_eq!(user["username"], "admin");
  assert!(user.get("password").is_none());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
  let app = app().await;
  let res = app
    .oneshot(json_request(
      "POST",
      "/login",
      json!({ "username": "admin", "password": "wrong" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

// ─── Patients ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_without_required_fields_is_bad_request() {
  let app = app().await;
  let res = app
    .oneshot(json_request(
      "POST",
      "/patients",
      json!({ "full_name": "", "phone_number": "0471 555 120" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_patient_is_not_found() {
  let app = app().await;
  let res = app
    .oneshot(Request::get("/patients/999").body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_includes_average_progress() {
  let app = app().await;
  let id = create_patient(&app, "Amina K").await;

  for (name, pct) in [("waswas", 40), ("sleep", 70)] {
    let res = app
      .clone()
      .oneshot(json_request(
        "POST",
        &format!("/patients/{id}/tracked-issues"),
        json!({ "name": name, "percentage_cured": pct }),
      ))
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
  }

  let res = app
    .oneshot(
      Request::get(format!("/patients/{id}"))
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);

  let detail = body_json(res).await;
  assert_eq!(detail["average_progress"], 55);
  assert_eq!(detail["full_name"], "Amina K");
  assert_eq!(detail["core_issues"]["belief_types"], json!([]));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
  let app = app().await;
  let id = create_patient(&app, "Amina K").await;

  let res = app
    .clone()
    .oneshot(
      Request::delete(format!("/patients/{id}"))
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);

  let res = app
    .oneshot(
      Request::get(format!("/patients/{id}"))
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_with_empty_title_is_rejected() {
  let app = app().await;
  let id = create_patient(&app, "Amina K").await;

  let res = app
    .clone()
    .oneshot(json_request(
      "POST",
      &format!("/patients/{id}/sessions"),
      json!({ "title": "  ", "date": "2024-03-01" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);

  // Nothing was written.
  let res = app
    .oneshot(
      Request::get(format!("/patients/{id}"))
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(body_json(res).await["sessions"], json!([]));
}

#[tokio::test]
async fn session_for_unknown_patient_is_not_found() {
  let app = app().await;
  let res = app
    .oneshot(json_request(
      "POST",
      "/patients/999/sessions",
      json!({ "title": "Intake", "date": "2024-03-01" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ─── Tracked issues ──────────────────────────────────────────────────────────

#[tokio::test]
async fn percentage_is_clamped_at_the_boundary() {
  let app = app().await;
  let id = create_patient(&app, "Amina K").await;

  let res = app
    .oneshot(json_request(
      "POST",
      &format!("/patients/{id}/tracked-issues"),
      json!({ "name": "waswas", "percentage_cured": 250 }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
  assert_eq!(body_json(res).await["percentage_cured"], 100);
}

// ─── Schedule ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schedule_round_trip_with_status_transition() {
  let app = app().await;

  let res = app
    .clone()
    .oneshot(json_request(
      "POST",
      "/schedule",
      json!({ "title": "Intake", "time": "2024-03-12 09:30" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
  let event = body_json(res).await;
  assert_eq!(event["status"], "Scheduled");
  let event_id = event["id"].as_i64().unwrap();

  let res = app
    .clone()
    .oneshot(json_request(
      "PUT",
      &format!("/schedule/{event_id}/status"),
      json!({ "status": "Completed" }),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);

  let res = app
    .oneshot(Request::get("/schedule").body(Body::empty()).unwrap())
    .await
    .unwrap();
  let events = body_json(res).await;
  assert_eq!(events[0]["status"], "Completed");
}
