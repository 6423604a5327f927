//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use safetrack_core::{
  incident::{Incident, NewIncident},
  service::IncidentService,
  store::{IncidentChanges, IncidentStore},
};
use safetrack_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(IncidentService::new(Arc::new(store)))
}

async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn dock() -> Value {
  json!({
    "location": "Dock",
    "category": "Mechanical",
    "severity": "Low",
    "description": "x",
  })
}

// ── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_full_incident_with_defaults() {
  let app = app().await;
  let (status, body) = send(&app, "POST", "/incidents", Some(dock())).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "Open");
  assert_eq!(body["is_archived"], false);
  assert!(body["resolved_at"].is_null());
  assert!(body["id"].as_i64().is_some());
  assert!(body["created_at"].is_string());
  assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn create_missing_field_is_400_with_details() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/incidents",
    Some(json!({ "location": "Dock", "category": "Mechanical" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"]["code"], "bad_request");
  let fields: Vec<&str> = body["error"]["details"]
    .as_array()
    .unwrap()
    .iter()
    .map(|d| d["field"].as_str().unwrap())
    .collect();
  assert_eq!(fields, ["severity", "description"]);
}

#[tokio::test]
async fn malformed_json_is_400() {
  let app = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/incidents")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Patch ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_and_reopen_over_http() {
  let app = app().await;
  let (_, created) = send(&app, "POST", "/incidents", Some(dock())).await;
  let uri = format!("/incidents/{}", created["id"]);

  let (status, resolved) =
    send(&app, "PATCH", &uri, Some(json!({ "status": "Resolved" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert!(resolved["resolved_at"].is_string());

  let (status, reopened) =
    send(&app, "PUT", &uri, Some(json!({ "status": "Open" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert!(reopened["resolved_at"].is_null());
  assert_eq!(reopened["status"], "Open");
}

#[tokio::test]
async fn patch_null_clears_reported_by() {
  let app = app().await;
  let mut body = dock();
  body["reported_by"] = json!("Operator A");
  let (_, created) = send(&app, "POST", "/incidents", Some(body)).await;
  let uri = format!("/incidents/{}", created["id"]);

  let (_, kept) = send(&app, "PATCH", &uri, Some(json!({ "severity": "High" }))).await;
  assert_eq!(kept["reported_by"], "Operator A");

  let (_, cleared) =
    send(&app, "PATCH", &uri, Some(json!({ "reported_by": null }))).await;
  assert!(cleared["reported_by"].is_null());
  assert_eq!(cleared["severity"], "High");
}

#[tokio::test]
async fn patch_cannot_unarchive() {
  let app = app().await;
  let (_, created) = send(&app, "POST", "/incidents", Some(dock())).await;
  let uri = format!("/incidents/{}", created["id"]);
  send(&app, "DELETE", &uri, None).await;

  let (status, patched) = send(
    &app,
    "PATCH",
    &uri,
    Some(json!({ "severity": "High", "is_archived": false })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["is_archived"], true);
}

#[tokio::test]
async fn empty_patch_is_400() {
  let app = app().await;
  let (_, created) = send(&app, "POST", "/incidents", Some(dock())).await;
  let uri = format!("/incidents/{}", created["id"]);

  let (status, body) = send(&app, "PATCH", &uri, Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn patch_unknown_id_is_404() {
  let app = app().await;
  let (status, body) =
    send(&app, "PATCH", "/incidents/404", Some(json!({ "status": "Open" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn non_numeric_id_is_400() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/incidents/abc", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"]["code"], "bad_request");
}

// ── Archive / list ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_archives_idempotently() {
  let app = app().await;
  let (_, created) = send(&app, "POST", "/incidents", Some(dock())).await;
  let uri = format!("/incidents/{}", created["id"]);

  for _ in 0..2 {
    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_archived"], true);
  }

  let (status, _) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn delete_unknown_id_is_404() {
  let app = app().await;
  let (status, _) = send(&app, "DELETE", "/incidents/9", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_respects_include_archived() {
  let app = app().await;
  let (_, first) = send(&app, "POST", "/incidents", Some(dock())).await;
  let (_, second) = send(&app, "POST", "/incidents", Some(dock())).await;
  send(&app, "DELETE", &format!("/incidents/{}", first["id"]), None).await;

  let (status, visible) = send(&app, "GET", "/incidents", None).await;
  assert_eq!(status, StatusCode::OK);
  let visible = visible.as_array().unwrap();
  assert_eq!(visible.len(), 1);
  assert_eq!(visible[0]["id"], second["id"]);

  let (_, all) = send(&app, "GET", "/incidents?include_archived=true", None).await;
  let ids: Vec<i64> = all
    .as_array()
    .unwrap()
    .iter()
    .map(|i| i["id"].as_i64().unwrap())
    .collect();
  assert_eq!(
    ids,
    [second["id"].as_i64().unwrap(), first["id"].as_i64().unwrap()]
  );
}

// ── Health / fallbacks ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_db_up() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/health", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "status": "ok", "db": "up" }));
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/nope", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn wrong_method_is_http_error() {
  let app = app().await;
  let (status, body) = send(&app, "DELETE", "/incidents", None).await;
  assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
  assert_eq!(body["error"]["code"], "http_error");
}

// ── Unreachable store ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("database is down")]
struct Down;

struct DownStore;

impl IncidentStore for DownStore {
  type Error = Down;

  async fn insert(&self, _input: NewIncident) -> Result<Incident, Down> { Err(Down) }

  async fn get(&self, _id: i64) -> Result<Option<Incident>, Down> { Err(Down) }

  async fn update(
    &self,
    _id: i64,
    _changes: IncidentChanges,
  ) -> Result<Option<Incident>, Down> {
    Err(Down)
  }

  async fn archive(&self, _id: i64) -> Result<Option<Incident>, Down> { Err(Down) }

  async fn list(&self, _include_archived: bool) -> Result<Vec<Incident>, Down> {
    Err(Down)
  }

  async fn ping(&self) -> Result<(), Down> { Err(Down) }
}

#[tokio::test]
async fn unreachable_store_degrades_health_and_fails_requests() {
  let app = api_router(IncidentService::new(Arc::new(DownStore)));

  let (status, body) = send(&app, "GET", "/health", None).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
  assert_eq!(body, json!({ "status": "degraded", "db": "down" }));

  let (status, body) = send(&app, "GET", "/incidents", None).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["error"]["code"], "http_error");
}
