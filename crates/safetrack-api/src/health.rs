//! Handler for `GET /health`.

use axum::{Json, extract::State, http::StatusCode};
use safetrack_core::{
  service::{IncidentService, StoreHealth},
  store::IncidentStore,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthBody {
  pub status: &'static str,
  pub db:     StoreHealth,
}

/// `GET /health` — 200 when the store answers, 503 otherwise.
pub async fn handler<S>(
  State(service): State<IncidentService<S>>,
) -> (StatusCode, Json<HealthBody>)
where
  S: IncidentStore + 'static,
{
  match service.health().await {
    StoreHealth::Up => {
      (StatusCode::OK, Json(HealthBody { status: "ok", db: StoreHealth::Up }))
    }
    StoreHealth::Down => (
      StatusCode::SERVICE_UNAVAILABLE,
      Json(HealthBody { status: "degraded", db: StoreHealth::Down }),
    ),
  }
}
