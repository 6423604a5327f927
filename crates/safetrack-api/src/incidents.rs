//! Handlers for `/incidents` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/incidents` | Optional `?include_archived=true` |
//! | `POST` | `/incidents` | Body: [`CreateIncident`]; 400 on missing required fields |
//! | `GET`  | `/incidents/:id` | 404 if not found |
//! | `PATCH`, `PUT` | `/incidents/:id` | Body: [`IncidentPatch`]; 400 on empty patch |
//! | `DELETE` | `/incidents/:id` | Archives; the row is kept |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
};
use safetrack_core::{
  incident::{CreateIncident, Incident},
  patch::IncidentPatch,
  service::IncidentService,
  store::IncidentStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// If `true`, archived incidents are included. Default `false`.
  #[serde(default)]
  pub include_archived: bool,
}

/// `GET /incidents[?include_archived=true]`
pub async fn list<S>(
  State(service): State<IncidentService<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Incident>>, ApiError>
where
  S: IncidentStore + 'static,
{
  let Query(params) = params?;
  Ok(Json(service.list(params.include_archived).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /incidents`
pub async fn create<S>(
  State(service): State<IncidentService<S>>,
  body: Result<Json<CreateIncident>, JsonRejection>,
) -> Result<Json<Incident>, ApiError>
where
  S: IncidentStore + 'static,
{
  let Json(body) = body?;
  Ok(Json(service.create(body).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /incidents/:id`
pub async fn get_one<S>(
  State(service): State<IncidentService<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Incident>, ApiError>
where
  S: IncidentStore + 'static,
{
  let Path(id) = id?;
  Ok(Json(service.get(id).await?))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /incidents/:id` (also mounted as `PUT`).
pub async fn patch_one<S>(
  State(service): State<IncidentService<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<IncidentPatch>, JsonRejection>,
) -> Result<Json<Incident>, ApiError>
where
  S: IncidentStore + 'static,
{
  let Path(id) = id?;
  let Json(patch) = body?;
  Ok(Json(service.apply_patch(id, patch).await?))
}

// ─── Archive ──────────────────────────────────────────────────────────────────

/// `DELETE /incidents/:id` — flags the incident as archived.
pub async fn archive_one<S>(
  State(service): State<IncidentService<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Incident>, ApiError>
where
  S: IncidentStore + 'static,
{
  let Path(id) = id?;
  Ok(Json(service.archive(id).await?))
}
