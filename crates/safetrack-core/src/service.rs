//! [`IncidentService`] — the business rules on top of an [`IncidentStore`].

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::{
  Error, Result,
  incident::{CreateIncident, Incident},
  patch::IncidentPatch,
  store::IncidentStore,
};

/// Reachability of the backing store, as reported by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreHealth {
  Up,
  Down,
}

/// Validates requests, derives status timestamps and issues the store calls
/// for every incident operation.
///
/// Writes go to the store as column-level changes rather than whole rows, so
/// a patch never undoes an archive or a patch to other fields that landed
/// in between. Two patches to the same field resolve last-write-wins.
pub struct IncidentService<S> {
  store: Arc<S>,
}

impl<S> Clone for IncidentService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: IncidentStore> IncidentService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Validate and insert a new incident.
  pub async fn create(&self, input: CreateIncident) -> Result<Incident> {
    let new = input.validate()?;
    let incident = self.store.insert(new).await.map_err(Error::store)?;
    tracing::info!(
      incident_id = incident.id,
      status = %incident.status,
      "created incident"
    );
    Ok(incident)
  }

  pub async fn get(&self, id: i64) -> Result<Incident> {
    self
      .store
      .get(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))
  }

  /// Every incident, newest first. Archived ones only when asked for.
  pub async fn list(&self, include_archived: bool) -> Result<Vec<Incident>> {
    let incidents =
      self.store.list(include_archived).await.map_err(Error::store)?;
    tracing::debug!(count = incidents.len(), include_archived, "listed incidents");
    Ok(incidents)
  }

  /// Apply a partial update.
  ///
  /// `resolved_at` is stamped from the server clock whenever the patch sets
  /// status to `"Resolved"` and cleared whenever it sets any other status,
  /// in the same write as the status change.
  pub async fn apply_patch(
    &self,
    id: i64,
    patch: IncidentPatch,
  ) -> Result<Incident> {
    patch.validate()?;

    let fields = patch.field_names();
    let incident = self
      .store
      .update(id, patch.into_changes(Utc::now()))
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))?;
    tracing::info!(
      incident_id = id,
      fields = ?fields,
      status = %incident.status,
      "updated incident"
    );
    Ok(incident)
  }

  /// Flag an incident as archived. Archiving twice is not an error.
  pub async fn archive(&self, id: i64) -> Result<Incident> {
    let incident = self
      .store
      .archive(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(id))?;
    tracing::info!(incident_id = id, "archived incident");
    Ok(incident)
  }

  pub async fn health(&self) -> StoreHealth {
    match self.store.ping().await {
      Ok(()) => StoreHealth::Up,
      Err(e) => {
        tracing::warn!(error = %e, "store health check failed");
        StoreHealth::Down
      }
    }
  }
}
