//! The `IncidentStore` trait.
//!
//! Implemented by storage backends (e.g. `safetrack-store-sqlite`). The
//! service layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::incident::{Incident, NewIncident};

// ─── Column changes ──────────────────────────────────────────────────────────

/// The columns a single [`IncidentStore::update`] writes.
///
/// `None` leaves a column as it is in the store, so two writers touching
/// different columns never undo each other. For nullable columns
/// `Some(None)` writes `NULL`. There is no `is_archived` field; only
/// [`IncidentStore::archive`] changes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentChanges {
  pub location:    Option<String>,
  pub category:    Option<String>,
  pub severity:    Option<String>,
  pub description: Option<String>,
  pub status:      Option<String>,
  pub reported_by: Option<Option<String>>,
  pub photo_url:   Option<Option<String>>,
  pub resolved_at: Option<Option<DateTime<Utc>>>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a SafeTrack persistence backend.
///
/// The store owns identity and bookkeeping timestamps: it assigns `id` and
/// `created_at` on insert and refreshes `updated_at` on every write. Callers
/// never supply those values.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait IncidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new incident and return the stored snapshot.
  fn insert(
    &self,
    input: NewIncident,
  ) -> impl Future<Output = Result<Incident, Self::Error>> + Send + '_;

  /// Retrieve an incident by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  /// Write only the columns named in `changes`, refresh `updated_at`, and
  /// return the re-read snapshot. Returns `None` if the row does not exist.
  fn update(
    &self,
    id: i64,
    changes: IncidentChanges,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  /// Set `is_archived`, refresh `updated_at`, and return the re-read
  /// snapshot. Archiving an archived row succeeds. Returns `None` if the
  /// row does not exist.
  fn archive(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  /// All incidents, most recently created (highest id) first.
  fn list(
    &self,
    include_archived: bool,
  ) -> impl Future<Output = Result<Vec<Incident>, Self::Error>> + Send + '_;

  /// Cheap round trip used by the health check.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
