//! [`SqliteStore`] — the SQLite implementation of [`IncidentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};

use safetrack_core::{
  incident::{Incident, NewIncident},
  store::{IncidentChanges, IncidentStore},
};

use crate::{
  Result,
  encode::{INCIDENT_COLUMNS, RawIncident, encode_changes, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A SafeTrack incident store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn select_one(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawIncident>> {
  conn
    .query_row(
      &format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?1"),
      rusqlite::params![id],
      RawIncident::from_row,
    )
    .optional()
}

// ─── IncidentStore impl ──────────────────────────────────────────────────────

impl IncidentStore for SqliteStore {
  type Error = crate::Error;

  async fn insert(&self, input: NewIncident) -> Result<Incident> {
    let now_str = encode_dt(Utc::now());

    let raw: RawIncident = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO incidents (
             location, category, severity, description, status,
             reported_by, photo_url, is_archived, created_at, updated_at,
             resolved_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8, NULL)",
          rusqlite::params![
            input.location,
            input.category,
            input.severity,
            input.description,
            input.status,
            input.reported_by,
            input.photo_url,
            now_str,
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
          &format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?1"),
          rusqlite::params![id],
          RawIncident::from_row,
        )?)
      })
      .await?;

    raw.into_incident()
  }

  async fn get(&self, id: i64) -> Result<Option<Incident>> {
    let raw: Option<RawIncident> = self
      .conn
      .call(move |conn| Ok(select_one(conn, id)?))
      .await?;

    raw.map(RawIncident::into_incident).transpose()
  }

  async fn update(
    &self,
    id: i64,
    changes: IncidentChanges,
  ) -> Result<Option<Incident>> {
    let now_str = encode_dt(Utc::now());

    // ?1 is the id; changed columns follow, then updated_at.
    let cols = encode_changes(changes);
    let mut assignments: Vec<String> = cols
      .iter()
      .enumerate()
      .map(|(i, (col, _))| format!("{col} = ?{}", i + 2))
      .collect();
    assignments.push(format!("updated_at = ?{}", cols.len() + 2));
    let sql = format!(
      "UPDATE incidents SET {} WHERE id = ?1",
      assignments.join(", ")
    );

    let mut params: Vec<Value> = Vec::with_capacity(cols.len() + 2);
    params.push(id.into());
    params.extend(cols.into_iter().map(|(_, v)| v));
    params.push(now_str.into());

    let raw: Option<RawIncident> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(&sql, rusqlite::params_from_iter(params))?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = select_one(&tx, id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawIncident::into_incident).transpose()
  }

  async fn archive(&self, id: i64) -> Result<Option<Incident>> {
    let now_str = encode_dt(Utc::now());

    let raw: Option<RawIncident> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE incidents SET is_archived = 1, updated_at = ?2 WHERE id = ?1",
          rusqlite::params![id, now_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = select_one(&tx, id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawIncident::into_incident).transpose()
  }

  async fn list(&self, include_archived: bool) -> Result<Vec<Incident>> {
    let raws: Vec<RawIncident> = self
      .conn
      .call(move |conn| {
        let filter = if include_archived { "" } else { "WHERE is_archived = 0" };
        let mut stmt = conn.prepare(&format!(
          "SELECT {INCIDENT_COLUMNS} FROM incidents {filter} ORDER BY id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawIncident::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncident::into_incident).collect()
  }

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
