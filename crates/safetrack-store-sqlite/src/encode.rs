//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use safetrack_core::{incident::Incident, store::IncidentChanges};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Column changes ──────────────────────────────────────────────────────────

/// `(column, value)` pairs for the columns `changes` touches, in table order.
pub fn encode_changes(changes: IncidentChanges) -> Vec<(&'static str, Value)> {
  let mut cols: Vec<(&'static str, Value)> = Vec::new();

  let required = [
    ("location", changes.location),
    ("category", changes.category),
    ("severity", changes.severity),
    ("description", changes.description),
    ("status", changes.status),
  ];
  for (col, value) in required {
    if let Some(v) = value {
      cols.push((col, Value::from(v)));
    }
  }

  let nullable = [
    ("reported_by", changes.reported_by),
    ("photo_url", changes.photo_url),
    ("resolved_at", changes.resolved_at.map(|t| t.map(encode_dt))),
  ];
  for (col, value) in nullable {
    if let Some(v) = value {
      cols.push((col, Value::from(v)));
    }
  }

  cols
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every query that produces a [`RawIncident`].
pub const INCIDENT_COLUMNS: &str = "id, location, category, severity, \
   description, status, reported_by, photo_url, is_archived, created_at, \
   updated_at, resolved_at";

/// Raw values read directly from an `incidents` row.
pub struct RawIncident {
  pub id:          i64,
  pub location:    String,
  pub category:    String,
  pub severity:    String,
  pub description: String,
  pub status:      String,
  pub reported_by: Option<String>,
  pub photo_url:   Option<String>,
  pub is_archived: bool,
  pub created_at:  String,
  pub updated_at:  String,
  pub resolved_at: Option<String>,
}

impl RawIncident {
  /// Map a row selected with [`INCIDENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      location:    row.get(1)?,
      category:    row.get(2)?,
      severity:    row.get(3)?,
      description: row.get(4)?,
      status:      row.get(5)?,
      reported_by: row.get(6)?,
      photo_url:   row.get(7)?,
      is_archived: row.get(8)?,
      created_at:  row.get(9)?,
      updated_at:  row.get(10)?,
      resolved_at: row.get(11)?,
    })
  }

  pub fn into_incident(self) -> Result<Incident> {
    Ok(Incident {
      id:          self.id,
      location:    self.location,
      category:    self.category,
      severity:    self.severity,
      description: self.description,
      status:      self.status,
      reported_by: self.reported_by,
      photo_url:   self.photo_url,
      is_archived: self.is_archived,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
      resolved_at: self.resolved_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
