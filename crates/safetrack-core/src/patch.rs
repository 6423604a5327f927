//! Partial updates.
//!
//! A patch only carries the fields the caller actually sent. Each field is a
//! [`Patch`], which keeps "not sent" apart from "sent as `null`" — plain
//! `Option` cannot tell those two apart once deserialised.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::{
  Error, FieldError, Result, incident::STATUS_RESOLVED, store::IncidentChanges,
};

// ─── Patch<T> ────────────────────────────────────────────────────────────────

/// Presence-tracking wrapper for a single patch field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
  /// The key was not in the request body.
  Absent,
  /// The key was present with an explicit `null`.
  Null,
  Value(T),
}

impl<T> Default for Patch<T> {
  fn default() -> Self { Self::Absent }
}

impl<T> From<T> for Patch<T> {
  fn from(value: T) -> Self { Self::Value(value) }
}

impl<T> Patch<T> {
  pub fn is_present(&self) -> bool { !matches!(self, Self::Absent) }

  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

  /// Column value for a non-nullable field. `Null` is treated like
  /// `Absent`; [`IncidentPatch::validate`] rejects it beforehand.
  pub fn into_required(self) -> Option<T> {
    match self {
      Self::Value(v) => Some(v),
      Self::Absent | Self::Null => None,
    }
  }

  /// Column value for a nullable field: `Some(None)` writes `NULL`.
  pub fn into_optional(self) -> Option<Option<T>> {
    match self {
      Self::Absent => None,
      Self::Null => Some(None),
      Self::Value(v) => Some(Some(v)),
    }
  }
}

// Used together with `#[serde(default)]`: a missing key never reaches this
// impl and stays `Absent`.
impl<'de, T> Deserialize<'de> for Patch<T>
where
  T: Deserialize<'de>,
{
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Ok(match Option::<T>::deserialize(deserializer)? {
      Some(v) => Self::Value(v),
      None => Self::Null,
    })
  }
}

// ─── IncidentPatch ───────────────────────────────────────────────────────────

/// The body of a partial-update request. Unknown keys are ignored, so an
/// attempt to flip `is_archived` or `resolved_at` through a patch is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IncidentPatch {
  pub location:    Patch<String>,
  pub category:    Patch<String>,
  pub severity:    Patch<String>,
  pub description: Patch<String>,
  pub status:      Patch<String>,
  pub reported_by: Patch<String>,
  pub photo_url:   Patch<String>,
}

impl IncidentPatch {
  /// Fields that reject an explicit `null`, paired with their values.
  fn non_nullable(&self) -> [(&'static str, &Patch<String>); 5] {
    [
      ("location", &self.location),
      ("category", &self.category),
      ("severity", &self.severity),
      ("description", &self.description),
      ("status", &self.status),
    ]
  }

  /// Names of every field present in the patch, in declaration order.
  pub fn field_names(&self) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = self
      .non_nullable()
      .into_iter()
      .filter(|(_, p)| p.is_present())
      .map(|(name, _)| name)
      .collect();
    if self.reported_by.is_present() {
      names.push("reported_by");
    }
    if self.photo_url.is_present() {
      names.push("photo_url");
    }
    names
  }

  pub fn is_empty(&self) -> bool { self.field_names().is_empty() }

  /// Reject empty patches and `null` for non-nullable columns.
  pub fn validate(&self) -> Result<()> {
    if self.is_empty() {
      return Err(Error::invalid("no fields to update", Vec::new()));
    }

    let details: Vec<FieldError> = self
      .non_nullable()
      .into_iter()
      .filter(|(_, p)| p.is_null())
      .map(|(name, _)| FieldError::new(name, "may not be null"))
      .collect();

    if details.is_empty() {
      Ok(())
    } else {
      Err(Error::invalid("invalid field values", details))
    }
  }

  /// The store write for this patch; fields that were not sent stay out of
  /// it.
  ///
  /// A present `status` also decides `resolved_at`: `now` for `"Resolved"`,
  /// `NULL` for anything else. Without `status`, `resolved_at` is not
  /// written. Call [`Self::validate`] first; a `null` on a non-nullable
  /// field is dropped here.
  pub fn into_changes(self, now: DateTime<Utc>) -> IncidentChanges {
    let status = self.status.into_required();
    let resolved_at = status
      .as_deref()
      .map(|s| (s == STATUS_RESOLVED).then_some(now));

    IncidentChanges {
      location: self.location.into_required(),
      category: self.category.into_required(),
      severity: self.severity.into_required(),
      description: self.description.into_required(),
      status,
      reported_by: self.reported_by.into_optional(),
      photo_url: self.photo_url.into_optional(),
      resolved_at,
    }
  }
}
