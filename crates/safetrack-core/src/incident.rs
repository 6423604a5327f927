//! The incident record and the inputs used to create one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, FieldError, Result};

/// Status assigned to new incidents when the reporter does not supply one.
pub const STATUS_OPEN: &str = "Open";

/// The one status value with timestamp semantics attached. Matched exactly
/// and case-sensitively.
pub const STATUS_RESOLVED: &str = "Resolved";

// ─── Incident ────────────────────────────────────────────────────────────────

/// A single reported safety event, as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
  /// Store-assigned; never changes.
  pub id:          i64,
  pub location:    String,
  pub category:    String,
  pub severity:    String,
  pub description: String,
  /// Free-form workflow status, e.g. "Open", "Investigating", "Resolved".
  pub status:      String,
  pub reported_by: Option<String>,
  pub photo_url:   Option<String>,
  /// Soft-delete flag. Only the archive operation sets it.
  pub is_archived: bool,
  /// Server-assigned at insertion.
  pub created_at:  DateTime<Utc>,
  /// Server-refreshed on every persisted write.
  pub updated_at:  DateTime<Utc>,
  /// Set when a patch moves the incident to [`STATUS_RESOLVED`], cleared when
  /// a patch moves it anywhere else.
  pub resolved_at: Option<DateTime<Utc>>,
}

impl Incident {
  pub fn is_resolved(&self) -> bool { self.status == STATUS_RESOLVED }
}

// ─── NewIncident ─────────────────────────────────────────────────────────────

/// Validated input to [`crate::store::IncidentStore::insert`].
///
/// `id`, `created_at` and `updated_at` are assigned by the store. A new
/// incident always starts unarchived with no `resolved_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
  pub location:    String,
  pub category:    String,
  pub severity:    String,
  pub description: String,
  pub status:      String,
  pub reported_by: Option<String>,
  pub photo_url:   Option<String>,
}

impl NewIncident {
  /// Convenience constructor with status `"Open"` and no optional fields.
  pub fn new(
    location: impl Into<String>,
    category: impl Into<String>,
    severity: impl Into<String>,
    description: impl Into<String>,
  ) -> Self {
    Self {
      location:    location.into(),
      category:    category.into(),
      severity:    severity.into(),
      description: description.into(),
      status:      STATUS_OPEN.to_owned(),
      reported_by: None,
      photo_url:   None,
    }
  }
}

// ─── CreateIncident ──────────────────────────────────────────────────────────

/// The unvalidated body of a create request.
///
/// Every field is optional at this stage so that missing required fields can
/// be reported together instead of failing on the first one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateIncident {
  pub location:    Option<String>,
  pub category:    Option<String>,
  pub severity:    Option<String>,
  pub description: Option<String>,
  pub status:      Option<String>,
  pub reported_by: Option<String>,
  pub photo_url:   Option<String>,
}

impl CreateIncident {
  /// Check required fields and fill defaults.
  ///
  /// `status` falls back to `"Open"`. A supplied `"Resolved"` status is kept
  /// as-is and does not populate `resolved_at`.
  pub fn validate(self) -> Result<NewIncident> {
    let details: Vec<FieldError> = [
      ("location", self.location.is_none()),
      ("category", self.category.is_none()),
      ("severity", self.severity.is_none()),
      ("description", self.description.is_none()),
    ]
    .into_iter()
    .filter(|(_, missing)| *missing)
    .map(|(field, _)| FieldError::new(field, "field required"))
    .collect();

    match (self.location, self.category, self.severity, self.description) {
      (Some(location), Some(category), Some(severity), Some(description)) => {
        Ok(NewIncident {
          location,
          category,
          severity,
          description,
          status: self.status.unwrap_or_else(|| STATUS_OPEN.to_owned()),
          reported_by: self.reported_by,
          photo_url: self.photo_url,
        })
      }
      _ => Err(Error::invalid("missing required fields", details)),
    }
  }
}
