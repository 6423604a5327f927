//! Error types for `safetrack-core`.

use serde::Serialize;
use thiserror::Error;

/// A validation problem attached to a single request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("incident {0} not found")]
  NotFound(i64),

  /// The request was well-formed JSON but violates a field rule.
  #[error("{message}")]
  InvalidRequest {
    message: String,
    details: Vec<FieldError>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn invalid(message: impl Into<String>, details: Vec<FieldError>) -> Self {
    Self::InvalidRequest { message: message.into(), details }
  }

  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
