//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error leaves the server in the same envelope:
//!
//! ```json
//! {"error": {"code": "bad_request", "message": "...", "details": [...]}}
//! ```

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use safetrack_core::FieldError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{message}")]
  BadRequest {
    message: String,
    details: Vec<FieldError>,
  },

  #[error("{0}")]
  NotFound(String),

  #[error("method not allowed")]
  MethodNotAllowed,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::BadRequest { message: message.into(), details: Vec::new() }
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn code(&self) -> &'static str {
    match self {
      Self::BadRequest { .. } => "bad_request",
      Self::NotFound(_) => "not_found",
      Self::MethodNotAllowed | Self::Store(_) => "http_error",
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let code = self.code();

    let message = match &self {
      Self::Store(e) => {
        tracing::error!(error = %e, "store failure while handling request");
        "internal server error".to_owned()
      }
      other => other.to_string(),
    };

    let mut error = json!({ "code": code, "message": message });
    if let Self::BadRequest { details, .. } = &self
      && !details.is_empty()
    {
      error["details"] = json!(details);
    }

    (status, Json(json!({ "error": error }))).into_response()
  }
}

impl From<safetrack_core::Error> for ApiError {
  fn from(e: safetrack_core::Error) -> Self {
    use safetrack_core::Error as Core;
    match e {
      Core::NotFound(_) => Self::NotFound("Incident not found".to_owned()),
      Core::InvalidRequest { message, details } => {
        Self::BadRequest { message, details }
      }
      Core::Store(e) => Self::Store(e),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { Self::bad_request(r.body_text()) }
}
