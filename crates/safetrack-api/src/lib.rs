//! JSON REST API for SafeTrack.
//!
//! Exposes an axum [`Router`] backed by any
//! [`safetrack_core::store::IncidentStore`]. CORS, request tracing and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = safetrack_api::api_router(IncidentService::new(store));
//! ```

pub mod error;
pub mod health;
pub mod incidents;

use axum::{Router, routing::get};
use safetrack_core::{service::IncidentService, store::IncidentStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// Unknown paths answer with a `not_found` envelope and unsupported methods
/// with an `http_error` one, so clients only ever see one error shape.
pub fn api_router<S>(service: IncidentService<S>) -> Router<()>
where
  S: IncidentStore + 'static,
{
  Router::new()
    .route("/health", get(health::handler::<S>))
    .route(
      "/incidents",
      get(incidents::list::<S>).post(incidents::create::<S>),
    )
    .route(
      "/incidents/{id}",
      get(incidents::get_one::<S>)
        .patch(incidents::patch_one::<S>)
        .put(incidents::patch_one::<S>)
        .delete(incidents::archive_one::<S>),
    )
    .fallback(not_found)
    .method_not_allowed_fallback(method_not_allowed)
    .with_state(service)
}

async fn not_found() -> ApiError { ApiError::NotFound("resource not found".to_owned()) }

async fn method_not_allowed() -> ApiError { ApiError::MethodNotAllowed }

#[cfg(test)]
mod tests;
