//! Core types and business rules for the SafeTrack incident tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend plugs in through [`store::IncidentStore`]; the HTTP layer
//! drives [`service::IncidentService`].

pub mod error;
pub mod incident;
pub mod patch;
pub mod service;
pub mod store;

pub use error::{Error, FieldError, Result};
