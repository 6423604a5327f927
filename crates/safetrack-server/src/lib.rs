//! Server assembly for SafeTrack: configuration, HTTP middleware and demo
//! data. The `safetrack` binary in `main.rs` is a thin CLI over this crate.

pub mod seed;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use axum::{
  Router,
  http::{HeaderValue, Method},
};
use safetrack_core::{service::IncidentService, store::IncidentStore};
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `safetrack.toml` and
/// `SAFETRACK_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
  /// Origins allowed by CORS. A single `"*"` allows any origin.
  pub cors_origins:  Vec<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          8000,
      database_path: PathBuf::from("safetrack.db"),
      cors_origins:  vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
      ],
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Layer the optional TOML file at `path` under `SAFETRACK_*` environment
/// variables. `SAFETRACK_CORS_ORIGINS` is split on commas.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("SAFETRACK")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors_origins"),
    )
    .build()
    .context("failed to read config file")?;

  let mut cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  cfg.database_path = expand_tilde(&cfg.database_path);
  Ok(cfg)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// CORS policy for the browser front end.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
  let layer = CorsLayer::new()
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::PATCH,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers(Any);

  if origins.iter().any(|o| o == "*") {
    return Ok(layer.allow_origin(Any));
  }

  let origins = origins
    .iter()
    .map(|o| {
      o.parse::<HeaderValue>()
        .with_context(|| format!("invalid CORS origin {o:?}"))
    })
    .collect::<anyhow::Result<Vec<_>>>()?;
  Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// The complete application: API routes wrapped in CORS and request tracing.
pub fn app<S>(
  service: IncidentService<S>,
  config: &ServerConfig,
) -> anyhow::Result<Router>
where
  S: IncidentStore + 'static,
{
  Ok(
    safetrack_api::api_router(service)
      .layer(cors_layer(&config.cors_origins)?)
      .layer(TraceLayer::new_for_http()),
  )
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use safetrack_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn test_app(origins: &[&str]) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let config = ServerConfig {
      cors_origins: origins.iter().map(|o| o.to_string()).collect(),
      ..ServerConfig::default()
    };
    app(IncidentService::new(Arc::new(store)), &config).unwrap()
  }

  fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
      .method("OPTIONS")
      .uri("/incidents")
      .header(header::ORIGIN, origin)
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
      .body(Body::empty())
      .unwrap()
  }

  #[tokio::test]
  async fn preflight_from_configured_origin_is_allowed() {
    let app = test_app(&["http://localhost:5173"]).await;
    let resp = app.oneshot(preflight("http://localhost:5173")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "http://localhost:5173"
    );
  }

  #[tokio::test]
  async fn preflight_from_other_origin_gets_no_allow_header() {
    let app = test_app(&["http://localhost:5173"]).await;
    let resp = app.oneshot(preflight("http://evil.example")).await.unwrap();
    assert!(
      !resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
  }

  #[tokio::test]
  async fn wildcard_origin_allows_any() {
    let app = test_app(&["*"]).await;
    let resp = app.oneshot(preflight("http://anywhere.example")).await.unwrap();
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "*"
    );
  }

  #[test]
  fn invalid_origin_is_rejected() {
    assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
  }

  #[test]
  fn missing_config_file_falls_back_to_defaults() {
    let cfg = load_config(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.port, ServerConfig::default().port);
    assert_eq!(cfg.address(), format!("{}:{}", cfg.host, cfg.port));
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/data/safetrack.db")),
      PathBuf::from(home).join("data/safetrack.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs.db")), PathBuf::from("/abs.db"));
  }
}
