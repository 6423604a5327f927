//! safetrack server binary.
//!
//! Reads `safetrack.toml` (or the path specified with `--config`), opens the
//! SQLite store, and either serves the HTTP API or seeds demo data.
//!
//! ```
//! cargo run -p safetrack-server -- seed
//! cargo run -p safetrack-server -- serve
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use safetrack_core::service::IncidentService;
use safetrack_server::{ServerConfig, load_config, seed::seed};
use safetrack_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "SafeTrack incident API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "safetrack.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Default)]
enum Command {
  /// Serve the HTTP API (the default).
  #[default]
  Serve,
  /// Create the schema and insert demo incidents.
  Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = load_config(&cli.config)?;

  let store = SqliteStore::open(&server_cfg.database_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.database_path)
    })?;

  match cli.command.unwrap_or_default() {
    Command::Serve => serve(store, &server_cfg).await,
    Command::Seed => {
      let count = seed(&store).await.context("failed to seed demo data")?;
      println!("Seeded {count} incidents.");
      Ok(())
    }
  }
}

async fn serve(store: SqliteStore, server_cfg: &ServerConfig) -> anyhow::Result<()> {
  let service = IncidentService::new(Arc::new(store));
  let app = safetrack_server::app(service, server_cfg)?;
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
