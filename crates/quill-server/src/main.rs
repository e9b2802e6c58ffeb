//! quill server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP.
//!
//! Users and groups are administered out of band:
//!
//! ```text
//! quill add-user auth --first-name Leo --email leo@example.com
//! quill add-group test-slug "Test group" --description "About tests"
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use quill_core::{group::NewGroup, store::BlogStore, user::NewUser};
use quill_server::ServerConfig;
use quill_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Quill blog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Register a user so the auth proxy can map sessions onto it.
  AddUser {
    username:   String,
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name:  String,
    #[arg(long)]
    email:      Option<String>,
  },
  /// Create a group posts can be filed under.
  AddGroup {
    slug:        String,
    title:       String,
    #[arg(long, default_value = "")]
    description: String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&server_cfg, store).await,
    Command::AddUser { username, first_name, last_name, email } => {
      let user = store
        .add_user(NewUser { username, first_name, last_name, email })
        .await
        .context("failed to add user")?;
      tracing::info!(user_id = %user.user_id, username = %user.username, "user added");
      Ok(())
    }
    Command::AddGroup { slug, title, description } => {
      let group = store
        .add_group(NewGroup { title, slug, description })
        .await
        .context("failed to add group")?;
      tracing::info!(group_id = %group.group_id, slug = %group.slug, "group added");
      Ok(())
    }
  }
}

async fn serve(cfg: &ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  let app = quill_server::router(Arc::new(store));
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
