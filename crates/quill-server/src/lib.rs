//! HTTP server wiring for Quill.
//!
//! Loads [`ServerConfig`], and builds the top-level axum [`Router`] around
//! [`quill_api::api_router`] with request tracing and a JSON 404 fallback.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Json, Router,
  http::{StatusCode, Uri},
  response::IntoResponse,
};
use quill_core::store::BlogStore;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `QUILL_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; a leading `~/` expands to `$HOME`.
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Layer defaults, the optional TOML file at `path`, and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8000)?
      .set_default("store_path", "quill.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("QUILL"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~/` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: BlogStore + 'static,
{
  Router::new()
    .merge(quill_api::api_router(store))
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: Uri) -> impl IntoResponse {
  tracing::debug!(%uri, "no route");
  (
    StatusCode::NOT_FOUND,
    Json(json!({ "error": format!("no route for {}", uri.path()) })),
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────
