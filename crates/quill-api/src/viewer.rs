//! Extractors for the requesting user.
//!
//! Authentication happens upstream: a fronting proxy verifies the session and
//! forwards the username in [`REMOTE_USER_HEADER`]. These extractors only
//! resolve that name to a stored [`User`].

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use quill_core::{store::BlogStore, user::User};

use crate::error::ApiError;

/// Header carrying the authenticated username.
pub const REMOTE_USER_HEADER: &str = "x-remote-user";

/// The authenticated user. Rejects with 401 when absent or unknown.
pub struct Viewer(pub User);

/// The authenticated user, if any. Anonymous requests yield `None`.
pub struct MaybeViewer(pub Option<User>);

async fn resolve<S>(parts: &Parts, store: &S) -> Result<Option<User>, ApiError>
where
  S: BlogStore,
{
  let Some(value) = parts.headers.get(REMOTE_USER_HEADER) else {
    return Ok(None);
  };
  let username = value.to_str().map_err(|_| ApiError::Unauthorized)?.trim();
  if username.is_empty() {
    return Ok(None);
  }

  let user = store
    .get_user_by_username(username)
    .await
    .map_err(ApiError::store)?;
  if user.is_none() {
    tracing::warn!(username, "remote user is not registered");
    return Err(ApiError::Unauthorized);
  }
  Ok(user)
}

impl<S> FromRequestParts<Arc<S>> for Viewer
where
  S: BlogStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    resolve(parts, state.as_ref())
      .await?
      .map(Viewer)
      .ok_or(ApiError::Unauthorized)
  }
}

impl<S> FromRequestParts<Arc<S>> for MaybeViewer
where
  S: BlogStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(MaybeViewer(resolve(parts, state.as_ref()).await?))
  }
}
