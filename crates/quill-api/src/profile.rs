//! Author profiles, following, and the feed.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profile/:username` | Author, post count, posts; `?page=` |
//! | `POST` | `/profile/:username/follow` | Viewer required; 204 |
//! | `POST` | `/profile/:username/unfollow` | Viewer required; 204 |
//! | `GET`  | `/follow` | Viewer required; the viewer's feed; `?page=` |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
};
use quill_core::{post::Post, store::BlogStore, user::User};
use serde::Serialize;

use crate::{
  error::ApiError,
  extract::ResourcePath,
  page::{PageBody, PageQuery},
  viewer::{MaybeViewer, Viewer},
};

async fn load_author<S: BlogStore>(store: &S, username: &str) -> Result<User, ApiError> {
  store
    .get_user_by_username(username)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {username:?} not found")))
}

// ─── Profile ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Profile {
  pub author:      User,
  /// Full name, or the username when the author gave none.
  pub author_name: String,
  pub posts_count: usize,
  /// Whether the viewer follows this author; absent for anonymous requests.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub following:   Option<bool>,
  pub page:        PageBody<Post>,
}

/// `GET /profile/:username[?page=<n>]`
pub async fn show<S>(
  State(store): State<Arc<S>>,
  MaybeViewer(viewer): MaybeViewer,
  ResourcePath(username): ResourcePath<String>,
  query: PageQuery,
) -> Result<Json<Profile>, ApiError>
where
  S: BlogStore,
{
  let author = load_author(store.as_ref(), &username).await?;

  let posts = store
    .author_posts(author.user_id)
    .await
    .map_err(ApiError::store)?;
  let posts_count = store
    .count_author_posts(author.user_id)
    .await
    .map_err(ApiError::store)?;

  let following = match viewer {
    Some(viewer) => Some(
      store
        .is_following(viewer.user_id, author.user_id)
        .await
        .map_err(ApiError::store)?,
    ),
    None => None,
  };

  Ok(Json(Profile {
    author_name: author.display_name(),
    author,
    posts_count,
    following,
    page: query.apply(posts),
  }))
}

// ─── Follow / unfollow ────────────────────────────────────────────────────────

/// `POST /profile/:username/follow`
///
/// Following yourself succeeds without creating anything.
pub async fn follow<S>(
  State(store): State<Arc<S>>,
  Viewer(viewer): Viewer,
  ResourcePath(username): ResourcePath<String>,
) -> Result<StatusCode, ApiError>
where
  S: BlogStore,
{
  let author = load_author(store.as_ref(), &username).await?;
  if author.user_id == viewer.user_id {
    tracing::debug!(user = %viewer.username, "ignoring self-follow");
    return Ok(StatusCode::NO_CONTENT);
  }

  store
    .follow(viewer.user_id, author.user_id)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(follower = %viewer.username, author = %author.username, "follow");
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /profile/:username/unfollow`
pub async fn unfollow<S>(
  State(store): State<Arc<S>>,
  Viewer(viewer): Viewer,
  ResourcePath(username): ResourcePath<String>,
) -> Result<StatusCode, ApiError>
where
  S: BlogStore,
{
  let author = load_author(store.as_ref(), &username).await?;

  store
    .unfollow(viewer.user_id, author.user_id)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(follower = %viewer.username, author = %author.username, "unfollow");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Feed ─────────────────────────────────────────────────────────────────────

/// `GET /follow[?page=<n>]`
pub async fn feed<S>(
  State(store): State<Arc<S>>,
  Viewer(viewer): Viewer,
  query: PageQuery,
) -> Result<Json<PageBody<Post>>, ApiError>
where
  S: BlogStore,
{
  let posts = store.feed(viewer.user_id).await.map_err(ApiError::store)?;
  Ok(Json(query.apply(posts)))
}
