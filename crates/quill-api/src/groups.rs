//! Handlers for `/groups` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/groups` | All groups by title |
//! | `GET`  | `/groups/:slug` | Group + its posts; `?page=`; 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
};
use quill_core::{group::Group, post::Post, store::BlogStore};
use serde::Serialize;

use crate::{
  error::ApiError,
  extract::ResourcePath,
  page::{PageBody, PageQuery},
};

/// `GET /groups`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Group>>, ApiError>
where
  S: BlogStore,
{
  let groups = store.list_groups().await.map_err(ApiError::store)?;
  Ok(Json(groups))
}

#[derive(Debug, Serialize)]
pub struct GroupPage {
  pub group: Group,
  pub page:  PageBody<Post>,
}

/// `GET /groups/:slug[?page=<n>]`
pub async fn posts<S>(
  State(store): State<Arc<S>>,
  ResourcePath(slug): ResourcePath<String>,
  query: PageQuery,
) -> Result<Json<GroupPage>, ApiError>
where
  S: BlogStore,
{
  let group = store
    .get_group_by_slug(&slug)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("group {slug:?} not found")))?;

  let posts = store
    .group_posts(group.group_id)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(GroupPage { group, page: query.apply(posts) }))
}
