//! Handlers for `/posts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/posts` | All posts, newest first; `?page=` |
//! | `POST` | `/posts` | Viewer required. Body: [`NewPost`]; returns 201 + post |
//! | `GET`  | `/posts/:id` | Post, author's post count and comments |
//! | `PUT`  | `/posts/:id` | Author only. Body: [`NewPost`] |
//! | `GET`  | `/posts/:id/comments` | Oldest first |
//! | `POST` | `/posts/:id/comments` | Viewer required. Body: [`NewComment`] |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use quill_core::{
  post::{Comment, NewComment, NewPost, Post},
  store::BlogStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{JsonBody, ResourcePath},
  page::{PageBody, PageQuery},
  viewer::Viewer,
};

async fn load_post<S: BlogStore>(store: &S, id: Uuid) -> Result<Post, ApiError> {
  store
    .get_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))
}

// ─── Index ────────────────────────────────────────────────────────────────────

/// `GET /posts[?page=<n>]`
pub async fn index<S>(
  State(store): State<Arc<S>>,
  query: PageQuery,
) -> Result<Json<PageBody<Post>>, ApiError>
where
  S: BlogStore,
{
  let posts = store.list_posts().await.map_err(ApiError::store)?;
  Ok(Json(query.apply(posts)))
}

// ─── Detail ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PostDetail {
  pub post:              Post,
  /// Total number of posts by the same author.
  pub author_post_count: usize,
  pub comments:          Vec<Comment>,
}

/// `GET /posts/:id`
pub async fn detail<S>(
  State(store): State<Arc<S>>,
  ResourcePath(id): ResourcePath<Uuid>,
) -> Result<Json<PostDetail>, ApiError>
where
  S: BlogStore,
{
  let post = load_post(store.as_ref(), id).await?;
  let author_post_count = store
    .count_author_posts(post.author.user_id)
    .await
    .map_err(ApiError::store)?;
  let comments = store.list_comments(id).await.map_err(ApiError::store)?;

  Ok(Json(PostDetail { post, author_post_count, comments }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /posts`: the viewer becomes the author.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Viewer(viewer): Viewer,
  JsonBody(body): JsonBody<NewPost>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BlogStore,
{
  let post = store
    .create_post(viewer.user_id, body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(post_id = %post.post_id, author = %viewer.username, "post created");
  Ok((StatusCode::CREATED, Json(post)))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `PUT /posts/:id`: only the author may edit. Text and group are replaced;
/// the image only when the body names a new one.
pub async fn edit<S>(
  State(store): State<Arc<S>>,
  Viewer(viewer): Viewer,
  ResourcePath(id): ResourcePath<Uuid>,
  JsonBody(body): JsonBody<NewPost>,
) -> Result<Json<Post>, ApiError>
where
  S: BlogStore,
{
  let post = load_post(store.as_ref(), id).await?;
  if post.author.user_id != viewer.user_id {
    return Err(ApiError::Forbidden(format!(
      "only {} may edit post {id}",
      post.author.username
    )));
  }

  let post = store.update_post(id, body).await.map_err(ApiError::store)?;
  tracing::info!(post_id = %id, "post edited");
  Ok(Json(post))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `GET /posts/:id/comments`
pub async fn comments<S>(
  State(store): State<Arc<S>>,
  ResourcePath(id): ResourcePath<Uuid>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: BlogStore,
{
  load_post(store.as_ref(), id).await?;
  let comments = store.list_comments(id).await.map_err(ApiError::store)?;
  Ok(Json(comments))
}

/// `POST /posts/:id/comments` returns 201 + the stored comment.
pub async fn add_comment<S>(
  State(store): State<Arc<S>>,
  Viewer(viewer): Viewer,
  ResourcePath(id): ResourcePath<Uuid>,
  JsonBody(body): JsonBody<NewComment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BlogStore,
{
  let comment = store
    .add_comment(id, viewer.user_id, body)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(post_id = %id, comment_id = %comment.comment_id, "comment added");
  Ok((StatusCode::CREATED, Json(comment)))
}
