//! Extractors that report malformed input as [`ApiError`] instead of axum's
//! plain-text rejections.

use axum::{
  Json,
  extract::{
    FromRequest, FromRequestParts, Path, Request,
    rejection::{JsonRejection, PathRejection},
  },
  http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body. Missing fields, syntax errors and a missing
/// `Content-Type` are all 400s.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
  S: Send + Sync,
  T: DeserializeOwned,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state)
      .await
      .map_err(|e: JsonRejection| ApiError::BadRequest(e.body_text()))?;
    Ok(JsonBody(value))
  }
}

/// Path parameters identifying a resource. A segment that does not parse
/// (e.g. a non-UUID post id) cannot name an existing resource, so it is a 404.
#[derive(Debug, Clone)]
pub struct ResourcePath<T>(pub T);

impl<S, T> FromRequestParts<S> for ResourcePath<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Send,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(value) = Path::<T>::from_request_parts(parts, state)
      .await
      .map_err(|e: PathRejection| ApiError::NotFound(e.body_text()))?;
    Ok(ResourcePath(value))
  }
}
