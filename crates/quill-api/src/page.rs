//! Shared `?page=` handling for paginated listings.

use std::convert::Infallible;

use axum::{
  extract::{FromRequestParts, Query},
  http::request::Parts,
};
use quill_core::{Page, paginate};
use serde::Serialize;

/// `?page=` of a paginated endpoint. The value is kept raw; [`paginate`]
/// decides how to clamp it. When the parameter repeats, the last one wins,
/// and an unparseable query string counts as no page at all.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageQuery {
  pub page: Option<String>,
}

impl<S> FromRequestParts<S> for PageQuery
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
      .map(|Query(pairs)| pairs)
      .unwrap_or_default();
    let page = pairs
      .into_iter()
      .rev()
      .find_map(|(key, value)| (key == "page").then_some(value));
    Ok(Self { page })
  }
}

impl PageQuery {
  pub fn apply<T>(&self, items: Vec<T>) -> PageBody<T> {
    paginate(items, self.page.as_deref()).into()
  }
}

/// JSON shape of one page.
#[derive(Debug, Serialize)]
pub struct PageBody<T> {
  pub items:        Vec<T>,
  pub page_count:   usize,
  pub number:       usize,
  pub has_next:     bool,
  pub has_previous: bool,
}

impl<T> From<Page<T>> for PageBody<T> {
  fn from(page: Page<T>) -> Self {
    Self {
      has_next:     page.has_next(),
      has_previous: page.has_previous(),
      page_count:   page.page_count,
      number:       page.number,
      items:        page.items,
    }
  }
}
