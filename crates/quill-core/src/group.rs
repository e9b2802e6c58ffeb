//! Groups: named topics a post may be filed under.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validate::slug_chars;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub group_id:    Uuid,
  pub title:       String,
  /// Unique, URL-safe identifier used in `/groups/{slug}`.
  pub slug:        String,
  pub description: String,
}

/// Input to [`crate::store::BlogStore::add_group`]. Groups are created out of
/// band by an administrator, never through the public API.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewGroup {
  #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
  pub title:       String,
  #[validate(
    length(min = 1, max = 50, message = "slug must be 1-50 characters"),
    custom(function = "slug_chars")
  )]
  pub slug:        String,
  #[serde(default)]
  pub description: String,
}
