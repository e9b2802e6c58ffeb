//! Posts and comments.
//!
//! Reads always return posts with their author and group resolved, so a
//! listing never needs a second round-trip per row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
  group::Group,
  user::User,
  validate::{image_path, not_blank},
};

// ─── Post ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub post_id:    Uuid,
  pub author:     User,
  pub group:      Option<Group>,
  pub text:       String,
  /// Path of the attached image, relative to the media root.
  pub image:      Option<String>,
  /// Server-assigned; never changes after creation, including on edit.
  pub created_at: DateTime<Utc>,
}

/// Body of a create or edit request. The author is never accepted from the
/// caller; it is the requesting user on create and unchanged on edit.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewPost {
  #[validate(custom(function = "not_blank"))]
  pub text:     String,
  pub group_id: Option<Uuid>,
  #[validate(
    length(max = 255, message = "image path must be at most 255 characters"),
    custom(function = "image_path")
  )]
  pub image:    Option<String>,
}

impl NewPost {
  /// A text-only post with no group and no image.
  pub fn text(text: impl Into<String>) -> Self {
    Self { text: text.into(), ..Self::default() }
  }

  pub fn in_group(mut self, group_id: Uuid) -> Self {
    self.group_id = Some(group_id);
    self
  }

  pub fn with_image(mut self, path: impl Into<String>) -> Self {
    self.image = Some(path.into());
    self
  }
}

// ─── Comment ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub post_id:    Uuid,
  pub author:     User,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewComment {
  #[validate(custom(function = "not_blank"))]
  pub text: String,
}

impl NewComment {
  pub fn new(text: impl Into<String>) -> Self { Self { text: text.into() } }
}

#[cfg(test)]
mod tests {
  use validator::Validate as _;

  use super::*;

  #[test]
  fn post_requires_text() {
    assert!(NewPost::text("Hello").validate().is_ok());
    assert!(NewPost::text("").validate().is_err());
    assert!(NewPost::text("   ").validate().is_err());
  }

  #[test]
  fn post_image_must_be_an_image_path() {
    let ok = NewPost::text("pic").with_image("posts/small.gif");
    assert!(ok.validate().is_ok());

    let bad = NewPost::text("pic").with_image("posts/small.exe");
    let errors = bad.validate().unwrap_err();
    assert!(errors.field_errors().contains_key("image"));

    let long = NewPost::text("pic").with_image(format!("{}.png", "a".repeat(300)));
    assert!(long.validate().is_err());
  }

  #[test]
  fn comment_requires_text() {
    assert!(NewComment::new("Nice post").validate().is_ok());
    assert!(NewComment::new("\n").validate().is_err());
  }
}
