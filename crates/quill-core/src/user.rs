//! Users: authors, commenters and followers.
//!
//! Accounts are owned by the authentication collaborator; the blog only keeps
//! the profile fields it needs to attribute posts and resolve `/profile/{username}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validate::username_chars;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub username:   String,
  pub first_name: String,
  pub last_name:  String,
  pub email:      Option<String>,
  pub joined_at:  DateTime<Utc>,
}

impl User {
  /// `"First Last"`, or the username when no name was given.
  pub fn display_name(&self) -> String {
    let full = format!("{} {}", self.first_name, self.last_name);
    let full = full.trim();
    if full.is_empty() {
      self.username.clone()
    } else {
      full.to_owned()
    }
  }
}

/// Input to [`crate::store::BlogStore::add_user`].
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewUser {
  #[validate(
    length(min = 1, max = 150, message = "username must be 1-150 characters"),
    custom(function = "username_chars")
  )]
  pub username:   String,
  #[validate(length(max = 150, message = "first name must be at most 150 characters"))]
  #[serde(default)]
  pub first_name: String,
  #[validate(length(max = 150, message = "last name must be at most 150 characters"))]
  #[serde(default)]
  pub last_name:  String,
  #[validate(email(message = "invalid email address"))]
  pub email:      Option<String>,
}

impl NewUser {
  /// Convenience constructor with every optional field left empty.
  pub fn new(username: impl Into<String>) -> Self {
    Self { username: username.into(), ..Self::default() }
  }
}
