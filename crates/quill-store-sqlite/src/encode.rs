//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order in SQL equals chronological
//! order. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use quill_core::{
  group::Group,
  post::{Comment, Post},
  user::User,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Current time truncated to the stored precision, so values handed back to
/// callers compare equal to what a later read returns.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every query that returns users.
pub const USER_COLUMNS: &str =
  "u.user_id, u.username, u.first_name, u.last_name, u.email, u.joined_at";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub username:   String,
  pub first_name: String,
  pub last_name:  String,
  pub email:      Option<String>,
  pub joined_at:  String,
}

impl RawUser {
  /// Read the six [`USER_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(at)?,
      username:   row.get(at + 1)?,
      first_name: row.get(at + 2)?,
      last_name:  row.get(at + 3)?,
      email:      row.get(at + 4)?,
      joined_at:  row.get(at + 5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      username:   self.username,
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      joined_at:  decode_dt(&self.joined_at)?,
    })
  }
}

/// Column list shared by every query that returns groups.
pub const GROUP_COLUMNS: &str = "g.group_id, g.title, g.slug, g.description";

/// Raw strings read from a `post_groups` row. Every field is optional because
/// posts reach groups through a LEFT JOIN.
pub struct RawGroup {
  pub group_id:    Option<String>,
  pub title:       Option<String>,
  pub slug:        Option<String>,
  pub description: Option<String>,
}

impl RawGroup {
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      group_id:    row.get(at)?,
      title:       row.get(at + 1)?,
      slug:        row.get(at + 2)?,
      description: row.get(at + 3)?,
    })
  }

  /// `None` when the LEFT JOIN found no group.
  pub fn into_group(self) -> Result<Option<Group>> {
    let Some(group_id) = self.group_id else {
      return Ok(None);
    };
    Ok(Some(Group {
      group_id:    decode_uuid(&group_id)?,
      title:       self.title.unwrap_or_default(),
      slug:        self.slug.unwrap_or_default(),
      description: self.description.unwrap_or_default(),
    }))
  }
}

/// Select list and joins for posts with their author and group resolved.
/// Callers append a `WHERE` clause (if any) and [`POST_ORDER`].
pub const POST_SELECT: &str = "
  SELECT p.post_id, p.text, p.image, p.created_at,
         u.user_id, u.username, u.first_name, u.last_name, u.email, u.joined_at,
         g.group_id, g.title, g.slug, g.description
  FROM posts p
  JOIN users u            ON u.user_id  = p.author_id
  LEFT JOIN post_groups g ON g.group_id = p.group_id";

/// Newest first; insertion order breaks ties between identical timestamps.
pub const POST_ORDER: &str = "ORDER BY p.created_at DESC, p.rowid DESC";

/// Raw strings read from a row produced by [`POST_SELECT`].
pub struct RawPost {
  pub post_id:    String,
  pub text:       String,
  pub image:      Option<String>,
  pub created_at: String,
  pub author:     RawUser,
  pub group:      RawGroup,
}

impl RawPost {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:    row.get(0)?,
      text:       row.get(1)?,
      image:      row.get(2)?,
      created_at: row.get(3)?,
      author:     RawUser::from_row(row, 4)?,
      group:      RawGroup::from_row(row, 10)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:    decode_uuid(&self.post_id)?,
      author:     self.author.into_user()?,
      group:      self.group.into_group()?,
      text:       self.text,
      image:      self.image,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `comments` row joined with its author.
pub struct RawComment {
  pub comment_id: String,
  pub post_id:    String,
  pub text:       String,
  pub created_at: String,
  pub author:     RawUser,
}

impl RawComment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      post_id:    row.get(1)?,
      text:       row.get(2)?,
      created_at: row.get(3)?,
      author:     RawUser::from_row(row, 4)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      post_id:    decode_uuid(&self.post_id)?,
      author:     self.author.into_user()?,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
