//! [`SqliteStore`], the SQLite implementation of [`BlogStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;
use validator::Validate as _;

use quill_core::{
  group::{Group, NewGroup},
  post::{Comment, NewComment, NewPost, Post},
  store::BlogStore,
  user::{NewUser, User},
};

use crate::{
  encode::{
    encode_dt, encode_uuid, now, RawComment, RawGroup, RawPost, RawUser,
    GROUP_COLUMNS, POST_ORDER, POST_SELECT, USER_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Quill store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT 1 ... WHERE <key> = ?1` existence probe.
  async fn exists(&self, sql: &'static str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![id_str], |_| Ok(()))
            .optional()?
            .is_some(),
        )
      })
      .await?;
    Ok(found)
  }

  async fn require_user(&self, id: Uuid) -> Result<()> {
    if self.exists("SELECT 1 FROM users WHERE user_id = ?1", id).await? {
      Ok(())
    } else {
      Err(Error::UserNotFound(id))
    }
  }

  async fn require_group(&self, id: Uuid) -> Result<()> {
    if self.exists("SELECT 1 FROM post_groups WHERE group_id = ?1", id).await? {
      Ok(())
    } else {
      Err(Error::GroupNotFound(id))
    }
  }

  async fn require_post(&self, id: Uuid) -> Result<()> {
    if self.exists("SELECT 1 FROM posts WHERE post_id = ?1", id).await? {
      Ok(())
    } else {
      Err(Error::PostNotFound(id))
    }
  }

  /// Fetch a single user by an arbitrary key column.
  async fn find_user(&self, column: &'static str, key: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.{column} = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![key], |row| RawUser::from_row(row, 0))
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Run [`POST_SELECT`] with an optional `WHERE`/`JOIN` suffix and a single
  /// bound parameter.
  async fn query_posts(
    &self,
    filter: &'static str,
    param: Option<String>,
  ) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let sql = format!("{POST_SELECT} {filter} {POST_ORDER}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt
            .query_map(rusqlite::params![p], RawPost::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawPost::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }
}

// ─── BlogStore impl ──────────────────────────────────────────────────────────

impl BlogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    input.validate()?;

    let user = User {
      user_id:    Uuid::new_v4(),
      username:   input.username,
      first_name: input.first_name,
      last_name:  input.last_name,
      email:      input.email,
      joined_at:  now(),
    };

    let id_str     = encode_uuid(user.user_id);
    let username   = user.username.clone();
    let first_name = user.first_name.clone();
    let last_name  = user.last_name.clone();
    let email      = user.email.clone();
    let at_str     = encode_dt(user.joined_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT OR IGNORE INTO users (user_id, username, first_name, last_name, email, joined_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, username, first_name, last_name, email, at_str],
        )?;
        Ok(changed == 1)
      })
      .await?;

    if !inserted {
      return Err(Error::UsernameTaken(user.username));
    }
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.find_user("user_id", encode_uuid(id)).await
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    self.find_user("username", username.to_owned()).await
  }

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn add_group(&self, input: NewGroup) -> Result<Group> {
    input.validate()?;

    let group = Group {
      group_id:    Uuid::new_v4(),
      title:       input.title,
      slug:        input.slug,
      description: input.description,
    };

    let id_str      = encode_uuid(group.group_id);
    let title       = group.title.clone();
    let slug        = group.slug.clone();
    let description = group.description.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT OR IGNORE INTO post_groups (group_id, title, slug, description)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, title, slug, description],
        )?;
        Ok(changed == 1)
      })
      .await?;

    if !inserted {
      return Err(Error::SlugTaken(group.slug));
    }
    Ok(group)
  }

  async fn get_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
    let slug = slug.to_owned();

    let raw: Option<RawGroup> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {GROUP_COLUMNS} FROM post_groups g WHERE g.slug = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![slug], |row| RawGroup::from_row(row, 0))
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawGroup::into_group).transpose()?.flatten())
  }

  async fn list_groups(&self) -> Result<Vec<Group>> {
    let raws: Vec<RawGroup> = self
      .conn
      .call(|conn| {
        let sql = format!("SELECT {GROUP_COLUMNS} FROM post_groups g ORDER BY g.title, g.slug");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| RawGroup::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut groups = Vec::with_capacity(raws.len());
    for raw in raws {
      groups.extend(raw.into_group()?);
    }
    Ok(groups)
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, author_id: Uuid, input: NewPost) -> Result<Post> {
    input.validate()?;
    self.require_user(author_id).await?;
    if let Some(group_id) = input.group_id {
      self.require_group(group_id).await?;
    }

    let post_id       = Uuid::new_v4();
    let post_id_str   = encode_uuid(post_id);
    let author_id_str = encode_uuid(author_id);
    let group_id_str  = input.group_id.map(encode_uuid);
    let at_str        = encode_dt(now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, author_id, group_id, text, image, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            post_id_str,
            author_id_str,
            group_id_str,
            input.text,
            input.image,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    self.get_post(post_id).await?.ok_or(Error::PostNotFound(post_id))
  }

  async fn update_post(&self, post_id: Uuid, input: NewPost) -> Result<Post> {
    input.validate()?;
    self.require_post(post_id).await?;
    if let Some(group_id) = input.group_id {
      self.require_group(group_id).await?;
    }

    let post_id_str  = encode_uuid(post_id);
    let group_id_str = input.group_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE posts SET text = ?2, group_id = ?3, image = COALESCE(?4, image) \
           WHERE post_id = ?1",
          rusqlite::params![post_id_str, input.text, group_id_str, input.image],
        )?;
        Ok(())
      })
      .await?;

    self.get_post(post_id).await?.ok_or(Error::PostNotFound(post_id))
  }

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
    let posts = self
      .query_posts("WHERE p.post_id = ?1", Some(encode_uuid(id)))
      .await?;
    Ok(posts.into_iter().next())
  }

  async fn list_posts(&self) -> Result<Vec<Post>> {
    self.query_posts("", None).await
  }

  async fn group_posts(&self, group_id: Uuid) -> Result<Vec<Post>> {
    self
      .query_posts("WHERE p.group_id = ?1", Some(encode_uuid(group_id)))
      .await
  }

  async fn author_posts(&self, author_id: Uuid) -> Result<Vec<Post>> {
    self
      .query_posts("WHERE p.author_id = ?1", Some(encode_uuid(author_id)))
      .await
  }

  async fn count_author_posts(&self, author_id: Uuid) -> Result<usize> {
    let author_id_str = encode_uuid(author_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM posts WHERE author_id = ?1",
          rusqlite::params![author_id_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(usize::try_from(count).unwrap_or_default())
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(
    &self,
    post_id:   Uuid,
    author_id: Uuid,
    input:     NewComment,
  ) -> Result<Comment> {
    input.validate()?;
    self.require_post(post_id).await?;
    let author = self
      .get_user(author_id)
      .await?
      .ok_or(Error::UserNotFound(author_id))?;

    let comment = Comment {
      comment_id: Uuid::new_v4(),
      post_id,
      author,
      text:       input.text,
      created_at: now(),
    };

    let id_str        = encode_uuid(comment.comment_id);
    let post_id_str   = encode_uuid(post_id);
    let author_id_str = encode_uuid(author_id);
    let text          = comment.text.clone();
    let at_str        = encode_dt(comment.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (comment_id, post_id, author_id, text, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, post_id_str, author_id_str, text, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
    let post_id_str = encode_uuid(post_id);

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT c.comment_id, c.post_id, c.text, c.created_at, {USER_COLUMNS}
           FROM comments c
           JOIN users u ON u.user_id = c.author_id
           WHERE c.post_id = ?1
           ORDER BY c.created_at ASC, c.rowid ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![post_id_str], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  // ── Follows ───────────────────────────────────────────────────────────────

  async fn follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<()> {
    if follower_id == author_id {
      return Ok(());
    }
    self.require_user(follower_id).await?;
    self.require_user(author_id).await?;

    let follower_str = encode_uuid(follower_id);
    let author_str   = encode_uuid(author_id);
    let at_str       = encode_dt(now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO follows (follower_id, author_id, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![follower_str, author_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn unfollow(&self, follower_id: Uuid, author_id: Uuid) -> Result<()> {
    let follower_str = encode_uuid(follower_id);
    let author_str   = encode_uuid(author_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM follows WHERE follower_id = ?1 AND author_id = ?2",
          rusqlite::params![follower_str, author_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
    let follower_str = encode_uuid(follower_id);
    let author_str   = encode_uuid(author_id);

    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM follows WHERE follower_id = ?1 AND author_id = ?2",
              rusqlite::params![follower_str, author_str],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
        )
      })
      .await?;
    Ok(found)
  }

  async fn list_following(&self, user_id: Uuid) -> Result<Vec<User>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {USER_COLUMNS}
           FROM follows f
           JOIN users u ON u.user_id = f.author_id
           WHERE f.follower_id = ?1
           ORDER BY u.username"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], |row| RawUser::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn feed(&self, user_id: Uuid) -> Result<Vec<Post>> {
    self
      .query_posts(
        "JOIN follows f ON f.author_id = p.author_id WHERE f.follower_id = ?1",
        Some(encode_uuid(user_id)),
      )
      .await
  }
}
