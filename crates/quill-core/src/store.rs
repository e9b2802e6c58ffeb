//! The `BlogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `quill-store-sqlite`).
//! Higher layers (`quill-api`, `quill-server`) depend on this abstraction, not
//! on any concrete backend. Every operation takes the store explicitly; there
//! is no ambient connection or request context.

use std::future::Future;

use uuid::Uuid;

use crate::{
  HasErrorKind,
  group::{Group, NewGroup},
  post::{Comment, NewComment, NewPost, Post},
  user::{NewUser, User},
};

/// Abstraction over a Quill storage backend.
///
/// Post listings are ordered newest first; comment listings oldest first.
/// Writes validate their input before touching storage, so a rejected call
/// leaves no partial state behind.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait BlogStore: Send + Sync {
  type Error: std::error::Error + HasErrorKind + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user. Fails if the username is taken.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Groups ────────────────────────────────────────────────────────────

  /// Create a group. Fails if the slug is taken.
  fn add_group(
    &self,
    input: NewGroup,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  fn get_group_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + 'a;

  /// All groups, ordered by title.
  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<Group>, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Publish a post by `author_id`. `created_at` is set by the store.
  fn create_post(
    &self,
    author_id: Uuid,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Replace the text and group of an existing post, and its image when a new
  /// one is given; `image: None` keeps the stored one. Author and creation
  /// time are preserved.
  fn update_post(
    &self,
    post_id: Uuid,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Every post, newest first.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Posts filed under `group_id`, newest first.
  fn group_posts(
    &self,
    group_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Posts written by `author_id`, newest first.
  fn author_posts(
    &self,
    author_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  fn count_author_posts(
    &self,
    author_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  fn add_comment(
    &self,
    post_id: Uuid,
    author_id: Uuid,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// Comments on `post_id` in the order they were written.
  fn list_comments(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  // ── Follows ───────────────────────────────────────────────────────────

  /// Make `follower_id` follow `author_id`.
  ///
  /// Idempotent. Following yourself is silently ignored: no edge is created
  /// and no error is returned.
  fn follow(
    &self,
    follower_id: Uuid,
    author_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the edge if present; a no-op otherwise.
  fn unfollow(
    &self,
    follower_id: Uuid,
    author_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn is_following(
    &self,
    follower_id: Uuid,
    author_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Authors followed by `user_id`, ordered by username.
  fn list_following(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// The feed: posts by every author `user_id` follows, newest first.
  /// Empty when the user follows nobody.
  fn feed(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;
}
