//! JSON API for Quill.
//!
//! Exposes an axum [`Router`] backed by any [`quill_core::store::BlogStore`].
//! Authentication, TLS, and transport concerns are the caller's
//! responsibility; the requesting user arrives in the
//! [`viewer::REMOTE_USER_HEADER`] header.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", quill_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod extract;
pub mod groups;
pub mod page;
pub mod posts;
pub mod profile;
pub mod viewer;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use quill_core::store::BlogStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: BlogStore + 'static,
{
  Router::new()
    // Posts
    .route("/posts", get(posts::index::<S>).post(posts::create::<S>))
    .route("/posts/{id}", get(posts::detail::<S>).put(posts::edit::<S>))
    .route(
      "/posts/{id}/comments",
      get(posts::comments::<S>).post(posts::add_comment::<S>),
    )
    // Groups
    .route("/groups", get(groups::list::<S>))
    .route("/groups/{slug}", get(groups::posts::<S>))
    // Profiles and following
    .route("/profile/{username}", get(profile::show::<S>))
    .route("/profile/{username}/follow", post(profile::follow::<S>))
    .route("/profile/{username}/unfollow", post(profile::unfollow::<S>))
    .route("/follow", get(profile::feed::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
