//! Router tests driven through `tower::ServiceExt::oneshot` against an
//! in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use quill_core::{
  group::{Group, NewGroup},
  post::{NewPost, Post},
  store::BlogStore,
  user::{NewUser, User},
};
use quill_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{api_router, viewer::REMOTE_USER_HEADER};

struct Fixture {
  store:  Arc<SqliteStore>,
  author: User,
  reader: User,
  group:  Group,
}

impl Fixture {
  async fn new() -> Self {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let author = store.add_user(NewUser::new("auth")).await.unwrap();
    let reader = store.add_user(NewUser::new("NoNameUser")).await.unwrap();
    let group = store
      .add_group(NewGroup {
        title:       "test-group".into(),
        slug:        "test-slug".into(),
        description: "Test description".into(),
      })
      .await
      .unwrap();
    Self { store, author, reader, group }
  }

  fn router(&self) -> Router { api_router(self.store.clone()) }

  async fn post(&self, text: &str) -> Post {
    self
      .store
      .create_post(self.author.user_id, NewPost::text(text).in_group(self.group.group_id))
      .await
      .unwrap()
  }

  async fn send(
    &self,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
      builder = builder.header(REMOTE_USER_HEADER, user);
    }
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };

    let resp = self.router().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn get(&self, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    self.send("GET", uri, user, None).await
  }
}

fn texts(page: &Value) -> Vec<String> {
  page["items"]
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["text"].as_str().unwrap().to_owned())
    .collect()
}

// ── Listings ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn index_lists_posts_with_group() {
  let f = Fixture::new().await;
  f.post("Test post").await;

  let (status, body) = f.get("/posts", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(texts(&body), ["Test post"]);
  assert_eq!(body["items"][0]["group"]["title"], "test-group");
  assert_eq!(body["page_count"], 1);
  assert_eq!(body["number"], 1);
}

#[tokio::test]
async fn listings_paginate_ten_per_page() {
  let f = Fixture::new().await;
  for i in 0..13 {
    f.post(&format!("Test post {i}")).await;
  }

  for base in ["/posts", "/groups/test-slug", "/profile/auth"] {
    let (status, first) = f.get(base, None).await;
    assert_eq!(status, StatusCode::OK, "{base}");
    let first = if base == "/posts" { first } else { first["page"].clone() };
    assert_eq!(first["items"].as_array().unwrap().len(), 10, "{base}");
    assert_eq!(first["has_next"], true);

    let (_, second) = f.get(&format!("{base}?page=2"), None).await;
    let second = if base == "/posts" { second } else { second["page"].clone() };
    assert_eq!(second["items"].as_array().unwrap().len(), 3, "{base}");
    assert_eq!(second["has_previous"], true);
  }
}

#[tokio::test]
async fn garbage_page_numbers_are_clamped() {
  let f = Fixture::new().await;
  for i in 0..13 {
    f.post(&format!("Test post {i}")).await;
  }

  let (status, body) = f.get("/posts?page=abc", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["number"], 1);

  let (_, body) = f.get("/posts?page=-3", None).await;
  assert_eq!(body["number"], 1);

  let (_, body) = f.get("/posts?page=999", None).await;
  assert_eq!(body["number"], 2);
}

#[tokio::test]
async fn repeated_page_parameter_uses_the_last() {
  let f = Fixture::new().await;
  for i in 0..13 {
    f.post(&format!("Test post {i}")).await;
  }

  let (status, body) = f.get("/posts?page=1&page=2", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["number"], 2);

  let (status, body) = f.get("/groups/test-slug?page=2&page=abc", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["page"]["number"], 1);
}

#[tokio::test]
async fn unknown_group_and_profile_return_404() {
  let f = Fixture::new().await;
  assert_eq!(f.get("/groups/nope", None).await.0, StatusCode::NOT_FOUND);
  assert_eq!(f.get("/profile/nobody", None).await.0, StatusCode::NOT_FOUND);
  let uri = format!("/posts/{}", Uuid::new_v4());
  assert_eq!(f.get(&uri, None).await.0, StatusCode::NOT_FOUND);
  assert_eq!(f.get("/unexisting_page/", None).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn groups_are_listed() {
  let f = Fixture::new().await;
  let (status, body) = f.get("/groups", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body[0]["slug"], "test-slug");
}

// ── Post detail ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn detail_includes_count_and_comments() {
  let f = Fixture::new().await;
  let post = f.post("Test post").await;
  f.post("Another").await;

  let uri = format!("/posts/{}/comments", post.post_id);
  let (status, _) = f
    .send("POST", &uri, Some("NoNameUser"), Some(json!({ "text": "Nice" })))
    .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = f.get(&format!("/posts/{}", post.post_id), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["post"]["text"], "Test post");
  assert_eq!(body["author_post_count"], 2);
  assert_eq!(body["comments"][0]["text"], "Nice");
  assert_eq!(body["comments"][0]["author"]["username"], "NoNameUser");

  let (_, comments) = f.get(&uri, None).await;
  assert_eq!(comments.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn anonymous_comment_is_unauthorized() {
  let f = Fixture::new().await;
  let post = f.post("Test post").await;
  let uri = format!("/posts/{}/comments", post.post_id);

  let (status, _) = f.send("POST", &uri, None, Some(json!({ "text": "hi" }))).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(f.store.list_comments(post.post_id).await.unwrap().is_empty());
}

// ── Create / edit ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_post_as_viewer() {
  let f = Fixture::new().await;
  let body = json!({
    "text": "Test post text",
    "group_id": f.group.group_id,
    "image": "posts/small.gif",
  });

  let (status, created) = f.send("POST", "/posts", Some("auth"), Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["author"]["username"], "auth");
  assert_eq!(created["group"]["slug"], "test-slug");
  assert_eq!(created["image"], "posts/small.gif");
  assert_eq!(f.store.list_posts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_post_requires_viewer() {
  let f = Fixture::new().await;
  let (status, _) = f
    .send("POST", "/posts", None, Some(json!({ "text": "x" })))
    .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, _) = f
    .send("POST", "/posts", Some("ghost"), Some(json!({ "text": "x" })))
    .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(f.store.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_post_returns_400_and_writes_nothing() {
  let f = Fixture::new().await;
  for body in [
    json!({ "text": "" }),
    json!({ "text": "   " }),
    json!({ "text": "ok", "image": "posts/evil.sh" }),
  ] {
    let (status, err) = f.send("POST", "/posts", Some("auth"), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());
  }

  let (status, _) = f
    .send("POST", "/posts", Some("auth"), Some(json!({ "text": "ok", "group_id": Uuid::new_v4() })))
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(f.store.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_json_400s() {
  let f = Fixture::new().await;

  let (status, err) = f.send("POST", "/posts", Some("auth"), Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(err["error"].as_str().unwrap().contains("text"));

  let (status, err) = f
    .send("POST", "/posts", Some("auth"), Some(json!({ "text": 42 })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(err["error"].is_string());

  let req = Request::builder()
    .method("POST")
    .uri("/posts")
    .header(REMOTE_USER_HEADER, "auth")
    .body(Body::from(r#"{"text": "no content type"}"#))
    .unwrap();
  let resp = f.router().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let err: Value = serde_json::from_slice(&bytes).unwrap();
  assert!(err["error"].is_string());

  let req = Request::builder()
    .method("POST")
    .uri("/posts")
    .header(REMOTE_USER_HEADER, "auth")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = f.router().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let post = f.post("Test post").await;
  let (status, _) = f
    .send("POST", &format!("/posts/{}/comments", post.post_id), Some("auth"), Some(json!({})))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  assert_eq!(f.store.list_posts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unparseable_post_id_is_404() {
  let f = Fixture::new().await;
  for uri in ["/posts/42", "/posts/42/comments"] {
    let (status, err) = f.get(uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    assert!(err["error"].is_string(), "{uri}");
  }

  let (status, _) = f
    .send("PUT", "/posts/42", Some("auth"), Some(json!({ "text": "x" })))
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_without_image_keeps_the_stored_one() {
  let f = Fixture::new().await;
  let post = f
    .store
    .create_post(f.author.user_id, NewPost::text("Test post").with_image("posts/small.gif"))
    .await
    .unwrap();
  let uri = format!("/posts/{}", post.post_id);

  let (status, edited) = f
    .send("PUT", &uri, Some("auth"), Some(json!({ "text": "Edited text" })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(edited["text"], "Edited text");
  assert_eq!(edited["image"], "posts/small.gif");
}

#[tokio::test]
async fn author_can_edit_post() {
  let f = Fixture::new().await;
  let post = f.post("Test post").await;
  let uri = format!("/posts/{}", post.post_id);

  let (status, edited) = f
    .send(
      "PUT",
      &uri,
      Some("auth"),
      Some(json!({ "text": "Edited text", "group_id": f.group.group_id, "image": "posts/small.gif" })),
    )
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(edited["text"], "Edited text");
  assert_eq!(edited["image"], "posts/small.gif");
  assert_eq!(f.store.list_posts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_author_cannot_edit_post() {
  let f = Fixture::new().await;
  let post = f.post("Test post").await;
  let uri = format!("/posts/{}", post.post_id);

  let (status, _) = f
    .send("PUT", &uri, Some("NoNameUser"), Some(json!({ "text": "Hijacked" })))
    .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let stored = f.store.get_post(post.post_id).await.unwrap().unwrap();
  assert_eq!(stored.text, "Test post");
}

// ── Follow / feed ────────────────────────────────────────────────────────────

#[tokio::test]
async fn follow_shows_in_profile_and_feed() {
  let f = Fixture::new().await;
  f.post("older").await;
  f.post("newer").await;

  let (_, profile) = f.get("/profile/auth", Some("NoNameUser")).await;
  assert_eq!(profile["following"], false);
  assert_eq!(profile["posts_count"], 2);
  assert_eq!(profile["author_name"], "auth");

  let (status, _) = f
    .send("POST", "/profile/auth/follow", Some("NoNameUser"), None)
    .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, profile) = f.get("/profile/auth", Some("NoNameUser")).await;
  assert_eq!(profile["following"], true);

  let (status, feed) = f.get("/follow", Some("NoNameUser")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(texts(&feed), ["newer", "older"]);

  let (_, own_feed) = f.get("/follow", Some("auth")).await;
  assert!(texts(&own_feed).is_empty());
}

#[tokio::test]
async fn anonymous_profile_has_no_following_flag() {
  let f = Fixture::new().await;
  let (status, profile) = f.get("/profile/auth", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(profile.get("following").is_none());
}

#[tokio::test]
async fn unfollow_removes_feed_entries() {
  let f = Fixture::new().await;
  f.post("hello").await;

  f.send("POST", "/profile/auth/follow", Some("NoNameUser"), None).await;
  let (status, _) = f
    .send("POST", "/profile/auth/unfollow", Some("NoNameUser"), None)
    .await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(!f.store.is_following(f.reader.user_id, f.author.user_id).await.unwrap());

  // Unfollowing again is a silent no-op.
  let (status, _) = f
    .send("POST", "/profile/auth/unfollow", Some("NoNameUser"), None)
    .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, feed) = f.get("/follow", Some("NoNameUser")).await;
  assert!(texts(&feed).is_empty());
}

#[tokio::test]
async fn self_follow_is_accepted_but_ignored() {
  let f = Fixture::new().await;
  let (status, _) = f.send("POST", "/profile/auth/follow", Some("auth"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(!f.store.is_following(f.author.user_id, f.author.user_id).await.unwrap());
}

#[tokio::test]
async fn follow_unknown_author_returns_404() {
  let f = Fixture::new().await;
  let (status, _) = f
    .send("POST", "/profile/ghost/follow", Some("NoNameUser"), None)
    .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feed_requires_viewer() {
  let f = Fixture::new().await;
  assert_eq!(f.get("/follow", None).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_shows_full_name_when_given() {
  let f = Fixture::new().await;
  f.store
    .add_user(NewUser {
      first_name: "Leo".into(),
      last_name: "Tolstoy".into(),
      ..NewUser::new("leo")
    })
    .await
    .unwrap();

  let (status, profile) = f.get("/profile/leo", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(profile["author_name"], "Leo Tolstoy");
  assert_eq!(profile["author"]["username"], "leo");
}
