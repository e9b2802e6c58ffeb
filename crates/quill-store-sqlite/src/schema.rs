//! SQL schema for the Quill SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    username    TEXT NOT NULL UNIQUE,
    first_name  TEXT NOT NULL DEFAULT '',
    last_name   TEXT NOT NULL DEFAULT '',
    email       TEXT,
    joined_at   TEXT NOT NULL
);

-- `groups` is reserved by SQLite's window-frame syntax.
CREATE TABLE IF NOT EXISTS post_groups (
    group_id    TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS posts (
    post_id     TEXT PRIMARY KEY,
    author_id   TEXT NOT NULL REFERENCES users(user_id),
    group_id    TEXT REFERENCES post_groups(group_id) ON DELETE SET NULL,
    text        TEXT NOT NULL CHECK (length(trim(text)) > 0),
    image       TEXT,            -- path relative to the media root
    created_at  TEXT NOT NULL    -- RFC 3339 UTC, fixed width; server-assigned
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id  TEXT PRIMARY KEY,
    post_id     TEXT NOT NULL REFERENCES posts(post_id) ON DELETE CASCADE,
    author_id   TEXT NOT NULL REFERENCES users(user_id),
    text        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- Directed follow edges: at most one per ordered pair, never a self-loop.
CREATE TABLE IF NOT EXISTS follows (
    follower_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    author_id   TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    UNIQUE (follower_id, author_id),
    CHECK  (follower_id != author_id)
);

CREATE INDEX IF NOT EXISTS posts_author_idx   ON posts(author_id);
CREATE INDEX IF NOT EXISTS posts_group_idx    ON posts(group_id);
CREATE INDEX IF NOT EXISTS posts_created_idx  ON posts(created_at);
CREATE INDEX IF NOT EXISTS comments_post_idx  ON comments(post_id);
CREATE INDEX IF NOT EXISTS follows_author_idx ON follows(author_id);

PRAGMA user_version = 1;
";
