//! Error type for `quill-store-sqlite`.

use quill_core::{ErrorKind, HasErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] quill_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("user not found: {0}")]
  UserNotFound(uuid::Uuid),

  #[error("group not found: {0}")]
  GroupNotFound(uuid::Uuid),

  #[error("post not found: {0}")]
  PostNotFound(uuid::Uuid),

  #[error("username {0:?} is already taken")]
  UsernameTaken(String),

  #[error("group slug {0:?} is already taken")]
  SlugTaken(String),
}

impl From<validator::ValidationErrors> for Error {
  fn from(e: validator::ValidationErrors) -> Self {
    Self::Core(quill_core::Error::Validation(e))
  }
}

impl HasErrorKind for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::UserNotFound(_) | Self::GroupNotFound(_) | Self::PostNotFound(_) => {
        ErrorKind::NotFound
      }
      Self::UsernameTaken(_) | Self::SlugTaken(_) => ErrorKind::Conflict,
      Self::Database(_) | Self::Uuid(_) | Self::DateParse(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
