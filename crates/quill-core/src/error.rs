//! Error types for `quill-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] validator::ValidationErrors),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// Coarse category of a store failure, used by the HTTP layer to pick a
/// status code without knowing the concrete backend error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A referenced user, group, post or comment does not exist.
  NotFound,
  /// Input was rejected before any write.
  Invalid,
  /// A uniqueness constraint (username, slug) was violated.
  Conflict,
  /// Anything else; fatal for the request.
  Internal,
}

/// Implemented by every store error type so callers can classify failures.
pub trait HasErrorKind {
  fn kind(&self) -> ErrorKind;
}

impl HasErrorKind for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation(_) => ErrorKind::Invalid,
    }
  }
}
