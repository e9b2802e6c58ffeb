//! Custom field validators referenced from `#[validate(custom(...))]`.

use std::borrow::Cow;

use validator::ValidationError;

/// File extensions accepted for post images.
const IMAGE_EXTENSIONS: &[&str] = &["gif", "png", "jpg", "jpeg", "webp"];

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
  ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Rejects text that is empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(invalid("blank", "must not be blank"));
  }
  Ok(())
}

/// Usernames: letters, digits and `@.+-_`.
pub fn username_chars(value: &str) -> Result<(), ValidationError> {
  let ok = value
    .chars()
    .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
  if !ok {
    return Err(invalid(
      "username",
      "may contain only letters, digits and @/./+/-/_",
    ));
  }
  Ok(())
}

/// Slugs: lowercase ASCII letters, digits, `-` and `_`.
pub fn slug_chars(value: &str) -> Result<(), ValidationError> {
  let ok = value
    .chars()
    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
  if !ok {
    return Err(invalid(
      "slug",
      "may contain only lowercase letters, digits, hyphens and underscores",
    ));
  }
  Ok(())
}

/// An image reference is a relative path inside the media root with an image
/// extension. The bytes themselves live with the storage collaborator.
pub fn image_path(value: &str) -> Result<(), ValidationError> {
  if value.starts_with('/') || value.contains('\\') {
    return Err(invalid("image_path", "must be a relative path"));
  }
  if value.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
    return Err(invalid("image_path", "must not contain empty or dot segments"));
  }

  let ext = value
    .rsplit_once('.')
    .map(|(_, ext)| ext.to_ascii_lowercase())
    .unwrap_or_default();
  if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
    return Err(invalid("image_extension", "must be a gif, png, jpeg or webp image"));
  }
  Ok(())
}
