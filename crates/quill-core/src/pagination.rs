//! Offset pagination over an already-ordered result set.
//!
//! The requested page number comes straight from a query string, so it is
//! treated as untrusted: anything unusable is clamped to the nearest valid
//! page instead of producing an error.

use serde::Serialize;

/// Number of posts shown on one page of every listing.
pub const POSTS_PER_PAGE: usize = 10;

/// One page of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
  pub items:      Vec<T>,
  /// `ceil(total / per_page)`; zero for an empty sequence.
  pub page_count: usize,
  /// The 1-based page actually served, after clamping.
  pub number:     usize,
}

impl<T> Page<T> {
  pub fn has_next(&self) -> bool { self.number < self.page_count }

  pub fn has_previous(&self) -> bool { self.number > 1 }

  /// Map the items while keeping the page metadata.
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:      self.items.into_iter().map(f).collect(),
      page_count: self.page_count,
      number:     self.number,
    }
  }
}

/// Slice `items` into the page selected by `requested` using
/// [`POSTS_PER_PAGE`].
pub fn paginate<T>(items: Vec<T>, requested: Option<&str>) -> Page<T> {
  paginate_by(items, requested, POSTS_PER_PAGE)
}

/// [`paginate`] with an explicit page size. `per_page` of zero is treated as
/// one.
pub fn paginate_by<T>(
  items: Vec<T>,
  requested: Option<&str>,
  per_page: usize,
) -> Page<T> {
  let per_page   = per_page.max(1);
  let page_count = items.len().div_ceil(per_page);
  let number     = clamp_page(parse_page(requested), page_count);

  let items = items
    .into_iter()
    .skip((number - 1) * per_page)
    .take(per_page)
    .collect();

  Page { items, page_count, number }
}

/// Interpret a raw page parameter. Absent or non-numeric input selects the
/// first page; a digit string too large for `i64` selects the last.
fn parse_page(raw: Option<&str>) -> i64 {
  let Some(raw) = raw.map(str::trim) else {
    return 1;
  };
  match raw.parse::<i64>() {
    Ok(n) => n,
    Err(_) => {
      let digits = raw.strip_prefix('+').unwrap_or(raw);
      if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        i64::MAX
      } else {
        1
      }
    }
  }
}

fn clamp_page(requested: i64, page_count: usize) -> usize {
  if requested < 1 || page_count == 0 {
    return 1;
  }
  usize::try_from(requested).map_or(page_count, |n| n.min(page_count))
}
