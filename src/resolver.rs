//! Mapping of registered script references onto local filesystem roots.

use std::path::PathBuf;

use regex::Regex;

fn external_reference_patterns() -> &'static [Regex] {
  use std::sync::OnceLock;

  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      vec![
        Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"),
        Regex::new(r"^//").expect("invalid protocol-relative regex"),
        Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
      ]
    })
    .as_slice()
}

/// Determine whether a script reference points at an external origin.
///
/// External references cannot be merged into a local bundle and are left to
/// the host, so resolution treats them as unresolvable rather than an error.
pub fn is_external_reference(value: &str) -> bool {
  external_reference_patterns()
    .iter()
    .any(|pattern| pattern.is_match(value))
}

/// Maps URL-like script references onto the environment's known local roots.
///
/// Mounts are checked in registration order, so more specific prefixes must
/// be registered first. References that match no mount fall back to the site
/// root when they are site-relative; anything else is unresolvable.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
  mounts: Vec<(String, PathBuf)>,
  site_root: Option<PathBuf>,
}

impl PathResolver {
  /// Create an empty resolver with no known roots.
  pub fn new() -> Self {
    Self::default()
  }

  /// Map references beginning with `url_prefix` below the directory `root`.
  pub fn mount(mut self, url_prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
    self.mounts.push((url_prefix.into(), root.into()));
    self
  }

  /// Resolve site-relative references (leading `/`) against `root`.
  pub fn with_site_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.site_root = Some(root.into());
    self
  }

  /// Resolve a registered reference to a local path.
  ///
  /// Returns `None` for external origins and references that map into no
  /// known root; callers skip those entries without error. Existence of the
  /// resolved file is the caller's concern.
  pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
    let reference = strip_query(reference);
    if reference.is_empty() {
      return None;
    }

    for (prefix, root) in &self.mounts {
      if let Some(rest) = reference.strip_prefix(prefix.as_str()) {
        return Some(root.join(rest.trim_start_matches('/')));
      }
    }

    if is_external_reference(reference) {
      return None;
    }

    if reference.starts_with('/') {
      if let Some(root) = &self.site_root {
        return Some(root.join(reference.trim_start_matches('/')));
      }
    }

    None
  }
}

/// Drop the query string and fragment from a reference before matching.
fn strip_query(reference: &str) -> &str {
  let end = reference
    .find(|c| c == '?' || c == '#')
    .unwrap_or(reference.len());
  &reference[..end]
}

#[cfg(test)]
mod tests {
  use super::*;

  fn resolver() -> PathResolver {
    PathResolver::new()
      .mount("https://static.example.com/vendor/", "/srv/site/vendor")
      .mount("https://static.example.com/", "/srv/site/static")
      .with_site_root("/srv/site")
  }

  #[test]
  fn resolves_mounted_prefixes_in_order() {
    let resolver = resolver();
    assert_eq!(
      resolver.resolve("https://static.example.com/vendor/lib.js"),
      Some(PathBuf::from("/srv/site/vendor/lib.js"))
    );
    assert_eq!(
      resolver.resolve("https://static.example.com/app.js"),
      Some(PathBuf::from("/srv/site/static/app.js"))
    );
  }

  #[test]
  fn resolves_site_relative_references() {
    let resolver = resolver();
    assert_eq!(
      resolver.resolve("/assets/app.js"),
      Some(PathBuf::from("/srv/site/assets/app.js"))
    );
  }

  #[test]
  fn strips_query_strings_and_fragments() {
    let resolver = resolver();
    assert_eq!(
      resolver.resolve("/assets/app.js?ver=1.2.3"),
      Some(PathBuf::from("/srv/site/assets/app.js"))
    );
    assert_eq!(
      resolver.resolve("/assets/app.js#main"),
      Some(PathBuf::from("/srv/site/assets/app.js"))
    );
  }

  #[test]
  fn external_origins_are_unresolvable() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("https://cdn.other.com/lib.js"), None);
    assert_eq!(resolver.resolve("HTTP://cdn.other.com/lib.js"), None);
    assert_eq!(resolver.resolve("//cdn.other.com/lib.js"), None);
    assert_eq!(resolver.resolve("data:text/javascript;base64,eD0x"), None);
  }

  #[test]
  fn unclassifiable_references_are_unresolvable() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("relative/app.js"), None);
    assert_eq!(resolver.resolve(""), None);
  }

  #[test]
  fn site_relative_needs_a_site_root() {
    let resolver = PathResolver::new();
    assert_eq!(resolver.resolve("/assets/app.js"), None);
  }
}
