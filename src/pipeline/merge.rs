//! Kind-keyed merge strategies combining group members into bundle text.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::minify::{FilterChain, JsMinFilter};

/// Capability merging an ordered set of member files into bundle text.
///
/// Strategies receive the group's handle and path pairs in extraction order and
/// must produce output deterministically, since the result is stored under a
/// membership-derived fingerprint.
pub trait MergeStrategy: Send + Sync {
  /// Merge the ordered members into a single output.
  fn merge(&self, files: &[(String, PathBuf)]) -> Result<String>;
}

/// Strategy that concatenates members and runs a filter chain over the result.
pub struct ConcatMerge {
  filters: FilterChain,
}

impl ConcatMerge {
  /// Concatenate through the given filter chain.
  pub fn new(filters: FilterChain) -> Self {
    Self { filters }
  }

  /// Concatenate through the built-in JavaScript minifier.
  pub fn with_jsmin() -> Self {
    let mut filters = FilterChain::new();
    filters.set(Box::new(JsMinFilter));
    Self::new(filters)
  }
}

impl MergeStrategy for ConcatMerge {
  fn merge(&self, files: &[(String, PathBuf)]) -> Result<String> {
    let mut merged = String::new();
    for (handle, path) in files {
      let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{handle}` source at {}", path.display()))?;
      merged.push_str(&source);
      // Guard against a member without a trailing newline gluing onto the next.
      if !source.ends_with('\n') {
        merged.push('\n');
      }
    }
    Ok(self.filters.apply(&merged))
  }
}

/// Registry mapping resource kinds to merge strategies.
///
/// Encountering a kind with no registered strategy is a configuration error
/// surfaced by the pipeline, never a silent drop.
pub struct MergeRegistry {
  strategies: BTreeMap<String, Box<dyn MergeStrategy>>,
}

impl MergeRegistry {
  /// Create a registry with no strategies at all.
  pub fn empty() -> Self {
    Self {
      strategies: BTreeMap::new(),
    }
  }

  /// Register `strategy` for `kind`, replacing any previous registration.
  pub fn register(&mut self, kind: &str, strategy: Box<dyn MergeStrategy>) {
    self.strategies.insert(kind.to_string(), strategy);
  }

  /// Look up the strategy for `kind`.
  pub fn get(&self, kind: &str) -> Option<&dyn MergeStrategy> {
    self.strategies.get(kind).map(|strategy| &**strategy)
  }

  /// Kinds with a registered strategy, in sorted order.
  pub fn kinds(&self) -> Vec<&str> {
    self.strategies.keys().map(String::as_str).collect()
  }
}

impl Default for MergeRegistry {
  /// Registry covering the script kinds handled out of the box.
  fn default() -> Self {
    let mut registry = Self::empty();
    registry.register("js", Box::new(ConcatMerge::with_jsmin()));
    registry.register("mjs", Box::new(ConcatMerge::with_jsmin()));
    registry
  }
}

impl std::fmt::Debug for MergeRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MergeRegistry")
      .field("kinds", &self.kinds())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn concat_preserves_member_order() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.js");
    let second = dir.path().join("second.js");
    fs::write(&first, "a=1;").unwrap();
    fs::write(&second, "b=2;\n").unwrap();

    let files = vec![
      ("first".to_string(), first),
      ("second".to_string(), second),
    ];
    let merged = ConcatMerge::new(FilterChain::new()).merge(&files).unwrap();
    assert_eq!(merged, "a=1;\nb=2;\n");
  }

  #[test]
  fn concat_minifies_through_the_chain() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("app.js");
    fs::write(&script, "x = 1;  // note\n").unwrap();

    let files = vec![("app".to_string(), script)];
    let merged = ConcatMerge::with_jsmin().merge(&files).unwrap();
    assert_eq!(merged, "x = 1;");
  }

  #[test]
  fn concat_fails_on_unreadable_members() {
    let files = vec![("ghost".to_string(), PathBuf::from("/nonexistent/g.js"))];
    let err = ConcatMerge::with_jsmin().merge(&files).unwrap_err();
    assert!(err.to_string().contains("ghost"));
  }

  #[test]
  fn default_registry_covers_script_kinds() {
    let registry = MergeRegistry::default();
    assert!(registry.get("js").is_some());
    assert!(registry.get("mjs").is_some());
    assert!(registry.get("weird").is_none());
    assert_eq!(registry.kinds(), vec!["js", "mjs"]);
  }

  #[test]
  fn empty_registry_knows_nothing() {
    assert!(MergeRegistry::empty().get("js").is_none());
  }
}
