//! Data structures passed between the stages of the bundling pipeline.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Page placement bucket for extracted scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
  /// Scripts that must execute before the document content, in document order.
  Header,
  /// Scripts emitted after the document content.
  Footer,
}

impl Region {
  /// All regions, in the order they appear on the page.
  pub const ALL: [Region; 2] = [Region::Header, Region::Footer];

  /// Stable lowercase name used in cache artifact filenames.
  pub fn as_str(&self) -> &'static str {
    match self {
      Region::Header => "header",
      Region::Footer => "footer",
    }
  }
}

impl std::fmt::Display for Region {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Ordered membership of one (region, kind) bundle.
///
/// Insertion order is preserved because concatenation order must be
/// reproducible across runs with identical inputs.
#[derive(Debug, Clone, Default)]
pub struct ScriptGroup {
  files: Vec<(String, PathBuf)>,
  mtimes: Vec<(String, i64)>,
}

impl ScriptGroup {
  /// Record a member file and its modification time under `handle`.
  pub fn insert(&mut self, handle: &str, path: PathBuf, mtime: i64) {
    self.files.push((handle.to_string(), path));
    self.mtimes.push((handle.to_string(), mtime));
  }

  /// Ordered handle and path membership.
  pub fn files(&self) -> &[(String, PathBuf)] {
    &self.files
  }

  /// Ordered handle and mtime captures, parallel to [`Self::files`].
  pub fn mtimes(&self) -> &[(String, i64)] {
    &self.mtimes
  }

  /// Returns `true` when no member has been recorded.
  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}

/// Everything extracted for one region during a render pass.
#[derive(Debug, Clone, Default)]
pub struct RegionAssets {
  groups: Vec<(String, ScriptGroup)>,
  localized: Vec<String>,
}

impl RegionAssets {
  /// The group for `kind`, created on first use so kinds keep insertion order.
  pub fn group_mut(&mut self, kind: &str) -> &mut ScriptGroup {
    let position = match self.groups.iter().position(|(name, _)| name == kind) {
      Some(position) => position,
      None => {
        self.groups.push((kind.to_string(), ScriptGroup::default()));
        self.groups.len() - 1
      }
    };
    &mut self.groups[position].1
  }

  /// Ordered kind-to-group mapping.
  pub fn groups(&self) -> &[(String, ScriptGroup)] {
    &self.groups
  }

  /// Append an inline-data payload in capture order.
  pub fn push_localized(&mut self, data: &str) {
    self.localized.push(data.to_string());
  }

  /// Inline-data payloads captured for this region, in capture order.
  pub fn localized(&self) -> &[String] {
    &self.localized
  }
}

/// Reference to one generated per-kind cache artifact.
#[derive(Debug, Clone)]
pub struct ArtifactRef {
  /// Stable key for the artifact within its region (`"{kind}-bundle"`).
  pub key: String,
  /// Location of the artifact inside the cache store.
  pub path: PathBuf,
  /// Modification time of the artifact at recording time.
  pub mtime: i64,
}

/// Per-kind artifact references collected while generating a region.
#[derive(Debug, Clone, Default)]
pub struct RegionOutput {
  entries: Vec<ArtifactRef>,
}

impl RegionOutput {
  /// Record a generated artifact, preserving kind insertion order.
  pub fn push(&mut self, artifact: ArtifactRef) {
    self.entries.push(artifact);
  }

  /// Ordered artifact references for the region.
  pub fn entries(&self) -> &[ArtifactRef] {
    &self.entries
  }

  /// Returns `true` when no per-kind bundle was produced.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Modification time of `path` in whole seconds since the Unix epoch.
pub fn file_mtime(path: &Path) -> std::io::Result<i64> {
  let modified = std::fs::metadata(path)?.modified()?;
  let mtime = match modified.duration_since(UNIX_EPOCH) {
    Ok(elapsed) => elapsed.as_secs() as i64,
    Err(before_epoch) => -(before_epoch.duration().as_secs() as i64),
  };
  Ok(mtime)
}
