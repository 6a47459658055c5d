//! Cache store contract and the filesystem-backed implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Persistent artifact store addressed by fingerprint-derived filenames.
///
/// Artifacts are immutable: a name is only ever created, never overwritten,
/// so concurrent render passes computing the same fingerprint are safe as
/// long as `set` lands complete artifacts.
pub trait CacheStore: Send + Sync {
  /// Returns `true` when an artifact named `name` already exists.
  fn has(&self, name: &str) -> bool;

  /// Persist `contents` under `name` unless the artifact already exists.
  ///
  /// Implementations must never expose partially written content under a
  /// final name and must treat repeated identical writes as a no-op.
  fn set(&self, name: &str, contents: &str) -> Result<()>;

  /// Filesystem directory the artifacts live in.
  fn path(&self) -> &Path;

  /// Public URL prefix the page uses to reference artifacts, ending in `/`.
  fn url(&self) -> &str;
}

/// Cache store writing artifacts beneath a single local directory.
#[derive(Debug, Clone)]
pub struct FsCacheStore {
  dir: PathBuf,
  url: String,
}

impl FsCacheStore {
  /// Create a store rooted at `dir`, published under the `url` prefix.
  pub fn new(dir: impl Into<PathBuf>, url: impl Into<String>) -> Result<Self> {
    let dir = dir.into();
    fs::create_dir_all(&dir)
      .with_context(|| format!("failed to create cache directory {}", dir.display()))?;

    let mut url = url.into();
    if !url.ends_with('/') {
      url.push('/');
    }

    Ok(Self { dir, url })
  }
}

impl CacheStore for FsCacheStore {
  fn has(&self, name: &str) -> bool {
    self.dir.join(name).is_file()
  }

  fn set(&self, name: &str, contents: &str) -> Result<()> {
    let target = self.dir.join(name);
    if target.exists() {
      return Ok(());
    }

    // Stage under a process-unique name, then rename: readers never observe
    // a partial artifact under the final name.
    let staged = self.dir.join(format!("{name}.{}.partial", std::process::id()));
    fs::write(&staged, contents)
      .with_context(|| format!("failed to stage cache artifact {}", staged.display()))?;
    fs::rename(&staged, &target)
      .with_context(|| format!("failed to publish cache artifact {}", target.display()))?;

    Ok(())
  }

  fn path(&self) -> &Path {
    &self.dir
  }

  fn url(&self) -> &str {
    &self.url
  }
}
