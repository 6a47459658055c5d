//! Runtime options controlling emission behaviour.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::registry::ExclusionList;

const DEFAULT_CONFIG_FILE: &str = "bundler.config.json";

/// Discoverable options for the bundling pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
  /// Attach the `async` loading hint to non-header inclusion tags.
  pub async_footer: bool,
  /// Source references containing any of these fragments are left to the host.
  pub exclusions: Vec<String>,
}

impl Default for BundlerConfig {
  fn default() -> Self {
    Self {
      async_footer: true,
      exclusions: Vec::new(),
    }
  }
}

impl BundlerConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall
  /// back to default values so rendering can continue with sensible
  /// assumptions.
  pub fn discover(dir: &Path) -> Self {
    Self::from_path(&dir.join(DEFAULT_CONFIG_FILE)).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Exclusion policy built from the configured fragments.
  pub fn exclusion_list(&self) -> ExclusionList {
    ExclusionList::new(self.exclusions.clone())
  }
}
