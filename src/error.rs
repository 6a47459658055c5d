//! Error taxonomy for bundle and aggregate construction.
//!
//! Only fatal conditions appear here. Per-entry resolution and missing-file
//! failures are absorbed inside extraction as silent skips and never escape
//! the pipeline.

use std::path::PathBuf;

use crate::models::Region;

/// Fatal conditions raised while generating region bundles.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
  /// No merge strategy is registered for an encountered resource kind.
  ///
  /// Dropping the group instead would emit a page missing functional script,
  /// indistinguishable from data loss, so the kind is surfaced.
  #[error("no merge strategy registered for `{kind}` scripts in the {region} region")]
  UnsupportedKind {
    /// Resource kind with no registered strategy.
    kind: String,
    /// Region whose group hit the lookup failure.
    region: Region,
  },

  /// A merge strategy failed to produce bundle text.
  #[error("failed to merge `{kind}` scripts for the {region} region")]
  Merge {
    /// Resource kind being merged.
    kind: String,
    /// Region whose group was being merged.
    region: Region,
    /// Failure reported by the strategy.
    #[source]
    source: anyhow::Error,
  },

  /// The cache store could not persist a generated artifact.
  #[error("failed to persist cache artifact `{name}`")]
  CacheWrite {
    /// Artifact filename that failed to persist.
    name: String,
    /// Failure reported by the store.
    #[source]
    source: anyhow::Error,
  },

  /// A generated artifact could not be read back during aggregation.
  #[error("failed to read cache artifact at {}", path.display())]
  ArtifactRead {
    /// Artifact path that failed to read.
    path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    source: std::io::Error,
  },
}
