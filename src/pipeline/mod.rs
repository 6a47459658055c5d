//! Render-pass orchestration: extraction, cache-or-build, aggregation, emission.

pub mod emit;
pub mod merge;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::BundlerConfig;
use crate::error::PipelineError;
use crate::fingerprint::{content_fingerprint, region_fingerprint};
use crate::minify::{FilterChain, JsMinFilter};
use crate::models::{ArtifactRef, Region, RegionAssets, RegionOutput, file_mtime};
use crate::registry::{ExclusionPolicy, ScriptRegistry};
use crate::resolver::PathResolver;

use self::merge::MergeRegistry;

/// Markup produced for one region by a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionEmission {
  /// Inline script block holding the region's minified localized data.
  pub inline_block: Option<String>,
  /// Inclusion tag referencing the aggregated cache artifact.
  pub include_tag: String,
}

impl RegionEmission {
  /// Full page markup: the inline block, when present, precedes the tag.
  pub fn markup(&self) -> String {
    match &self.inline_block {
      Some(block) => format!("{block}{}", self.include_tag),
      None => self.include_tag.clone(),
    }
  }
}

/// Collects registered scripts and serves minified bundles from the cache.
///
/// A bundler instance is transient: it is built for one render pass, drains
/// the host queue once, and is dropped after emission. Only the cache store
/// outlives the pass.
pub struct ScriptBundler<'a> {
  config: &'a BundlerConfig,
  resolver: &'a PathResolver,
  cache: &'a dyn CacheStore,
  merges: &'a MergeRegistry,
  aggregate_filters: FilterChain,
  assets: BTreeMap<Region, RegionAssets>,
}

impl<'a> ScriptBundler<'a> {
  /// Create a bundler for one render pass over the given collaborators.
  pub fn new(
    config: &'a BundlerConfig,
    resolver: &'a PathResolver,
    cache: &'a dyn CacheStore,
    merges: &'a MergeRegistry,
  ) -> Self {
    let mut aggregate_filters = FilterChain::new();
    aggregate_filters.set(Box::new(JsMinFilter));

    Self {
      config,
      resolver,
      cache,
      merges,
      aggregate_filters,
      assets: BTreeMap::new(),
    }
  }

  /// Drain the host's pending queue into (region, kind) groups.
  ///
  /// Dependency resolution runs before iteration so the queue reflects full
  /// transitive dependencies. Entries that are excluded, unresolvable, or
  /// missing on disk are skipped without error; everything recorded here is
  /// removed from the host queue so the host does not emit it itself.
  pub fn extract(&mut self, registry: &mut ScriptRegistry, exclusions: &dyn ExclusionPolicy) {
    if registry.queue_is_empty() {
      return;
    }

    registry.resolve_dependencies();

    for handle in registry.to_do().to_vec() {
      let (src, bare, inline_data) = match registry.registration(&handle) {
        Some(registration) => (
          registration.src.clone(),
          registration.is_bare(),
          registration.inline_data().map(str::to_owned),
        ),
        None => continue,
      };

      if exclusions.is_excluded(&src) {
        debug!(%handle, %src, "skipping excluded script");
        continue;
      }

      let Some(path) = self.resolver.resolve(&src) else {
        debug!(%handle, %src, "skipping unresolvable script reference");
        continue;
      };
      if !path.is_file() {
        debug!(%handle, path = %path.display(), "skipping script missing on disk");
        continue;
      }

      let mtime = match file_mtime(&path) {
        Ok(mtime) => mtime,
        Err(err) => {
          warn!(%handle, path = %path.display(), error = %err, "skipping unreadable script");
          continue;
        }
      };

      let kind = resource_kind(&path);
      let region = if bare { Region::Header } else { Region::Footer };

      let assets = self.assets.entry(region).or_default();
      if let Some(data) = inline_data {
        assets.push_localized(&data);
      }
      assets.group_mut(&kind).insert(&handle, path, mtime);

      registry.mark_done(&handle);
    }
  }

  /// Build or reuse the cached bundles for `region` and describe its emission.
  ///
  /// Returns `Ok(None)` when the region collected nothing resolvable, which
  /// is a normal outcome. Unknown resource kinds and cache write failures
  /// abort construction for the region before any reference is emitted.
  pub fn generate(&self, region: Region) -> Result<Option<RegionEmission>, PipelineError> {
    let Some(assets) = self.assets.get(&region) else {
      return Ok(None);
    };

    let mut output = RegionOutput::default();

    for (kind, group) in assets.groups() {
      let strategy = self
        .merges
        .get(kind)
        .ok_or_else(|| PipelineError::UnsupportedKind {
          kind: kind.clone(),
          region,
        })?;

      let fingerprint = content_fingerprint(group);
      let bundle_name = format!("{region}-{kind}-{fingerprint}.js");

      if self.cache.has(&bundle_name) {
        debug!(%region, %kind, %bundle_name, "reusing cached bundle");
      } else {
        debug!(%region, %kind, %bundle_name, members = group.files().len(), "building bundle");
        let merged = strategy
          .merge(group.files())
          .map_err(|source| PipelineError::Merge {
            kind: kind.clone(),
            region,
            source,
          })?;
        self
          .cache
          .set(&bundle_name, &merged)
          .map_err(|source| PipelineError::CacheWrite {
            name: bundle_name.clone(),
            source,
          })?;
      }

      let artifact_path = self.cache.path().join(&bundle_name);
      let mtime = file_mtime(&artifact_path).map_err(|source| PipelineError::ArtifactRead {
        path: artifact_path.clone(),
        source,
      })?;
      output.push(ArtifactRef {
        key: format!("{kind}-bundle"),
        path: artifact_path,
        mtime,
      });
    }

    if output.is_empty() {
      return Ok(None);
    }

    let fingerprint = region_fingerprint(&output);
    let aggregate_name = format!("{region}-{fingerprint}.js");

    if !self.cache.has(&aggregate_name) {
      debug!(%region, %aggregate_name, "building aggregated bundle");
      let mut combined = String::new();
      for artifact in output.entries() {
        let text =
          fs::read_to_string(&artifact.path).map_err(|source| PipelineError::ArtifactRead {
            path: artifact.path.clone(),
            source,
          })?;
        combined.push_str(&text);
        if !text.ends_with('\n') {
          combined.push('\n');
        }
      }
      let aggregated = self.aggregate_filters.apply(&combined);
      self
        .cache
        .set(&aggregate_name, &aggregated)
        .map_err(|source| PipelineError::CacheWrite {
          name: aggregate_name.clone(),
          source,
        })?;
    }

    let data = self.build_inline_data(region);
    let async_hint = region != Region::Header && self.config.async_footer;

    Ok(Some(RegionEmission {
      inline_block: (!data.is_empty()).then(|| emit::inline_block(&data)),
      include_tag: emit::include_tag(self.cache.url(), &aggregate_name, async_hint),
    }))
  }

  /// Concatenate and minify the localized data captured for `region`.
  ///
  /// Returns an empty string when nothing was captured; inline data is
  /// recomputed every pass and never cached.
  pub fn build_inline_data(&self, region: Region) -> String {
    let Some(assets) = self.assets.get(&region) else {
      return String::new();
    };
    if assets.localized().is_empty() {
      return String::new();
    }

    let mut data = String::new();
    for payload in assets.localized() {
      data.push_str(payload);
    }
    self.aggregate_filters.apply(&data)
  }

  /// Render the full markup for `region`, empty when the region is empty.
  pub fn emit(&self, region: Region) -> Result<String, PipelineError> {
    match self.generate(region)? {
      Some(emission) => Ok(emission.markup()),
      None => Ok(String::new()),
    }
  }
}

/// Resource kind derived from the path's final suffix, defaulting to `js`.
fn resource_kind(path: &Path) -> String {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .unwrap_or("js")
    .to_string()
}
