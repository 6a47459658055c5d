//! Explicit model of the host's script registration queue.
//!
//! The host environment registers scripts by handle, attaches metadata after
//! registration, and enqueues handles for the current render pass. The
//! original collaborator is process-global mutable state; here it is an
//! explicit object the extractor consumes and drains.

use std::collections::{BTreeMap, BTreeSet};

/// A script registered with the host, keyed externally by handle.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistration {
  /// Source reference as registered by the host (URL-like or site-relative).
  pub src: String,
  /// Handles that must be processed before this one.
  pub deps: Vec<String>,
  /// Auxiliary metadata attached after registration, keyed by slot name.
  /// Inline data travels in the `data` slot.
  pub extra: BTreeMap<String, String>,
  /// Positional argument supplied at registration time.
  pub args: Option<String>,
}

impl ScriptRegistration {
  /// Inline-data payload attached to this registration, if any.
  pub fn inline_data(&self) -> Option<&str> {
    self.extra.get("data").map(String::as_str)
  }

  /// Returns `true` when the registration carries no extra metadata and no
  /// positional args. Bare registrations are placed in the header region.
  pub fn is_bare(&self) -> bool {
    self.extra.is_empty() && self.args.is_none()
  }
}

/// Mutable registry mirroring the host's pending/completed script queues.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
  registered: BTreeMap<String, ScriptRegistration>,
  queue: Vec<String>,
  to_do: Vec<String>,
  done: Vec<String>,
}

impl ScriptRegistry {
  /// Register a script under `handle`, replacing any previous registration.
  pub fn register(&mut self, handle: &str, registration: ScriptRegistration) {
    self.registered.insert(handle.to_string(), registration);
  }

  /// Enqueue `handle` for the current render pass.
  pub fn enqueue(&mut self, handle: &str) {
    if !self.queue.iter().any(|queued| queued == handle) {
      self.queue.push(handle.to_string());
    }
  }

  /// Look up the registration for `handle`.
  pub fn registration(&self, handle: &str) -> Option<&ScriptRegistration> {
    self.registered.get(handle)
  }

  /// Handles enqueued and not yet handled.
  pub fn queue(&self) -> &[String] {
    &self.queue
  }

  /// Returns `true` when nothing is enqueued for this pass.
  pub fn queue_is_empty(&self) -> bool {
    self.queue.is_empty()
  }

  /// Expand the pending queue into the full transitive dependency order.
  ///
  /// Dependencies are placed before their dependents. Handles already
  /// handled, already expanded, or never registered are skipped; dependency
  /// cycles terminate rather than recurse forever.
  pub fn resolve_dependencies(&mut self) {
    let mut visiting = BTreeSet::new();
    for handle in self.queue.clone() {
      self.push_with_deps(&handle, &mut visiting);
    }
  }

  fn push_with_deps(&mut self, handle: &str, visiting: &mut BTreeSet<String>) {
    if !visiting.insert(handle.to_string()) {
      return;
    }
    if self.to_do.iter().any(|pending| pending == handle)
      || self.done.iter().any(|finished| finished == handle)
    {
      return;
    }
    let deps = match self.registered.get(handle) {
      Some(registration) => registration.deps.clone(),
      None => return,
    };
    for dep in deps {
      self.push_with_deps(&dep, visiting);
    }
    self.to_do.push(handle.to_string());
  }

  /// Dependency-ordered handles awaiting extraction.
  pub fn to_do(&self) -> &[String] {
    &self.to_do
  }

  /// Remove `handle` from the pending queues and record it as handled, so
  /// the host will not emit it itself.
  pub fn mark_done(&mut self, handle: &str) {
    self.queue.retain(|queued| queued != handle);
    self.to_do.retain(|pending| pending != handle);
    self.done.push(handle.to_string());
  }

  /// Handles already handled in this render cycle.
  pub fn done(&self) -> &[String] {
    &self.done
  }
}

/// Policy deciding whether a source reference is excluded from processing.
pub trait ExclusionPolicy {
  /// Returns `true` when scripts registered under `src` must be left to the host.
  fn is_excluded(&self, src: &str) -> bool;
}

/// Exclusion policy matching configured fragments against source references.
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
  fragments: Vec<String>,
}

impl ExclusionList {
  /// Build a policy from raw fragments, discarding blank entries.
  pub fn new(fragments: impl IntoIterator<Item = String>) -> Self {
    let fragments = fragments
      .into_iter()
      .map(|fragment| fragment.trim().to_string())
      .filter(|fragment| !fragment.is_empty())
      .collect();
    Self { fragments }
  }
}

impl ExclusionPolicy for ExclusionList {
  fn is_excluded(&self, src: &str) -> bool {
    self.fragments.iter().any(|fragment| src.contains(fragment))
  }
}
