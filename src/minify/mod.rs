//! Minification filter capabilities applied to merged script text.

mod jsmin;

pub use jsmin::JsMinFilter;

/// Capability transforming script text into a smaller equivalent.
///
/// Filters must be pure functions of their input: bundle filenames are
/// fingerprint-addressed, so two runs over identical sources must produce
/// identical artifacts.
pub trait MinifyFilter: Send + Sync {
  /// Stable name identifying the filter within a chain.
  fn name(&self) -> &str;

  /// Transform `source` into minified text.
  fn apply(&self, source: &str) -> String;
}

/// Ordered, name-keyed set of filters applied to bundle output.
#[derive(Default)]
pub struct FilterChain {
  filters: Vec<Box<dyn MinifyFilter>>,
}

impl FilterChain {
  /// Create an empty chain that passes text through unchanged.
  pub fn new() -> Self {
    Self::default()
  }

  /// Add `filter` to the chain, replacing any filter with the same name.
  pub fn set(&mut self, filter: Box<dyn MinifyFilter>) {
    if let Some(position) = self
      .filters
      .iter()
      .position(|existing| existing.name() == filter.name())
    {
      self.filters[position] = filter;
    } else {
      self.filters.push(filter);
    }
  }

  /// Run `source` through every filter in order.
  pub fn apply(&self, source: &str) -> String {
    self
      .filters
      .iter()
      .fold(source.to_string(), |text, filter| filter.apply(&text))
  }

  /// Returns `true` when no filter is registered.
  pub fn is_empty(&self) -> bool {
    self.filters.is_empty()
  }
}

impl std::fmt::Debug for FilterChain {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let names: Vec<&str> = self.filters.iter().map(|filter| filter.name()).collect();
    f.debug_struct("FilterChain").field("filters", &names).finish()
  }
}
