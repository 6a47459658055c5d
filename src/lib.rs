#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod minify;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod resolver;

pub use cache::{CacheStore, FsCacheStore};
pub use config::BundlerConfig;
pub use error::PipelineError;
pub use minify::{FilterChain, JsMinFilter, MinifyFilter};
pub use models::Region;
pub use pipeline::merge::{ConcatMerge, MergeRegistry, MergeStrategy};
pub use pipeline::{RegionEmission, ScriptBundler};
pub use registry::{ExclusionList, ExclusionPolicy, ScriptRegistration, ScriptRegistry};
pub use resolver::PathResolver;
