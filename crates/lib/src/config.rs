//! Build request types.
//!
//! A [`BuildRequest`] is assembled once at the process boundary and passed by
//! reference through the pipeline. Nothing in the core reads ambient state.

use std::path::PathBuf;

use serde::Serialize;

use crate::consts::{DEFAULT_BUILD_MODE, DEFAULT_GO_VERSION, DEFAULT_TARGETS};

/// What to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
  /// Source tree to build. Passed verbatim as the trailing positional argument.
  pub repository: PathBuf,
  /// Sub-package to build instead of the repository root.
  pub sub_package: String,
  pub remote: String,
  pub branch: String,
  /// Artifact naming prefix; empty means the build script derives it from the package name.
  pub output_prefix: String,
  /// Dependency archive URLs, in declaration order.
  pub dependencies: Vec<String>,
  /// Configure arguments forwarded to dependency builds inside the container.
  pub dependency_args: String,
  /// Host directory used as the module cache root.
  pub module_path: Option<PathBuf>,
  /// Module proxy forwarded to the toolchain.
  pub module_proxy: Option<String>,
  /// Module-aware building requested.
  pub modules: bool,
  /// Host directory mounted as the build root.
  pub build_dir: PathBuf,
  /// `os/arch` selectors; `*` matches anything.
  pub targets: Vec<String>,
}

impl BuildConfig {
  pub fn new(repository: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
    Self {
      repository: repository.into(),
      sub_package: String::new(),
      remote: String::new(),
      branch: String::new(),
      output_prefix: String::new(),
      dependencies: Vec::new(),
      dependency_args: String::new(),
      module_path: None,
      module_proxy: None,
      modules: false,
      build_dir: build_dir.into(),
      targets: parse_targets(DEFAULT_TARGETS),
    }
  }
}

/// How to build. Every field is forwarded verbatim to the toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
  pub verbose: bool,
  pub steps: bool,
  pub race: bool,
  pub tags: String,
  pub ldflags: String,
  pub build_mode: String,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      verbose: false,
      steps: false,
      race: false,
      tags: String::new(),
      ldflags: String::new(),
      build_mode: DEFAULT_BUILD_MODE.to_string(),
    }
  }
}

/// Image selection inputs for the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSelection {
  pub go_version: String,
  /// Explicit image, used as-is.
  pub image: Option<String>,
  /// Custom repository, combined with `go_version`.
  pub repo: Option<String>,
}

impl Default for ImageSelection {
  fn default() -> Self {
    Self {
      go_version: DEFAULT_GO_VERSION.to_string(),
      image: None,
      repo: None,
    }
  }
}

/// Everything one process run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRequest {
  pub image: ImageSelection,
  pub config: BuildConfig,
  pub options: BuildOptions,
}

/// Split a comma separated selector list, dropping empty items.
pub fn parse_targets(list: &str) -> Vec<String> {
  list
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
    .collect()
}

/// Split a whitespace separated dependency list.
pub fn parse_dependencies(list: &str) -> Vec<String> {
  list.split_whitespace().map(str::to_string).collect()
}

/// Treat an empty flag value as "not given".
pub fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}
