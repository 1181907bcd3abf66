//! Error taxonomy for a build run.
//!
//! Every error is terminal. The orchestrator wraps the first failure in a
//! [`StageError`] naming the pipeline stage it came from.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::cache::CacheError;
use crate::runtime::RuntimeError;

/// A required input is missing or malformed.
#[derive(Debug, Error)]
pub enum PreconditionError {
  #[error("missing build dir")]
  MissingBuildDir,

  #[error("build dir '{0}' does not exist or is not a directory")]
  BuildDirNotFound(PathBuf),

  #[error("repository '{0}' does not exist or is not a directory")]
  RepositoryNotFound(PathBuf),

  #[error("module mode requested but no module descriptor found at '{0}'")]
  ModuleDescriptorMissing(PathBuf),

  /// Paths reach the runtime as text and cannot be passed through lossily.
  #[error("path is not valid UTF-8: '{}'", .0.display())]
  NonUtf8Path(PathBuf),
}

/// What went wrong, independent of where.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The container runtime is not installed or not functional.
  #[error("container runtime unusable: {0}")]
  Environment(#[source] RuntimeError),

  /// Listing or pulling the image failed.
  #[error("registry operation failed for '{image}': {source}")]
  Registry {
    image: String,
    #[source]
    source: RuntimeError,
  },

  #[error(transparent)]
  DependencyFetch(#[from] CacheError),

  #[error(transparent)]
  Precondition(#[from] PreconditionError),

  /// The build invocation itself failed.
  #[error("cross compilation failed: {0}")]
  Execution(#[source] RuntimeError),
}

/// Pipeline stages that can fail, in execution order.
///
/// Image resolution is pure string composition and has no failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  Validate,
  EnsureImage,
  PopulateCache,
  Compose,
  Execute,
}

impl Stage {
  pub fn as_str(self) -> &'static str {
    match self {
      Stage::Validate => "validate",
      Stage::EnsureImage => "ensure image",
      Stage::PopulateCache => "populate dependency cache",
      Stage::Compose => "compose invocation",
      Stage::Execute => "execute",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A [`BuildError`] attributed to the stage that produced it.
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct StageError {
  pub stage: Stage,
  #[source]
  pub error: BuildError,
}

impl StageError {
  pub fn new(stage: Stage, error: impl Into<BuildError>) -> Self {
    Self {
      stage,
      error: error.into(),
    }
  }
}
