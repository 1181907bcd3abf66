//! The build pipeline.
//!
//! ```text
//! Validate -> ResolveImage -> EnsureImage -> PopulateCache -> Compose -> Execute
//! ```
//!
//! Stages run strictly in order and the first failure ends the run. Nothing
//! is rolled back: a pulled image or a cached archive stays for the next run.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CachedDependency, DepCache, Fetcher};
use crate::compose::{Invocation, compose, utf8};
use crate::config::{BuildConfig, BuildRequest};
use crate::error::{BuildError, PreconditionError, Stage, StageError};
use crate::image::{ResolvedImage, is_listed, resolve_image};
use crate::runtime::{ContainerRuntime, RuntimeError};

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  /// The image used; `available` is its state before any pull.
  pub image: ResolvedImage,
  pub pulled: bool,
  pub dependencies: Vec<CachedDependency>,
  pub invocation: Invocation,
  /// False for a plan, which never reaches the runtime.
  pub executed: bool,
}

/// Check the inputs that must exist before anything else happens.
pub fn validate(config: &BuildConfig) -> Result<(), PreconditionError> {
  if config.build_dir.as_os_str().is_empty() {
    return Err(PreconditionError::MissingBuildDir);
  }
  utf8(&config.build_dir)?;
  utf8(&config.repository)?;
  if let Some(module_path) = &config.module_path {
    utf8(module_path)?;
  }
  if !config.build_dir.is_dir() {
    return Err(PreconditionError::BuildDirNotFound(config.build_dir.clone()));
  }
  if !config.repository.is_dir() {
    return Err(PreconditionError::RepositoryNotFound(config.repository.clone()));
  }
  Ok(())
}

/// Validate, resolve and compose without touching the runtime or network.
pub fn plan(request: &BuildRequest, deps_cache: &Path) -> Result<BuildReport, StageError> {
  validate(&request.config).map_err(|e| StageError::new(Stage::Validate, e))?;

  let image = resolve_image(&request.image);
  debug!(image = %image, "resolved image");

  let invocation = compose(&image, &request.config, &request.options, deps_cache)
    .map_err(|e| StageError::new(Stage::Compose, e))?;

  Ok(BuildReport {
    image: ResolvedImage {
      id: image,
      available: false,
    },
    pulled: false,
    dependencies: Vec::new(),
    invocation,
    executed: false,
  })
}

/// Drives one build through a container runtime and a dependency cache.
pub struct Orchestrator<R, F> {
  runtime: R,
  cache: DepCache<F>,
}

impl<R: ContainerRuntime, F: Fetcher> Orchestrator<R, F> {
  pub fn new(runtime: R, cache: DepCache<F>) -> Self {
    Self { runtime, cache }
  }

  /// Run the full pipeline. Exactly one container invocation happens on success.
  pub fn run(&self, request: &BuildRequest) -> Result<BuildReport, StageError> {
    let config = &request.config;

    validate(config).map_err(|e| StageError::new(Stage::Validate, e))?;
    self
      .runtime
      .check()
      .map_err(|e| StageError::new(Stage::Validate, BuildError::Environment(e)))?;

    let id = resolve_image(&request.image);
    debug!(image = %id, "resolved image");

    let image = self.ensure_image(id)?;
    let pulled = !image.available;

    let dependencies = if config.dependencies.is_empty() {
      Vec::new()
    } else {
      self
        .cache
        .ensure_all(&config.dependencies)
        .map_err(|e| StageError::new(Stage::PopulateCache, e))?
    };

    let invocation = compose(&image.id, config, &request.options, self.cache.root())
      .map_err(|e| StageError::new(Stage::Compose, e))?;

    info!(repository = %config.repository.display(), "cross compiling");
    self
      .runtime
      .run(&invocation)
      .map_err(|e| StageError::new(Stage::Execute, BuildError::Execution(e)))?;

    Ok(BuildReport {
      image,
      pulled,
      dependencies,
      invocation,
      executed: true,
    })
  }

  /// Look the image up locally and pull it when absent.
  fn ensure_image(&self, id: String) -> Result<ResolvedImage, StageError> {
    let stage_err = |e: BuildError| StageError::new(Stage::EnsureImage, e);

    let listed = self.runtime.images().map_err(|e| stage_err(registry_or_environment(&id, e)))?;
    let available = is_listed(&id, &listed);

    if available {
      info!(image = %id, "docker image found");
    } else {
      info!(image = %id, "docker image not found locally");
      self.runtime.pull(&id).map_err(|source| {
        stage_err(BuildError::Registry {
          image: id.clone(),
          source,
        })
      })?;
    }

    Ok(ResolvedImage { id, available })
  }
}

/// An unreachable runtime is an environment problem; a failing one is a registry problem.
fn registry_or_environment(image: &str, err: RuntimeError) -> BuildError {
  if err.is_unreachable() {
    BuildError::Environment(err)
  } else {
    BuildError::Registry {
      image: image.to_string(),
      source: err,
    }
  }
}
