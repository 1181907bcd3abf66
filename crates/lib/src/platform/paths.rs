use std::path::PathBuf;

use crate::consts::{DEPS_CACHE_DIR, env};
use crate::runtime::RuntimeError;

const DEFAULT_RUNTIME: &str = "docker";

/// Returns the dependency cache root
///
/// `XGO_DEPS_CACHE` takes precedence over `<tmp>/xgo-cache`.
pub fn deps_cache_dir() -> PathBuf {
  if let Some(path) = std::env::var_os(env::XGO_DEPS_CACHE).filter(|p| !p.is_empty()) {
    return PathBuf::from(path);
  }
  std::env::temp_dir().join(DEPS_CACHE_DIR)
}

/// Returns the container runtime binary
///
/// `XGO_DOCKER` takes precedence over a `PATH` lookup of `docker`.
pub fn runtime_program() -> Result<PathBuf, RuntimeError> {
  if let Some(path) = std::env::var_os(env::XGO_DOCKER).filter(|p| !p.is_empty()) {
    return Ok(PathBuf::from(path));
  }
  which::which(DEFAULT_RUNTIME).map_err(|e| RuntimeError::NotFound(format!("{}: {}", DEFAULT_RUNTIME, e)))
}
