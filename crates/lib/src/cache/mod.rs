//! Dependency archive cache.
//!
//! Archives are stored flat under the cache root, keyed by the last path
//! segment of their URL. An existing file is trusted as-is: there is no
//! checksum, no re-validation and no eviction.
//!
//! # Layout
//!
//! ```text
//! <cache root>/
//!   gmp-6.1.0.tar.bz2
//!   openssl-1.1.1w.tar.gz
//! ```
//!
//! Downloads land in a temporary file inside the cache root and are renamed
//! into place once the body has been written completely, so an interrupted
//! download never occupies a cache key.

mod fetch;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

pub use fetch::{FetchError, Fetcher, HttpFetcher};

#[derive(Debug, Error)]
pub enum CacheError {
  #[error("failed to create dependency cache '{path}': {source}")]
  CreateRoot {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("dependency URL has no file name: '{0}'")]
  InvalidUrl(String),

  #[error("failed to create dependency file in '{path}': {source}")]
  CreateFile {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to retrieve dependency '{url}': {source}")]
  Fetch {
    url: String,
    #[source]
    source: FetchError,
  },

  #[error("failed to store dependency at '{path}': {source}")]
  Persist {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// How an entry was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheOutcome {
  Hit,
  Fetched { bytes: u64 },
}

/// A dependency archive present in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedDependency {
  pub url: String,
  pub path: PathBuf,
  pub outcome: CacheOutcome,
}

/// Derive the cache file name from a URL.
///
/// Query string and fragment are ignored; trailing slashes are stripped
/// before taking the last segment.
pub fn file_name(url: &str) -> Option<&str> {
  let path = url.split(['?', '#']).next().unwrap_or(url);
  let name = path.trim_end_matches('/').rsplit('/').next()?;

  if name.is_empty() || name == "." || name == ".." || name.ends_with(':') {
    return None;
  }
  Some(name)
}

/// Write-once-per-key store of dependency archives.
pub struct DepCache<F> {
  root: PathBuf,
  fetcher: F,
}

impl<F: Fetcher> DepCache<F> {
  pub fn new(root: impl Into<PathBuf>, fetcher: F) -> Self {
    Self {
      root: root.into(),
      fetcher,
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Local path `url` is cached at, whether or not it exists yet.
  pub fn path_for(&self, url: &str) -> Result<PathBuf, CacheError> {
    let name = file_name(url).ok_or_else(|| CacheError::InvalidUrl(url.to_string()))?;
    Ok(self.root.join(name))
  }

  /// Return the cached path for `url`, downloading it first if absent.
  pub fn ensure(&self, url: &str) -> Result<CachedDependency, CacheError> {
    let path = self.path_for(url)?;

    if path.exists() {
      info!(path = %path.display(), "dependency already cached");
      return Ok(CachedDependency {
        url: url.to_string(),
        path,
        outcome: CacheOutcome::Hit,
      });
    }

    info!(url = %url, "downloading new dependency");
    self.create_root()?;

    let mut tmp = NamedTempFile::new_in(&self.root).map_err(|source| CacheError::CreateFile {
      path: self.root.clone(),
      source,
    })?;

    let bytes = self
      .fetcher
      .fetch(url, &mut tmp)
      .map_err(|source| CacheError::Fetch {
        url: url.to_string(),
        source,
      })?;

    tmp
      .flush()
      .and_then(|()| publish_permissions(tmp.as_file()))
      .map_err(|source| CacheError::Persist {
        path: path.clone(),
        source,
      })?;

    tmp.persist(&path).map_err(|e| CacheError::Persist {
      path: path.clone(),
      source: e.error,
    })?;

    info!(path = %path.display(), bytes, "new dependency cached");
    Ok(CachedDependency {
      url: url.to_string(),
      path,
      outcome: CacheOutcome::Fetched { bytes },
    })
  }

  /// Ensure every URL in order. The first failure aborts.
  pub fn ensure_all<S: AsRef<str>>(&self, urls: &[S]) -> Result<Vec<CachedDependency>, CacheError> {
    urls.iter().map(|url| self.ensure(url.as_ref())).collect()
  }

  fn create_root(&self) -> Result<(), CacheError> {
    if self.root.is_dir() {
      return Ok(());
    }
    create_dir(&self.root).map_err(|source| CacheError::CreateRoot {
      path: self.root.clone(),
      source,
    })
  }
}

#[cfg(unix)]
fn create_dir(path: &Path) -> io::Result<()> {
  use std::os::unix::fs::DirBuilderExt;
  fs::DirBuilder::new().recursive(true).mode(0o751).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> io::Result<()> {
  fs::create_dir_all(path)
}

/// Temp files are created owner-only; cached archives must be readable
/// from inside the container.
#[cfg(unix)]
fn publish_permissions(file: &fs::File) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;
  file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn publish_permissions(_file: &fs::File) -> io::Result<()> {
  Ok(())
}
