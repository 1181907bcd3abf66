//! Environment composition for a single container run.
//!
//! [`compose`] turns a resolved image, a [`BuildConfig`] and [`BuildOptions`]
//! into an ordered [`Invocation`]. Ordering is part of the output contract:
//! identical inputs and filesystem state yield an identical entry sequence.
//!
//! The composer only inspects the filesystem (module descriptor, vendor
//! directory); it never writes to it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::config::{BuildConfig, BuildOptions};
use crate::consts::{MODULE_DESCRIPTOR, TARGET_MATCH_ANY, TARGET_WILDCARD, VENDOR_DIR, env, mounts};
use crate::error::PreconditionError;

/// Host path bound into the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mount {
  pub host: PathBuf,
  pub container: String,
  pub read_only: bool,
}

impl Mount {
  /// The `host:container[:ro]` volume specification.
  ///
  /// Hosts composed by [`compose`] are valid UTF-8, so this is lossless for them.
  pub fn spec(&self) -> String {
    let mut spec = format!("{}:{}", self.host.display(), self.container);
    if self.read_only {
      spec.push_str(":ro");
    }
    spec
  }
}

/// One piece of a container run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
  Mount(Mount),
  Env { key: String, value: String },
  Arg { value: String },
}

/// Ordered description of one container run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Invocation {
  pub entries: Vec<Entry>,
}

impl Invocation {
  fn mount(&mut self, host: impl Into<PathBuf>, container: &str, read_only: bool) {
    self.entries.push(Entry::Mount(Mount {
      host: host.into(),
      container: container.to_string(),
      read_only,
    }));
  }

  fn env(&mut self, key: &str, value: impl Into<String>) {
    self.entries.push(Entry::Env {
      key: key.to_string(),
      value: value.into(),
    });
  }

  fn arg(&mut self, value: impl Into<String>) {
    self.entries.push(Entry::Arg { value: value.into() });
  }

  /// Value of the first environment entry named `key`.
  pub fn env_value(&self, key: &str) -> Option<&str> {
    self.entries.iter().find_map(|entry| match entry {
      Entry::Env { key: k, value } if k == key => Some(value.as_str()),
      _ => None,
    })
  }

  pub fn mounts(&self) -> impl Iterator<Item = &Mount> {
    self.entries.iter().filter_map(|entry| match entry {
      Entry::Mount(mount) => Some(mount),
      _ => None,
    })
  }

  /// Positional arguments: the image followed by the repository.
  pub fn positional(&self) -> Vec<&str> {
    self
      .entries
      .iter()
      .filter_map(|entry| match entry {
        Entry::Arg { value } => Some(value.as_str()),
        _ => None,
      })
      .collect()
  }

  /// Argument vector for the runtime binary: `run --rm -v .. -e .. <image> <repository>`.
  pub fn to_args(&self) -> Vec<String> {
    let mut args = vec!["run".to_string(), "--rm".to_string()];
    for entry in &self.entries {
      match entry {
        Entry::Mount(mount) => {
          args.push("-v".to_string());
          args.push(mount.spec());
        }
        Entry::Env { key, value } => {
          args.push("-e".to_string());
          args.push(format!("{}={}", key, value));
        }
        Entry::Arg { value } => args.push(value.clone()),
      }
    }
    args
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_args().join(" "))
  }
}

/// Join target selectors with spaces, replacing every wildcard with the match-any token.
pub fn target_selectors(targets: &[String]) -> String {
  targets.join(" ").replace(TARGET_WILDCARD, TARGET_MATCH_ANY)
}

/// Compose the invocation for one build.
///
/// Fails only when module mode is requested and `config.build_dir` holds no
/// module descriptor.
pub fn compose(
  image: &str,
  config: &BuildConfig,
  options: &BuildOptions,
  deps_cache: &Path,
) -> Result<Invocation, PreconditionError> {
  utf8(&config.build_dir)?;
  utf8(deps_cache)?;
  if let Some(module_path) = &config.module_path {
    utf8(module_path)?;
  }
  let repository = utf8(&config.repository)?;

  let mut inv = Invocation::default();

  inv.mount(&config.build_dir, mounts::BUILD_ROOT, false);
  inv.mount(deps_cache, mounts::DEPS_CACHE, true);

  inv.env(env::REPO_REMOTE, &config.remote);
  inv.env(env::REPO_BRANCH, &config.branch);
  inv.env(env::PACK, &config.sub_package);
  inv.env(env::DEPS, config.dependencies.join(" "));
  inv.env(env::ARGS, &config.dependency_args);
  inv.env(env::OUT, &config.output_prefix);
  inv.env(env::FLAG_V, options.verbose.to_string());
  inv.env(env::FLAG_X, options.steps.to_string());
  inv.env(env::FLAG_RACE, options.race.to_string());
  inv.env(env::FLAG_TAGS, &options.tags);
  inv.env(env::FLAG_LDFLAGS, &options.ldflags);
  inv.env(env::FLAG_BUILDMODE, &options.build_mode);
  inv.env(env::TARGETS, target_selectors(&config.targets));

  if let Some(proxy) = &config.module_proxy {
    inv.env(env::GOPROXY, proxy);
  }

  if let Some(module_path) = &config.module_path {
    inv.mount(module_path, mounts::MODULE_CACHE, false);
    inv.env(env::GOPATH, mounts::MODULE_CACHE);
  }

  if config.modules {
    let descriptor = config.build_dir.join(MODULE_DESCRIPTOR);
    if !descriptor.exists() {
      return Err(PreconditionError::ModuleDescriptorMissing(descriptor));
    }

    inv.env(env::GO111MODULE, "on");
    inv.mount(&config.build_dir, mounts::MODULE_SOURCE, false);
    info!("enabled go module support");

    if config.repository.join(VENDOR_DIR).is_dir() {
      inv.env(env::FLAG_MOD, "vendor");
      info!("using vendored go module dependencies");
    }
  }

  inv.arg(image);
  inv.arg(repository);

  Ok(inv)
}

/// Borrow `path` as text, rejecting anything that would be altered on the way to the runtime.
pub(crate) fn utf8(path: &Path) -> Result<&str, PreconditionError> {
  path.to_str().ok_or_else(|| PreconditionError::NonUtf8Path(path.to_path_buf()))
}
