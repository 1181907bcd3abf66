//! Build flags and their translation into a [`BuildRequest`].
//!
//! Flag names follow the original `xgo` tool; the camel-case spellings are
//! accepted as aliases.

use std::path::PathBuf;

use clap::Args;
use xgo_lib::config::{non_empty, parse_dependencies, parse_targets};
use xgo_lib::consts::{DEFAULT_BUILD_MODE, DEFAULT_GO_VERSION, DEFAULT_TARGETS};
use xgo_lib::{BuildConfig, BuildOptions, BuildRequest, ImageSelection};

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Repository (source tree) to cross compile
  pub repository: PathBuf,

  /// Go release to use for cross compilation
  #[arg(long = "go", value_name = "VERSION", default_value = DEFAULT_GO_VERSION)]
  pub go_version: String,

  /// Sub-package to build if not root import
  #[arg(long)]
  pub pkg: Option<String>,

  /// Version control remote repository to build
  #[arg(long)]
  pub remote: Option<String>,

  /// Version control branch to build
  #[arg(long)]
  pub branch: Option<String>,

  /// Prefix to use for output naming (empty = package name)
  #[arg(long)]
  pub out: Option<String>,

  /// CGO dependencies (space separated configure/make based archive URLs)
  #[arg(long)]
  pub deps: Option<String>,

  /// CGO dependency configure arguments
  #[arg(long = "depsargs")]
  pub deps_args: Option<String>,

  /// Comma separated targets to build for
  #[arg(long, default_value = DEFAULT_TARGETS)]
  pub targets: String,

  /// Use custom docker repo instead of official distribution
  #[arg(long)]
  pub docker_repo: Option<String>,

  /// Use custom docker image instead of official distribution
  #[arg(long)]
  pub docker_image: Option<String>,

  /// Build with Go modules (requires go.mod in the build dir)
  #[arg(
    long = "mod",
    value_name = "BOOL",
    num_args = 0..=1,
    require_equals = true,
    default_value_t = false,
    default_missing_value = "true",
    action = clap::ArgAction::Set
  )]
  pub modules: bool,

  /// Directory mounted as the container build root
  #[arg(long, alias = "buildDir")]
  pub build_dir: Option<PathBuf>,

  /// Host directory used as the Go module cache
  #[arg(long, alias = "goPath")]
  pub go_path: Option<PathBuf>,

  /// Global proxy for Go modules
  #[arg(long)]
  pub goproxy: Option<String>,

  /// Print the names of packages as they are compiled
  #[arg(short, long)]
  pub verbose: bool,

  /// Print the command as executing the builds
  #[arg(short = 'x')]
  pub steps: bool,

  /// Enable data race detection (supported only on amd64)
  #[arg(long)]
  pub race: bool,

  /// List of build tags to consider satisfied during the build
  #[arg(long, allow_hyphen_values = true)]
  pub tags: Option<String>,

  /// Arguments to pass on each go tool link invocation
  #[arg(long, allow_hyphen_values = true)]
  pub ldflags: Option<String>,

  /// Indicates which kind of object file to build
  #[arg(long, default_value = DEFAULT_BUILD_MODE)]
  pub buildmode: String,
}

/// Bind mounts need absolute host paths.
fn absolute(path: PathBuf) -> PathBuf {
  dunce::canonicalize(&path).unwrap_or(path)
}

impl BuildArgs {
  pub fn into_request(self) -> BuildRequest {
    let mut config = BuildConfig::new(
      self.repository,
      self.build_dir.map(absolute).unwrap_or_default(),
    );
    config.sub_package = self.pkg.unwrap_or_default();
    config.remote = self.remote.unwrap_or_default();
    config.branch = self.branch.unwrap_or_default();
    config.output_prefix = self.out.unwrap_or_default();
    config.dependencies = self.deps.as_deref().map(parse_dependencies).unwrap_or_default();
    config.dependency_args = self.deps_args.unwrap_or_default();
    config.module_path = self.go_path.filter(|p| !p.as_os_str().is_empty()).map(absolute);
    config.module_proxy = non_empty(self.goproxy);
    config.modules = self.modules;
    config.targets = parse_targets(&self.targets);

    let options = BuildOptions {
      verbose: self.verbose,
      steps: self.steps,
      race: self.race,
      tags: self.tags.unwrap_or_default(),
      ldflags: self.ldflags.unwrap_or_default(),
      build_mode: self.buildmode,
    };

    let image = ImageSelection {
      go_version: self.go_version,
      image: non_empty(self.docker_image),
      repo: non_empty(self.docker_repo),
    };

    BuildRequest { image, config, options }
  }
}
