//! Names shared with the in-container build script.
//!
//! Mount points and environment variable names are a stable contract consumed
//! by the cross-compilation image and must not change.

/// Image repository used when neither a custom image nor a custom repository is given.
pub const DEFAULT_DIST: &str = "crazymax/xgo";

/// Toolchain release used when none is requested.
pub const DEFAULT_GO_VERSION: &str = "latest";

/// Target selector list used when none is requested (every os, every arch).
pub const DEFAULT_TARGETS: &str = "*/*";

pub const DEFAULT_BUILD_MODE: &str = "default";

/// Module descriptor looked up in the build directory when module mode is requested.
pub const MODULE_DESCRIPTOR: &str = "go.mod";

pub const VENDOR_DIR: &str = "vendor";

/// Name of the dependency cache directory under the system temp dir.
pub const DEPS_CACHE_DIR: &str = "xgo-cache";

pub mod mounts {
  pub const BUILD_ROOT: &str = "/build";
  pub const DEPS_CACHE: &str = "/deps-cache";
  pub const MODULE_CACHE: &str = "/cache";
  pub const MODULE_SOURCE: &str = "/source";
}

pub mod env {
  pub const REPO_REMOTE: &str = "REPO_REMOTE";
  pub const REPO_BRANCH: &str = "REPO_BRANCH";
  pub const PACK: &str = "PACK";
  pub const DEPS: &str = "DEPS";
  pub const ARGS: &str = "ARGS";
  pub const OUT: &str = "OUT";
  pub const FLAG_V: &str = "FLAG_V";
  pub const FLAG_X: &str = "FLAG_X";
  pub const FLAG_RACE: &str = "FLAG_RACE";
  pub const FLAG_TAGS: &str = "FLAG_TAGS";
  pub const FLAG_LDFLAGS: &str = "FLAG_LDFLAGS";
  pub const FLAG_BUILDMODE: &str = "FLAG_BUILDMODE";
  pub const FLAG_MOD: &str = "FLAG_MOD";
  pub const TARGETS: &str = "TARGETS";
  pub const GOPROXY: &str = "GOPROXY";
  pub const GOPATH: &str = "GOPATH";
  pub const GO111MODULE: &str = "GO111MODULE";

  /// Host-side override for the dependency cache root.
  pub const XGO_DEPS_CACHE: &str = "XGO_DEPS_CACHE";
  /// Host-side override for the container runtime binary.
  pub const XGO_DOCKER: &str = "XGO_DOCKER";
}

/// Toolchain wildcard marker and the match-any form the build script expects.
pub const TARGET_WILDCARD: char = '*';
pub const TARGET_MATCH_ANY: &str = ".";
