//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stand-in for the docker binary.
///
/// Appends its arguments to `$XGO_TEST_LOG` and answers the subcommands the
/// pipeline uses. `run` prints a progress line on stdout, like the in-container
/// build script does, and exits with `$XGO_TEST_RUN_EXIT` (default 0).
const FAKE_DOCKER: &str = r#"#!/bin/sh
echo "$@" >> "$XGO_TEST_LOG"
case "$1" in
  version) echo "24.0.7" ;;
  images) echo "crazymax/xgo:1.21" ;;
  pull) exit 0 ;;
  run)
    echo "building linux/amd64"
    exit ${XGO_TEST_RUN_EXIT:-0}
    ;;
esac
"#;

/// Isolated test environment.
///
/// Each test gets its own repository, build directory, dependency cache and
/// fake docker binary.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    for dir in ["repo", "build", "bin"] {
      std::fs::create_dir_all(temp.path().join(dir)).unwrap();
    }

    let docker = temp.path().join("bin").join("docker");
    std::fs::write(&docker, FAKE_DOCKER).unwrap();
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      std::fs::set_permissions(&docker, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    Self { temp }
  }

  fn canonical(&self, name: &str) -> PathBuf {
    let p = self.temp.path().join(name);
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn repo_path(&self) -> PathBuf {
    self.canonical("repo")
  }

  pub fn build_path(&self) -> PathBuf {
    self.canonical("build")
  }

  /// Dependency cache root. Not created up front.
  pub fn cache_path(&self) -> PathBuf {
    self.temp.path().join("xgo-cache")
  }

  pub fn log_path(&self) -> PathBuf {
    self.temp.path().join("docker.log")
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Every recorded docker invocation, one per line.
  pub fn docker_calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.log_path())
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  /// Command with isolated cache, docker binary and log.
  pub fn xgo_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("xgo");
    cmd
      .env("XGO_DEPS_CACHE", self.cache_path())
      .env("XGO_DOCKER", self.temp.path().join("bin").join("docker"))
      .env("XGO_TEST_LOG", self.log_path())
      .env_remove("XGO_TEST_RUN_EXIT")
      .env_remove("RUST_LOG");
    cmd
  }

  /// Command preloaded with `--build-dir` and the repository argument.
  pub fn build_cmd(&self) -> Command {
    let mut cmd = self.xgo_cmd();
    cmd.arg("--build-dir").arg(self.build_path()).arg(self.repo_path());
    cmd
  }
}

pub fn display(path: &Path) -> String {
  path.display().to_string()
}
