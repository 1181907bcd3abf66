//! Docker CLI implementation of [`ContainerRuntime`].

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::{ContainerRuntime, RuntimeError};
use crate::compose::Invocation;
use crate::platform::paths::runtime_program;

/// Drives the `docker` binary as a child process.
#[derive(Debug, Clone)]
pub struct DockerCli {
  /// Binary path, or why it could not be located.
  program: Result<PathBuf, String>,
  stdout_to_stderr: bool,
}

impl DockerCli {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: Ok(program.into()),
      stdout_to_stderr: false,
    }
  }

  /// Locate the runtime binary (`XGO_DOCKER`, then `PATH`).
  ///
  /// A failed lookup is reported by the first runtime call, so input
  /// validation still runs before it.
  pub fn locate() -> Self {
    let program = match runtime_program() {
      Ok(path) => Ok(path),
      Err(RuntimeError::NotFound(reason)) => Err(reason),
      Err(other) => Err(other.to_string()),
    };
    Self {
      program,
      stdout_to_stderr: false,
    }
  }

  /// Send the stdout of `pull` and `run` to our stderr, keeping our own
  /// stdout free for machine readable output.
  pub fn stdout_to_stderr(mut self) -> Self {
    self.stdout_to_stderr = true;
    self
  }

  fn command(&self, args: &[String]) -> Result<(Command, String), RuntimeError> {
    let program = self
      .program
      .as_ref()
      .map_err(|reason| RuntimeError::NotFound(reason.clone()))?;
    let mut command = Command::new(program);
    command.args(args);
    let display = format!("{} {}", program.display(), args.join(" "));
    Ok((command, display))
  }

  /// Run with output captured; returns stdout.
  fn capture(&self, args: &[String]) -> Result<String, RuntimeError> {
    let (mut command, cmd) = self.command(args)?;
    debug!(cmd = %cmd, "running");

    let output = command
      .stdin(Stdio::null())
      .output()
      .map_err(|source| RuntimeError::Spawn { cmd: cmd.clone(), source })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if !stderr.is_empty() {
        debug!(stderr = %stderr.trim(), "runtime stderr");
      }
      return Err(RuntimeError::Status {
        cmd,
        code: output.status.code(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }

  /// Run with output passed through to the terminal.
  fn stream(&self, args: &[String]) -> Result<(), RuntimeError> {
    let (mut command, cmd) = self.command(args)?;
    debug!(cmd = %cmd, "running");

    let stdout = if self.stdout_to_stderr {
      Stdio::from(std::io::stderr())
    } else {
      Stdio::inherit()
    };

    let status = command
      .stdout(stdout)
      .stderr(Stdio::inherit())
      .status()
      .map_err(|source| RuntimeError::Spawn { cmd: cmd.clone(), source })?;

    if !status.success() {
      return Err(RuntimeError::Status {
        cmd,
        code: status.code(),
      });
    }
    Ok(())
  }
}

fn owned(args: &[&str]) -> Vec<String> {
  args.iter().map(|a| a.to_string()).collect()
}

/// Parse `repository:tag` lines, skipping dangling images.
fn parse_image_list(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty() && !line.contains("<none>"))
    .map(str::to_string)
    .collect()
}

impl ContainerRuntime for DockerCli {
  fn check(&self) -> Result<(), RuntimeError> {
    info!("checking docker installation");
    let version = self.capture(&owned(&["version", "--format", "{{.Server.Version}}"]))?;
    debug!(server = %version.trim(), "docker server reachable");
    Ok(())
  }

  fn images(&self) -> Result<Vec<String>, RuntimeError> {
    let stdout = self.capture(&owned(&["images", "--no-trunc", "--format", "{{.Repository}}:{{.Tag}}"]))?;
    Ok(parse_image_list(&stdout))
  }

  fn pull(&self, image: &str) -> Result<(), RuntimeError> {
    info!(image = %image, "pulling image from registry");
    self.stream(&owned(&["pull", image]))
  }

  fn run(&self, invocation: &Invocation) -> Result<(), RuntimeError> {
    info!(cmd = %invocation, "docker");
    self.stream(&invocation.to_args())
  }
}
