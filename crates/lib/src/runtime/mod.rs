//! Container runtime capability.
//!
//! The orchestrator talks to the runtime only through [`ContainerRuntime`],
//! so tests can substitute a recording fake for the real [`DockerCli`].

mod docker;

use thiserror::Error;

use crate::compose::Invocation;

pub use docker::DockerCli;

#[derive(Debug, Error)]
pub enum RuntimeError {
  /// The runtime binary could not be located.
  #[error("container runtime binary not found: {0}")]
  NotFound(String),

  /// The runtime process could not be started.
  #[error("failed to run '{cmd}': {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// The runtime process exited unsuccessfully.
  #[error("'{cmd}' exited with code {code:?}")]
  Status { cmd: String, code: Option<i32> },
}

impl RuntimeError {
  /// True when the runtime could not be reached at all, as opposed to
  /// answering with a failure.
  pub fn is_unreachable(&self) -> bool {
    matches!(self, RuntimeError::NotFound(_) | RuntimeError::Spawn { .. })
  }
}

/// The operations the build pipeline needs from a container runtime.
pub trait ContainerRuntime {
  /// Verify the runtime is installed and its daemon answers.
  fn check(&self) -> Result<(), RuntimeError>;

  /// Identifiers (`repository:tag`) of locally stored images.
  fn images(&self) -> Result<Vec<String>, RuntimeError>;

  /// Pull an image from its registry. Blocks until done.
  fn pull(&self, image: &str) -> Result<(), RuntimeError>;

  /// Execute a composed invocation. Blocks until the container exits.
  fn run(&self, invocation: &Invocation) -> Result<(), RuntimeError>;
}

impl<T: ContainerRuntime + ?Sized> ContainerRuntime for &T {
  fn check(&self) -> Result<(), RuntimeError> {
    (**self).check()
  }

  fn images(&self) -> Result<Vec<String>, RuntimeError> {
    (**self).images()
  }

  fn pull(&self, image: &str) -> Result<(), RuntimeError> {
    (**self).pull(image)
  }

  fn run(&self, invocation: &Invocation) -> Result<(), RuntimeError> {
    (**self).run(invocation)
  }
}
