//! Test doubles for the runtime and fetch capabilities.
//!
//! Both record every call so tests can assert on what the pipeline asked
//! for, without a container runtime or network.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

use crate::cache::{FetchError, Fetcher};
use crate::compose::Invocation;
use crate::runtime::{ContainerRuntime, RuntimeError};

enum Response {
  Body(Vec<u8>),
  Fail(FetchError),
}

/// Serves canned bodies per URL.
///
/// A configured failure writes half of a placeholder body before erroring,
/// like a connection dropped mid-transfer.
#[derive(Default)]
pub struct FakeFetcher {
  responses: HashMap<String, Response>,
  calls: RefCell<Vec<String>>,
}

impl FakeFetcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_body(mut self, url: &str, body: &[u8]) -> Self {
    self.responses.insert(url.to_string(), Response::Body(body.to_vec()));
    self
  }

  pub fn with_failure(mut self, url: &str, error: FetchError) -> Self {
    self.responses.insert(url.to_string(), Response::Fail(error));
    self
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.borrow().clone()
  }
}

impl Fetcher for FakeFetcher {
  fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, FetchError> {
    self.calls.borrow_mut().push(url.to_string());
    match self.responses.get(url) {
      Some(Response::Body(body)) => {
        dest.write_all(body).map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.len() as u64)
      }
      Some(Response::Fail(err)) => {
        let _ = dest.write_all(b"partial");
        Err(match err {
          FetchError::Status(code) => FetchError::Status(*code),
          FetchError::Transport(msg) => FetchError::Transport(msg.clone()),
        })
      }
      None => Err(FetchError::Status(404)),
    }
  }
}

/// One call made against [`FakeRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
  Check,
  Images,
  Pull(String),
  Run(Vec<String>),
}

/// Scriptable in-memory container runtime.
///
/// Starts with no local images and a healthy daemon.
#[derive(Default)]
pub struct FakeRuntime {
  images: Vec<String>,
  missing: bool,
  daemon_down: bool,
  pull_fails: bool,
  run_exit: Option<i32>,
  calls: RefCell<Vec<RuntimeCall>>,
}

impl FakeRuntime {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_images(mut self, images: &[&str]) -> Self {
    self.images = images.iter().map(|s| s.to_string()).collect();
    self
  }

  /// The runtime binary is not installed.
  pub fn missing(mut self) -> Self {
    self.missing = true;
    self
  }

  /// The binary exists but the daemon does not answer.
  pub fn daemon_down(mut self) -> Self {
    self.daemon_down = true;
    self
  }

  pub fn pull_fails(mut self) -> Self {
    self.pull_fails = true;
    self
  }

  pub fn run_exit(mut self, code: i32) -> Self {
    self.run_exit = Some(code);
    self
  }

  pub fn calls(&self) -> Vec<RuntimeCall> {
    self.calls.borrow().clone()
  }

  fn record(&self, call: RuntimeCall) {
    self.calls.borrow_mut().push(call);
  }

  fn reachable(&self, cmd: &str) -> Result<(), RuntimeError> {
    if self.missing {
      return Err(RuntimeError::NotFound("docker".to_string()));
    }
    if self.daemon_down {
      return Err(RuntimeError::Status {
        cmd: cmd.to_string(),
        code: Some(1),
      });
    }
    Ok(())
  }
}

impl ContainerRuntime for FakeRuntime {
  fn check(&self) -> Result<(), RuntimeError> {
    self.record(RuntimeCall::Check);
    self.reachable("docker version")
  }

  fn images(&self) -> Result<Vec<String>, RuntimeError> {
    self.record(RuntimeCall::Images);
    self.reachable("docker images")?;
    Ok(self.images.clone())
  }

  fn pull(&self, image: &str) -> Result<(), RuntimeError> {
    self.record(RuntimeCall::Pull(image.to_string()));
    if self.pull_fails {
      return Err(RuntimeError::Status {
        cmd: format!("docker pull {}", image),
        code: Some(1),
      });
    }
    Ok(())
  }

  fn run(&self, invocation: &Invocation) -> Result<(), RuntimeError> {
    self.record(RuntimeCall::Run(invocation.to_args()));
    match self.run_exit {
      Some(code) if code != 0 => Err(RuntimeError::Status {
        cmd: "docker run".to_string(),
        code: Some(code),
      }),
      _ => Ok(()),
    }
  }
}
