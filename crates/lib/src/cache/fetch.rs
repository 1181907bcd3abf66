//! Remote retrieval of dependency archives.

use std::io::Write;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
  /// The request could not be sent or the body could not be read.
  #[error("{0}")]
  Transport(String),

  /// The server answered with a non-success status.
  #[error("HTTP {0}")]
  Status(u16),
}

/// Retrieves the content behind a URL into a writer.
pub trait Fetcher {
  /// Stream the body of `url` into `dest`, returning the number of bytes written.
  fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, FetchError>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
  fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, FetchError> {
    (**self).fetch(url, dest)
  }
}

/// Blocking HTTP(S) GET.
///
/// No request timeout is applied; wall-clock limits belong to whoever
/// supervises the process.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: reqwest::blocking::Client,
}

impl HttpFetcher {
  pub fn new() -> Result<Self, FetchError> {
    let client = reqwest::blocking::Client::builder()
      .user_agent(concat!("xgo/", env!("CARGO_PKG_VERSION")))
      .timeout(None::<Duration>)
      .build()
      .map_err(|e| FetchError::Transport(e.to_string()))?;
    Ok(Self { client })
  }
}

impl Fetcher for HttpFetcher {
  fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, FetchError> {
    let mut response = self
      .client
      .get(url)
      .send()
      .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status(status.as_u16()));
    }

    let bytes = response
      .copy_to(dest)
      .map_err(|e| FetchError::Transport(e.to_string()))?;
    debug!(url = %url, bytes, "body received");
    Ok(bytes)
  }
}
