//! Implementation of a full `xgo` run.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use xgo_lib::cache::{CacheOutcome, DepCache, HttpFetcher};
use xgo_lib::platform::paths::deps_cache_dir;
use xgo_lib::runtime::DockerCli;
use xgo_lib::{BuildReport, Orchestrator};

use super::BuildArgs;
use crate::output::{OutputFormat, format_bytes, print_info, print_json, print_stat, print_success};

/// Execute the build.
///
/// The orchestrator validates inputs, checks the docker binary located here,
/// pulls the image if missing, caches dependency archives and runs the
/// container once.
pub fn cmd_build(args: BuildArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let request = args.into_request();

  if !output.is_json() {
    print_info(&format!("Starting xgo v{}", env!("CARGO_PKG_VERSION")));
  }

  let mut runtime = DockerCli::locate();
  if output.is_json() {
    runtime = runtime.stdout_to_stderr();
  }

  let fetcher = HttpFetcher::new().context("Failed to initialise HTTP client")?;
  let cache = DepCache::new(deps_cache_dir(), fetcher);

  let report = Orchestrator::new(runtime, cache).run(&request)?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_summary(&report, start.elapsed());
  }

  Ok(())
}

fn print_summary(report: &BuildReport, elapsed: Duration) {
  let downloaded: Vec<u64> = report
    .dependencies
    .iter()
    .filter_map(|dep| match dep.outcome {
      CacheOutcome::Fetched { bytes } => Some(bytes),
      CacheOutcome::Hit => None,
    })
    .collect();

  println!();
  print_success("Cross compilation complete!");

  let image_state = if report.pulled { "pulled" } else { "local" };
  print_stat("Image", &format!("{} ({})", report.image.id, image_state));
  print_stat(
    "Dependencies",
    &format!(
      "{} ({} downloaded, {})",
      report.dependencies.len(),
      downloaded.len(),
      format_bytes(downloaded.iter().sum())
    ),
  );
  print_stat(
    "Duration",
    &humantime::format_duration(Duration::from_millis(elapsed.as_millis() as u64)).to_string(),
  );
}
