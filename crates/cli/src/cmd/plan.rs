//! Implementation of `xgo --dry-run`.

use anyhow::Result;

use xgo_lib::platform::paths::deps_cache_dir;
use xgo_lib::plan;

use super::BuildArgs;
use crate::output::{OutputFormat, print_command, print_json, print_stat};

/// Compose the container invocation and print it.
///
/// Neither the container runtime nor the network is touched, and the
/// dependency cache is left as it is.
pub fn cmd_plan(args: BuildArgs, output: OutputFormat) -> Result<()> {
  let request = args.into_request();
  let report = plan(&request, &deps_cache_dir())?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_stat("Image", &report.image.id);
    if !request.config.dependencies.is_empty() {
      print_stat("Dependencies", &request.config.dependencies.join(" "));
    }
    print_command("docker", &report.invocation.to_args());
  }

  Ok(())
}
