mod cmd;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xgo_lib::StageError;

use cmd::BuildArgs;
use output::{OutputFormat, print_error};

/// xgo - cross compile Go packages inside a toolchain container
#[derive(Parser)]
#[command(name = "xgo")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(flatten)]
  build: BuildArgs,

  /// Print the container invocation instead of running it
  #[arg(long)]
  dry_run: bool,

  /// Output format
  #[arg(short, long, value_enum, default_value_t)]
  output: OutputFormat,
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  let cli = Cli::parse();

  let result = if cli.dry_run {
    cmd::cmd_plan(cli.build, cli.output)
  } else {
    cmd::cmd_build(cli.build, cli.output)
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&render(&err));
      ExitCode::FAILURE
    }
  }
}

/// Pipeline errors already carry their cause chain in their message.
fn render(err: &anyhow::Error) -> String {
  match err.downcast_ref::<StageError>() {
    Some(stage) => stage.to_string(),
    None => format!("{:#}", err),
  }
}
