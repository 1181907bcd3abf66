mod args;
mod build;
mod plan;

pub use args::BuildArgs;
pub use build::cmd_build;
pub use plan::cmd_plan;
