//! xgo-lib: orchestration core for containerized Go cross compilation
//!
//! One run resolves the toolchain image, makes sure it is present locally,
//! fills the dependency archive cache, composes the container invocation and
//! executes it:
//! - `image`: which image to use
//! - `cache`: write-once store of dependency archives
//! - `compose`: environment, mounts and arguments of the container run
//! - `orchestrate`: the pipeline tying it together
//!
//! The container runtime and the network are reached only through the
//! [`runtime::ContainerRuntime`] and [`cache::Fetcher`] traits.

pub mod cache;
pub mod compose;
pub mod config;
pub mod consts;
pub mod error;
pub mod image;
pub mod orchestrate;
pub mod platform;
pub mod runtime;
pub mod util;

pub use config::{BuildConfig, BuildOptions, BuildRequest, ImageSelection};
pub use error::{BuildError, PreconditionError, Stage, StageError};
pub use orchestrate::{BuildReport, Orchestrator, plan};
