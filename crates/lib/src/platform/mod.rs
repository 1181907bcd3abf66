//! Host-side configuration: where things live on this machine.

pub mod paths;
