//! IO module - configuration and ensemble output.

mod config;

pub use config::{RunConfig, read_run_config, write_ensemble};
