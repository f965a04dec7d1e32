pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use interfaces::cli::{run, run_cli, Cli, RunStatus};
