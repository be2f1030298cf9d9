//! Command-line interface definitions and the session flow.

mod args;
mod commands;

pub use args::Args;
pub use commands::{report_error, resolve_executable, run_session};
