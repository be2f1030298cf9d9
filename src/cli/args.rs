//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

/// Interactive helper that removes GApps / microG from an attached device through adb
#[derive(Parser, Debug)]
#[command(name = "adb-toolbox")]
#[command(version, about = "Interactive adb maintenance helper", long_about = None)]
#[command(after_help = "The session is interactive: pick a device, then an action.
Answer `i` at any prompt for program info, or press Enter for the default.

ENVIRONMENT:
    TERM=dumb    Never wait for input, always take the default answer.
    RUST_LOG     Log filter (overrides --verbose).")]
pub struct Args {
    /// Path to the adb executable (default: search tools dir, then PATH)
    #[arg(long, value_name = "PATH")]
    pub adb: Option<PathBuf>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Show every adb command and its output
    #[arg(long, short)]
    pub verbose: bool,
}

impl Args {
    /// Default log filter for env_logger.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
