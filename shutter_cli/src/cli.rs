//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "shutterd", version, about = "Roller shutter simulator")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/shutter.toml")]
    pub config: PathBuf,

    /// Print updates and errors as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides logging.level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the shutter and accept host requests on stdin
    /// (`target <0-100>`, `pair`, `status`, `quit`)
    Run {
        /// Keep the target in memory only; nothing is read from or written to storage
        #[arg(long, action = ArgAction::SetTrue)]
        ephemeral: bool,
    },
    /// Move to a target with simulated time and report the commands sent
    Set {
        /// Target position in percent (0 = closed, 100 = open)
        #[arg(long)]
        target: f64,
    },
    /// Print the persisted target
    Status,
    /// Validate the config and probe the storage directory
    SelfCheck,
}

#[inline]
pub fn json_mode() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}
