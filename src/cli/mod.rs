//! Command line interface for chesto_packager.
//!
//! Argument parsing, command dispatch and colored user feedback.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, RuntimeConfig};
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Runs already-parsed arguments and returns the process exit code
pub async fn run(args: Args) -> Result<i32> {
    execute_command(args).await
}

/// Parse arguments without exiting the process
pub fn parse_args() -> std::result::Result<Args, clap::Error> {
    Args::try_parse_args()
}

/// Prints a parse failure and returns the exit code to use.
///
/// Usage errors (e.g. a missing executable argument) exit with 1; `--help`
/// and `--version` print to stdout and exit with 0.
pub fn report_parse_error(err: &clap::Error) -> i32 {
    let _ = err.print();
    if err.use_stderr() { 1 } else { 0 }
}
