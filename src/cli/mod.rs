//! CLI module for shapeguard
//!
//! Provides command-line interface for:
//! - check: Validate a document against a schema definition file
//! - inspect: List the fields a schema definition declares

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, inspect, load_options, run, run_command};
pub use errors::{CliError, CliResult};
pub use io::{read_input, write_error, write_response};
