//! CLI argument definitions using clap
//!
//! Commands:
//! - shapeguard check --schema <path> [--input <path>] [--config <path>] [--strict] [--root-key <key>]
//! - shapeguard inspect --schema <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// shapeguard - Validate JSON documents against declared shapes
#[derive(Parser, Debug)]
#[command(name = "shapeguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a JSON document against a schema definition
    Check {
        /// Path to schema definition file
        #[arg(long)]
        schema: PathBuf,

        /// Path to the document (reads stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to an options file ({"strict": .., "root_key": ..})
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reject keys the schema does not declare
        #[arg(long)]
        strict: bool,

        /// Prefix for reported key paths
        #[arg(long)]
        root_key: Option<String>,
    },

    /// List the fields declared by a schema definition
    Inspect {
        /// Path to schema definition file
        #[arg(long)]
        schema: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
