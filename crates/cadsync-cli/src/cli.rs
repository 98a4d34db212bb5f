//! CLI argument parsing using clap derive

use std::path::PathBuf;

use cadsync_meta::ConflictPolicy;
use clap::{Parser, Subcommand};

/// cadsync - Keep a YAML project file and a CAD drawing in sync
#[derive(Parser, Debug)]
#[command(name = "cadsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project file
    #[arg(short, long, global = true, default_value = "cadsync.yaml", env = "CADSYNC_PROJECT")]
    pub project: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile the project file and the drawing
    ///
    /// Writes the drawing first, then the project file.
    ///
    /// Examples:
    ///   cadsync sync                              # Sync cadsync.yaml
    ///   cadsync sync --dry-run                    # Report without writing
    ///   cadsync sync --conflict-policy yaml_wins  # Project file wins conflicts
    Sync {
        /// Run the pass without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// How to resolve entities changed on both sides (yaml_wins, drawing_wins, skip)
        #[arg(long, value_parser = parse_policy)]
        conflict_policy: Option<ConflictPolicy>,

        /// Do not propose entries for untracked drawing entities
        #[arg(long)]
        no_discovery: bool,
    },

    /// Show what sync would do, without writing
    Status {
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a starter project file
    Init {
        /// Drawing path written into the new project file
        #[arg(short, long, default_value = "drawing.dxf")]
        drawing: String,
    },
}

fn parse_policy(value: &str) -> Result<ConflictPolicy, String> {
    value.parse().map_err(|e: cadsync_meta::Error| e.to_string())
}
