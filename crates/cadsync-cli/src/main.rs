//! cadsync CLI
//!
//! Command-line front end of the sync engine.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cadsync_core::SyncOptions;
use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(&cli.project, cmd),
        None => {
            println!("{} keeps a project file and its drawing in sync", "cadsync".green().bold());
            println!();
            println!("Run {} for available commands.", "cadsync --help".cyan());
            Ok(())
        }
    }
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: bool) {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(verbose);
    let result = if verbose {
        tracing::subscriber::set_global_default(builder.with_max_level(Level::DEBUG).finish())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())
    };
    if result.is_err() {
        eprintln!("{}: logging already initialized", "warning".yellow());
    }
    tracing::debug!("verbose mode enabled");
}

fn execute_command(project: &std::path::Path, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync {
            dry_run,
            json,
            conflict_policy,
            no_discovery,
        } => {
            let options = SyncOptions {
                dry_run,
                conflict_policy,
                no_discovery,
            };
            commands::run_sync(project, &options, json)
        }
        Commands::Status { json } => commands::run_status(project, json),
        Commands::Init { drawing } => commands::run_init(project, &drawing),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_cli_error_user() {
        let error = crate::error::CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }
}
