//! Sync and status command implementations

use std::path::Path;

use colored::{ColoredString, Colorize};

use cadsync_core::{Outcome, SyncEngine, SyncOptions, SyncReport};
use cadsync_fs::NormalizedPath;

use crate::error::{CliError, Result};

fn engine_for(project: &Path) -> Result<SyncEngine> {
    let path = NormalizedPath::new(project);
    if !path.is_file() {
        return Err(CliError::user(format!(
            "no project file at {} (run `cadsync init` to create one)",
            path
        )));
    }
    Ok(SyncEngine::new(path))
}

/// Run the sync command
///
/// Entity-level failures are printed with the report and turn into a
/// non-zero exit after everything else was written.
pub fn run_sync(project: &Path, options: &SyncOptions, json: bool) -> Result<()> {
    let engine = engine_for(project)?;
    if !json {
        let verb = if options.dry_run { "Checking" } else { "Synchronizing" };
        println!("{} {} {}...", "=>".blue().bold(), verb, engine.project_path());
    }

    let report = engine.run(options)?;
    emit(&report, json)?;

    if report.has_failures() {
        return Err(CliError::user(format!(
            "{} entr{} could not be synchronized",
            report.errors.len(),
            if report.errors.len() == 1 { "y" } else { "ies" }
        )));
    }
    Ok(())
}

/// Run the status command
///
/// A dry run; never writes.
pub fn run_status(project: &Path, json: bool) -> Result<()> {
    let engine = engine_for(project)?;
    let report = engine.status()?;
    emit(&report, json)
}

fn emit(report: &SyncReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_report(report);
    }
    Ok(())
}

fn marker(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Created => "+".green(),
        Outcome::Pushed => ">".blue(),
        Outcome::Pulled => "<".cyan(),
        Outcome::Regenerated => "~".green(),
        Outcome::Deleted => "-".red(),
        Outcome::Unchanged => "=".dimmed(),
        Outcome::Skipped => ".".dimmed(),
        Outcome::Conflict => "!".yellow(),
        Outcome::Discovered => "?".magenta(),
        Outcome::Failed => "x".red(),
    }
}

fn print_report(report: &SyncReport) {
    for line in report
        .entities
        .iter()
        .filter(|l| l.outcome != Outcome::Unchanged)
    {
        let mut text = format!(
            "   {} {} {} {}",
            marker(line.outcome),
            line.kind.to_string().dimmed(),
            line.name.cyan(),
            line.outcome
        );
        if let Some(handle) = &line.handle {
            text.push_str(&format!(" [{}]", handle));
        }
        if let Some(detail) = &line.detail {
            text.push_str(&format!(": {}", detail.dimmed()));
        }
        println!("{}", text);
    }
    for error in &report.errors {
        println!(
            "   {} {} {}: {}",
            marker(Outcome::Failed),
            error.kind.to_string().dimmed(),
            error.name.cyan(),
            error.message
        );
    }

    let status = if report.has_failures() {
        "ERROR".red().bold()
    } else if report.has_conflicts() {
        "CONFLICT".yellow().bold()
    } else {
        "OK".green().bold()
    };
    let suffix = if report.dry_run { " (dry run)" } else { "" };
    println!("{} {}{}", status, report.summary_line(), suffix);
    if report.has_conflicts() {
        println!(
            "Run {} to resolve conflicts.",
            "cadsync sync --conflict-policy <yaml_wins|drawing_wins>".cyan()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadsync_test_utils::TestProject;

    const PROJECT: &str = "texts:\n  - name: Satzung\n    text: Satzung\n    position: [0, 0]\n";

    #[test]
    fn test_sync_writes_drawing_and_metadata() {
        let project = TestProject::with_body(PROJECT);

        let result = run_sync(project.project_path().as_ref(), &SyncOptions::default(), false);
        assert!(result.is_ok(), "run_sync failed: {:?}", result.err());

        project.assert_file_exists("plan.dxf");
        project.assert_file_contains("cadsync.yaml", "stable_id:");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let project = TestProject::with_body(PROJECT);
        let before = project.read_project();

        run_sync(project.project_path().as_ref(), &SyncOptions::dry_run(), true).unwrap();

        project.assert_file_not_exists("plan.dxf");
        assert_eq!(project.read_project(), before);
    }

    #[test]
    fn test_status_never_writes() {
        let project = TestProject::with_body(PROJECT);
        run_status(project.project_path().as_ref(), false).unwrap();
        project.assert_file_not_exists("plan.dxf");
    }

    #[test]
    fn test_missing_project_is_a_user_error() {
        let project = TestProject::new();
        let result = run_sync(project.project_path().as_ref(), &SyncOptions::default(), false);
        assert!(matches!(result, Err(CliError::User { .. })));
    }

    #[test]
    fn test_entry_failures_fail_the_command() {
        let project = TestProject::with_body("geometry_layers:\n  - name: Parcels\n    sync: pull\n");
        let result = run_sync(project.project_path().as_ref(), &SyncOptions::default(), false);
        assert!(matches!(result, Err(CliError::User { .. })));
    }
}
