//! Install command implementation
//!
//! Runs the install phase for a unit and persists the recovery state next to
//! the unit (or under `-statedir`). With `--commit` the command behaves like
//! a one-shot installer: a successful install is committed immediately, and a
//! failed install is rolled back from the state file it just wrote.

use console::Style;

use crate::cli::{Cli, InstallArgs};
use crate::error::Result;
use crate::progress::PhaseProgress;
use crate::units::builtin_registry;

pub fn run(cli: &Cli, args: &InstallArgs) -> Result<()> {
    let registry = builtin_registry();
    let mut unit = super::unit_installer(cli, &args.params);

    let progress = PhaseProgress::start(&format!("Installing unit '{}'", unit.unit_name()));
    let result = unit.install(&registry);

    if let Err(err) = result {
        progress.abandon(&format!("Install of unit '{}' failed", unit.unit_name()));
        unit.context().log_error(&err);
        if args.commit {
            // the failed walk still recorded how far it got, so the state
            // file is there to drive the rollback
            println!(
                "{}",
                Style::new()
                    .yellow()
                    .apply_to("Rolling back the partial install")
            );
            if let Err(rollback_err) = unit.rollback(&registry) {
                unit.context()
                    .log_message(&format!("Warning: the rollback did not finish: {rollback_err}"));
            }
        }
        unit.context().flush_log();
        return Err(err);
    }
    progress.finish(&format!("Install phase for unit '{}' complete", unit.unit_name()));

    if args.commit {
        if let Err(err) = unit.commit(&registry) {
            // the commit leaves the state file in place, so the staged
            // install can still be undone from it
            println!(
                "{}",
                Style::new()
                    .yellow()
                    .apply_to("Rolling back the staged install")
            );
            if let Err(rollback_err) = unit.rollback(&registry) {
                unit.context()
                    .log_message(&format!("Warning: the rollback did not finish: {rollback_err}"));
            }
            if !err.is_reported() {
                unit.context().log_error(&err);
            }
            unit.context().flush_log();
            return Err(err);
        }
        println!(
            "{}",
            Style::new()
                .green()
                .apply_to(format!("Installed and committed unit '{}'", unit.unit_name()))
        );
    } else {
        println!(
            "Recorded install state in '{}'",
            unit.state_path().display()
        );
        println!("Run 'stagehand commit' to finalize or 'stagehand rollback' to undo.");
    }

    Ok(())
}
