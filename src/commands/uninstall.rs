//! Uninstall command implementation
//!
//! Removes everything a unit installed, using the recorded state when one
//! exists and computed defaults when it does not. The walk is best-effort,
//! so a broken entry does not strand the rest of the unit on disk.

use console::Style;
use inquire::Confirm;

use crate::cli::{Cli, UninstallArgs};
use crate::error::Result;
use crate::progress::PhaseProgress;
use crate::units::builtin_registry;

pub fn run(cli: &Cli, args: &UninstallArgs) -> Result<()> {
    let registry = builtin_registry();
    let mut unit = super::unit_installer(cli, &args.params);

    if !args.yes && !confirm_uninstall(unit.unit_name())? {
        println!("Uninstall cancelled.");
        return Ok(());
    }

    let progress = PhaseProgress::start(&format!("Uninstalling unit '{}'", unit.unit_name()));
    let result = unit.uninstall(&registry);
    match &result {
        Ok(()) => progress.finish(&format!(
            "Uninstall phase for unit '{}' complete",
            unit.unit_name()
        )),
        Err(_) => progress.abandon(&format!("Uninstall of unit '{}' failed", unit.unit_name())),
    }
    super::log_unreported(&unit, result)?;

    println!(
        "{}",
        Style::new()
            .green()
            .apply_to(format!("Uninstalled unit '{}'", unit.unit_name()))
    );
    Ok(())
}

fn confirm_uninstall(name: &str) -> Result<bool> {
    println!("This removes everything unit '{name}' installed.");
    let confirmed = Confirm::new("Proceed with uninstall?")
        .with_default(true)
        .with_help_message("Press Enter to confirm, or 'n' to cancel")
        .prompt()?;
    Ok(confirmed)
}
