//! Rollback command implementation
//!
//! Undoes a staged install in reverse order, then removes the recovery
//! state file.

use console::Style;

use crate::cli::{Cli, RollbackArgs};
use crate::error::Result;
use crate::units::builtin_registry;

pub fn run(cli: &Cli, args: &RollbackArgs) -> Result<()> {
    let registry = builtin_registry();
    let mut unit = super::unit_installer(cli, &args.params);

    let result = unit.rollback(&registry);
    super::log_unreported(&unit, result)?;

    println!(
        "{}",
        Style::new()
            .green()
            .apply_to(format!("Rolled back unit '{}'", unit.unit_name()))
    );
    println!("Removed the recorded install state.");
    Ok(())
}
