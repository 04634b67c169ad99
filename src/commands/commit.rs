//! Commit command implementation
//!
//! Finalizes a staged install from the recovery state the install phase
//! wrote. The state file itself is left untouched so a later uninstall can
//! still replay the recorded tree.

use console::Style;

use crate::cli::{Cli, CommitArgs};
use crate::error::Result;
use crate::units::builtin_registry;

pub fn run(cli: &Cli, args: &CommitArgs) -> Result<()> {
    let registry = builtin_registry();
    let mut unit = super::unit_installer(cli, &args.params);

    let result = unit.commit(&registry);
    super::log_unreported(&unit, result)?;

    println!(
        "{}",
        Style::new()
            .green()
            .apply_to(format!("Committed unit '{}'", unit.unit_name()))
    );
    Ok(())
}
