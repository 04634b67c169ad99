//! Check command implementation
//!
//! Verifies that a unit resolves to at least one installable entry, runs the
//! unit's probe entry when it has one, and with `--describe` prints the
//! entries and the parameter help they expose.

use console::Style;

use crate::cli::{CheckArgs, Cli};
use crate::error::{Result, StagehandError};
use crate::registry::Registry;
use crate::state::NodeState;
use crate::unit::UnitInstaller;
use crate::units::builtin_registry;

pub fn run(cli: &Cli, args: &CheckArgs) -> Result<()> {
    let registry = builtin_registry();
    let mut unit = super::unit_installer(cli, &args.params);

    let count = unit.check_installable(&registry)?;
    let noun = if count == 1 { "entry" } else { "entries" };
    println!(
        "{}",
        Style::new().green().apply_to(format!(
            "Unit '{}' resolves to {count} installable {noun}",
            unit.unit_name()
        ))
    );

    run_probe(&unit, &registry)?;

    if args.describe {
        println!();
        println!("{}", Style::new().bold().apply_to("Entries:"));
        for entry in registry.entries(unit.unit_name())? {
            let marker = if entry.auto_run() { "auto" } else { "manual" };
            println!("  {} ({marker})", entry.name());
        }

        let help = unit.describe(&registry)?;
        if !help.is_empty() {
            println!();
            println!("{}", Style::new().bold().apply_to("Parameters:"));
            for line in help.lines() {
                println!("  {line}");
            }
        }
    }
    Ok(())
}

/// Runs the unit's manual probe entry when one is registered. Units without
/// a probe pass the check on entry count alone.
fn run_probe(unit: &UnitInstaller, registry: &Registry) -> Result<()> {
    let mut probe = match registry.construct_entry(unit.unit_name(), "probe") {
        Ok(probe) => probe,
        Err(StagehandError::DiscoveryFailed { .. }) => return Ok(()),
        Err(err) => return Err(err),
    };
    let mut scratch = NodeState::new();
    probe.install(unit.context(), &mut scratch)
}
