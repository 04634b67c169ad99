//! Status command implementation
//!
//! Reports whether a staged install is pending for the unit by inspecting
//! the recovery state file, without touching anything on disk.

use console::Style;

use crate::cli::{Cli, StatusArgs};
use crate::error::Result;
use crate::state::NodeState;
use crate::units::builtin_registry;

pub fn run(cli: &Cli, args: &StatusArgs) -> Result<()> {
    let registry = builtin_registry();
    let unit = super::unit_installer(cli, &args.params);
    let bold = Style::new().bold();

    if registry.is_registered(unit.unit_name()) {
        println!("{} {}", bold.apply_to("Unit:"), unit.unit_name());
    } else {
        println!(
            "{} {} (not registered)",
            bold.apply_to("Unit:"),
            unit.unit_name()
        );
        let known: Vec<&str> = registry.units().collect();
        println!("  known units: {}", known.join(", "));
    }
    println!(
        "{} {}",
        bold.apply_to("State file:"),
        unit.state_path().display()
    );
    match unit.context().log_path() {
        Some(path) => println!("{} {}", bold.apply_to("Log file:"), path.display()),
        None => println!("{} disabled", bold.apply_to("Log file:")),
    }
    println!();

    match unit.saved_state()? {
        None => println!("No recorded install state; nothing is pending."),
        Some(state) => describe_state(&state),
    }
    Ok(())
}

fn describe_state(state: &NodeState) {
    match state.last_attempted() {
        Some(last) => {
            println!("A staged install is pending commit or rollback.");
            println!("  last attempted child index: {last}");
        }
        None => println!("The recorded install carries no positioning marker."),
    }
    if let Some(count) = state.nested_len() {
        println!("  recorded child states: {count}");
    }
    let custom: Vec<&str> = state.custom_keys().collect();
    if !custom.is_empty() {
        println!("  unit fields: {}", custom.join(", "));
    }
}
