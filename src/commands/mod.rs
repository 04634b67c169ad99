//! Command implementations for the Stagehand CLI

pub mod check;
pub mod commit;
pub mod completions;
pub mod install;
pub mod rollback;
pub mod status;
pub mod uninstall;
pub mod version;

use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::Result;
use crate::unit::UnitInstaller;
use crate::units::BUILTIN_UNIT;

/// Builds the unit facade for one command invocation.
///
/// Global flags are folded into the parameter tokens after the command's own
/// parameters, so `--log-file` and `--verbose` win over `-logfile=` and
/// `-verbose` given on the parameter list.
pub(crate) fn unit_installer(cli: &Cli, params: &[String]) -> UnitInstaller {
    let unit = cli
        .unit
        .clone()
        .or_else(|| std::env::current_exe().ok())
        .unwrap_or_else(|| PathBuf::from(BUILTIN_UNIT));

    let mut tokens = params.to_vec();
    if let Some(log) = &cli.log_file {
        tokens.push(format!("-logfile={}", log.display()));
    }
    if cli.verbose {
        tokens.push("-verbose".to_string());
    }

    UnitInstaller::new(unit, &tokens)
}

/// Logs a phase error that no walk level has written to the log yet, then
/// hands the error back for the caller to surface.
pub(crate) fn log_unreported(unit: &UnitInstaller, result: Result<()>) -> Result<()> {
    if let Err(err) = &result {
        if !err.is_reported() {
            unit.context().log_error(err);
        }
        unit.context().flush_log();
    }
    result
}
