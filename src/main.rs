//! Stagehand - transactional installer host
//!
//! A platform-independent command line host that runs install units through
//! a four-phase transaction (install, commit, rollback, uninstall) with a
//! persisted recovery state, so a failed install can always be undone.

use clap::Parser;

mod cli;
mod commands;
mod context;
mod error;
mod installer;
mod logging;
mod progress;
mod registry;
mod state;
mod unit;
mod units;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Install(args) => commands::install::run(&cli, args),
        Commands::Commit(args) => commands::commit::run(&cli, args),
        Commands::Rollback(args) => commands::rollback::run(&cli, args),
        Commands::Uninstall(args) => commands::uninstall::run(&cli, args),
        Commands::Status(args) => commands::status::run(&cli, args),
        Commands::Check(args) => commands::check::run(&cli, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
