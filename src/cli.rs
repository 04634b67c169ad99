//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stagehand - transactional installer host
///
/// Stages, commits, rolls back and strikes the installable units a program
/// registers for itself.
#[derive(Parser, Debug)]
#[command(
    name = "stagehand",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Transactional install/uninstall engine for service-style programs",
    long_about = "Stagehand walks a program's registered installable units through a \
                  four-phase transaction (install, commit, rollback, uninstall), recording \
                  enough state on disk after the install phase to finish or undo the work \
                  later, even from another process.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  stagehand install -prefix=/opt/demo\n    \
                  stagehand install --commit -prefix=/opt/demo\n    \
                  stagehand commit\n    \
                  stagehand rollback\n    \
                  stagehand uninstall -y\n    \
                  stagehand status\n\n\
                  \x1b[1m\x1b[32mParameters:\x1b[0m\n    \
                  Trailing -name or -name=value tokens become installer parameters,\n    \
                  e.g. -prefix=/opt/demo -statedir=/var/lib/demo -logtoconsole=false\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/stagehand-rs/stagehand"
)]
pub struct Cli {
    /// Unit to operate on (defaults to the current executable)
    #[arg(long, short = 'u', global = true)]
    pub unit: Option<PathBuf>,

    /// Install log location (defaults to the unit path with a .log extension)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output (logged error chains include debug detail)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the install phase and record recovery state
    Install(InstallArgs),

    /// Commit a recorded install
    Commit(CommitArgs),

    /// Roll back a recorded install
    Rollback(RollbackArgs),

    /// Uninstall the unit's entries
    Uninstall(UninstallArgs),

    /// Summarize the recorded install state
    Status(StatusArgs),

    /// Verify that the unit has installable entries
    Check(CheckArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Stage an install and keep it pending:\n    stagehand install -prefix=/opt/demo\n\n\
                  Stage and commit in one step (rolls back on failure):\n    stagehand install --commit -prefix=/opt/demo\n\n\
                  Relocate the recovery file:\n    stagehand install -prefix=/opt/demo -statedir=/var/lib/demo\n\n\
                  Keep the console quiet:\n    stagehand install -logtoconsole=false")]
pub struct InstallArgs {
    /// Commit immediately after a successful install; roll back on failure
    #[arg(long)]
    pub commit: bool,

    /// Installer parameters (-name or -name=value)
    #[arg(value_name = "PARAM", num_args = 0.., allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Arguments for the commit command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Commit the pending install:\n    stagehand commit\n\n\
                  Commit with a relocated recovery file:\n    stagehand commit -statedir=/var/lib/demo")]
pub struct CommitArgs {
    /// Installer parameters (-name or -name=value)
    #[arg(value_name = "PARAM", num_args = 0.., allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Arguments for the rollback command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Undo the pending install:\n    stagehand rollback\n\n\
                  Roll back with a relocated recovery file:\n    stagehand rollback -statedir=/var/lib/demo")]
pub struct RollbackArgs {
    /// Installer parameters (-name or -name=value)
    #[arg(value_name = "PARAM", num_args = 0.., allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall with confirmation:\n    stagehand uninstall\n\n\
                  Uninstall without confirmation:\n    stagehand uninstall -y\n\n\
                  Uninstall when no install was ever recorded:\n    stagehand uninstall -y -prefix=/opt/demo")]
pub struct UninstallArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Installer parameters (-name or -name=value)
    #[arg(value_name = "PARAM", num_args = 0.., allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Summarize the recorded install:\n    stagehand status\n\n\
                  Status with a relocated recovery file:\n    stagehand status -statedir=/var/lib/demo")]
pub struct StatusArgs {
    /// Installer parameters (-name or -name=value)
    #[arg(value_name = "PARAM", num_args = 0.., allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Verify the unit is installable:\n    stagehand check\n\n\
                  List every entry with its help text:\n    stagehand check --describe")]
pub struct CheckArgs {
    /// Print each installable entry with its help text
    #[arg(long)]
    pub describe: bool,

    /// Installer parameters (-name or -name=value)
    #[arg(value_name = "PARAM", num_args = 0.., allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    stagehand completions --shell bash > ~/.bash_completion.d/stagehand\n\n\
                  Generate zsh completions:\n    stagehand completions --shell zsh > ~/.zfunc/_stagehand\n\n\
                  Generate fish completions:\n    stagehand completions --shell fish > ~/.config/fish/completions/stagehand.fish\n\n\
                  Generate PowerShell completions:\n    stagehand completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
