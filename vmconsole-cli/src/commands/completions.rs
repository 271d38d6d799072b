//! `completions` command: generate shell completion scripts.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::error::CliError;

/// Writes a completion script for the requested shell to stdout.
pub fn cmd_completions(shell: Shell) -> Result<(), CliError> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "vmconsole-cli", &mut std::io::stdout());
    Ok(())
}
