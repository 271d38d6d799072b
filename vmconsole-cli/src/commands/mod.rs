//! Command handler modules for the CLI.

mod capabilities;
mod completions;
mod open;
mod urls;
mod validate;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands, quiet: bool) -> Result<(), CliError> {
    match command {
        Commands::Open { file } => open::cmd_open(config_path, file.as_deref(), quiet),
        Commands::Validate { file } => validate::cmd_validate(file.as_deref(), quiet),
        Commands::Urls { file, reveal } => urls::cmd_urls(file.as_deref(), reveal),
        Commands::Capabilities => capabilities::cmd_capabilities(),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
