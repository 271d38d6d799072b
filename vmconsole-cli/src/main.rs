//! `VmConsole` CLI - Command-line interface for the console orchestrator
//!
//! Provides commands for running headless console sessions from backend
//! descriptors, validating option lists, inspecting the connection URLs
//! an option list resolves to, and reporting native capability
//! availability.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use vmconsole_core::tracing::{TracingConfig, TracingLevel, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    if cli.verbose > 0 && !cli.quiet {
        let level = match cli.verbose {
            1 => TracingLevel::Info,
            2 => TracingLevel::Debug,
            _ => TracingLevel::Trace,
        };
        let _ = init_tracing(&TracingConfig::new().with_level(level));
    }

    let result = commands::dispatch(config_path, cli.command, cli.quiet);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
