//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// `VmConsole` command-line interface for VM console sessions
#[derive(Parser)]
#[command(name = "vmconsole-cli")]
#[command(author, version, about = "VmConsole command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the orchestrator settings file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a headless console session from a backend descriptor
    #[command(about = "Open a console session and print status transitions")]
    Open {
        /// Descriptor JSON file ("-" or omitted reads stdin)
        file: Option<PathBuf>,
    },

    /// Validate a console descriptor
    #[command(about = "Validate a console descriptor without connecting")]
    Validate {
        /// Descriptor JSON file ("-" or omitted reads stdin)
        file: Option<PathBuf>,
    },

    /// Show the connection URL each option resolves to
    #[command(about = "Print per-option connection URLs (tickets redacted)")]
    Urls {
        /// Descriptor JSON file ("-" or omitted reads stdin)
        file: Option<PathBuf>,

        /// Print tickets instead of redacting them
        #[arg(long)]
        reveal: bool,
    },

    /// Report which native client capabilities are available
    #[command(about = "Report native capability availability")]
    Capabilities,

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
