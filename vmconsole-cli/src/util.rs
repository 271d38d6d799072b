//! Shared helpers for CLI commands.

use std::io::Read;
use std::path::Path;

use vmconsole_core::config::OrchestratorConfig;
use vmconsole_core::models::VmConsoleDescriptor;

use crate::error::CliError;

/// Loads a console descriptor from a file, or stdin when the path is
/// omitted or `-`.
pub fn load_descriptor(path: Option<&Path>) -> Result<VmConsoleDescriptor, CliError> {
    let raw = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    VmConsoleDescriptor::from_json(&raw).map_err(|e| CliError::Descriptor(e.to_string()))
}

/// Loads orchestrator settings from the given path, falling back to
/// defaults when no path is provided.
pub fn load_settings(path: Option<&Path>) -> Result<OrchestratorConfig, CliError> {
    match path {
        Some(path) => OrchestratorConfig::load(path).map_err(|e| CliError::Config(e.to_string())),
        None => Ok(OrchestratorConfig::default()),
    }
}
