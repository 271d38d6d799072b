//! `open` command: run a headless console session from a descriptor.

use std::path::Path;
use std::sync::Arc;

use vmconsole_core::capability::{CapabilityProvider, StaticCapabilities, WebSocketTransport};
use vmconsole_core::session::{ConsoleSession, SessionStatus};
use vmconsole_core::target::MountTargets;

use crate::error::CliError;
use crate::util;

/// Opens a console session over every option the descriptor carries and
/// prints status transitions until the session terminates.
pub fn cmd_open(
    config_path: Option<&Path>,
    file: Option<&Path>,
    quiet: bool,
) -> Result<(), CliError> {
    let descriptor = util::load_descriptor(file)?;
    let settings = util::load_settings(config_path)?;

    if !quiet {
        println!(
            "opening console for '{}' ({} option(s))",
            descriptor.vm_name,
            descriptor.console_options.len()
        );
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let capabilities: Arc<dyn CapabilityProvider> = Arc::new(
            StaticCapabilities::none().with_vnc_transport(Arc::new(WebSocketTransport::new())),
        );

        let mut session = ConsoleSession::open(
            descriptor.vm_name,
            descriptor.console_options,
            MountTargets::headless(),
            capabilities,
            settings,
        )
        .map_err(|e| CliError::Descriptor(e.to_string()))?;

        let mut updates = session
            .take_updates()
            .ok_or_else(|| CliError::Console("status stream unavailable".to_string()))?;

        loop {
            tokio::select! {
                update = updates.recv() => {
                    let Some(status) = update else { break };
                    if !quiet {
                        println!("{status}");
                    }
                    match status {
                        SessionStatus::Exhausted(reason) => {
                            return Err(CliError::Connection(reason));
                        }
                        SessionStatus::Closed => break,
                        _ => {}
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    if !quiet {
                        eprintln!("closing console session");
                    }
                    session.close();
                }
            }
        }

        Ok(())
    })
}
