//! `capabilities` command: report native client availability.

use std::sync::Arc;

use vmconsole_core::capability::{StaticCapabilities, WebSocketTransport, availability_report};

use crate::error::CliError;

/// Reports which native client capabilities this build wires up.
pub fn cmd_capabilities() -> Result<(), CliError> {
    // The CLI ships the WebSocket transport; a WebMKS/MKS client is only
    // available when an embedding application injects one.
    let provider =
        StaticCapabilities::none().with_vnc_transport(Arc::new(WebSocketTransport::new()));
    let report = availability_report(&provider);

    println!(
        "vnc websocket transport: {}",
        availability(report.vnc_transport)
    );
    println!("webmks/mks client:       {}", availability(report.mks_client));
    println!("html5 console:           available (no native client required)");

    Ok(())
}

const fn availability(present: bool) -> &'static str {
    if present { "available" } else { "missing" }
}
