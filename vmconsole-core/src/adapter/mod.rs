//! Protocol adapters
//!
//! Each adapter wraps one remote-display mechanism behind a uniform
//! lifecycle contract: `mount` binds the adapter to a caller-owned
//! surface, `connect` starts the protocol handshake, `teardown` releases
//! the protocol resource. Teardown never fails toward the caller; internal
//! errors are logged.
//!
//! Adapters report lifecycle through exactly four events; the resource
//! guard folds them into attempt outcomes for the fallback driver.

mod html5;
mod mks;
mod vnc;
mod webmks;

use std::sync::Arc;

pub use html5::Html5Adapter;
pub use mks::{MksAdapter, build_mks_proxy_url, build_mks_proxy_url_redacted};
pub use vnc::{VncAdapter, build_vnc_proxy_url, build_vnc_proxy_url_redacted};
pub use webmks::{WebmksAdapter, build_webmks_url, build_webmks_url_redacted};

use crate::capability::CapabilityProvider;
use crate::config::OrchestratorConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::guard::EventSink;
use crate::models::{ConnectionDetails, ConsoleKind, ConsoleOption};
use crate::target::MountTargets;

/// Placeholder for tickets in redacted URLs
pub const REDACTED_TICKET: &str = "%3Credacted%3E";

/// Lifecycle events an adapter emits.
///
/// A `Disconnected` with `clean: true` that arrives after `Connected` is a
/// normal session end, not a failure. Everything else that ends an attempt
/// before `Connected` triggers fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    /// The console link is established
    Connected,
    /// The console link ended
    Disconnected {
        /// Human-readable cause
        reason: String,
        /// Whether the link closed in an orderly fashion
        clean: bool,
    },
    /// Authentication or TLS validation was rejected
    SecurityFailure(String),
    /// A protocol-level error occurred (handshake refused, frame load
    /// error, malformed traffic)
    ProtocolError(String),
}

/// Uniform lifecycle contract over one protocol's native client
pub trait ConsoleAdapter: Send {
    /// Returns the protocol kind this adapter speaks
    fn kind(&self) -> ConsoleKind;

    /// Binds the adapter to its caller-owned surface.
    ///
    /// Called once per adapter instance; a repeated call is a logged
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::HandshakeFailed`] if the surface cannot be
    /// bound.
    fn mount(&mut self, targets: &MountTargets) -> ConsoleResult<()>;

    /// Begins the protocol-specific handshake.
    ///
    /// Non-blocking: the outcome arrives as [`AdapterEvent`]s through
    /// `events`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::HandshakeFailed`] if the handshake cannot
    /// even be started (for example, the adapter was never mounted).
    fn connect(&mut self, events: EventSink) -> ConsoleResult<()>;

    /// Releases the protocol resource and the borrowed surface.
    ///
    /// Must never fail toward the caller.
    fn teardown(&mut self);
}

/// Builds the adapter for one console option, querying the capability
/// provider for the native client the option's protocol needs.
///
/// # Errors
///
/// Returns [`ConsoleError::CapabilityUnavailable`] when the required
/// native client is not supplied.
pub(crate) fn build(
    option: &ConsoleOption,
    capabilities: &Arc<dyn CapabilityProvider>,
    config: &OrchestratorConfig,
) -> ConsoleResult<Box<dyn ConsoleAdapter>> {
    match &option.details {
        ConnectionDetails::Vnc(details) => {
            let transport = capabilities.vnc_transport().ok_or_else(|| {
                ConsoleError::CapabilityUnavailable("VNC websocket transport".to_string())
            })?;
            Ok(Box::new(VncAdapter::new(
                details.clone(),
                transport,
                config.connect_timeout(),
            )))
        }
        ConnectionDetails::Webmks(details) => {
            let client = capabilities.mks_client().ok_or_else(|| {
                ConsoleError::CapabilityUnavailable("WebMKS client".to_string())
            })?;
            Ok(Box::new(WebmksAdapter::new(
                details.clone(),
                client,
                config.connect_timeout(),
            )))
        }
        ConnectionDetails::Mks(details) => {
            let client = capabilities.mks_client().ok_or_else(|| {
                ConsoleError::CapabilityUnavailable("MKS client".to_string())
            })?;
            Ok(Box::new(MksAdapter::new(
                details.clone(),
                client,
                config.connect_timeout(),
            )))
        }
        ConnectionDetails::Html5(details) => Ok(Box::new(Html5Adapter::new(
            details.clone(),
            config.neutral_frame_url.clone(),
        ))),
    }
}
