//! VNC-over-WebSocket adapter
//!
//! Dials an authenticated console proxy that bridges the WebSocket to the
//! VM's raw VNC port. The proxy is an external collaborator; this adapter
//! only consumes its URL contract.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;

use super::{ConsoleAdapter, REDACTED_TICKET};
use crate::capability::{ClientHandle, ClientRequest, RemoteClient};
use crate::error::{ConsoleError, ConsoleResult};
use crate::guard::EventSink;
use crate::models::{ConsoleKind, VncDetails};
use crate::target::{CanvasSurface, MountTargets};

/// Builds the console-proxy WebSocket URL for a VNC option
#[must_use]
pub fn build_vnc_proxy_url(details: &VncDetails) -> String {
    proxy_url_with_encoded_ticket(details, &urlencoding::encode(details.ticket.expose_secret()))
}

/// Builds the console-proxy URL with the ticket masked, for diagnostics
#[must_use]
pub fn build_vnc_proxy_url_redacted(details: &VncDetails) -> String {
    proxy_url_with_encoded_ticket(details, REDACTED_TICKET)
}

fn proxy_url_with_encoded_ticket(details: &VncDetails, encoded_ticket: &str) -> String {
    format!(
        "{}://{}:{}/ws/proxmox-console/{}/{}?ticket={}&vncPort={}",
        scheme(details),
        details.host,
        details.port,
        urlencoding::encode(&details.node),
        urlencoding::encode(&details.vm_id),
        encoded_ticket,
        details.vnc_port
    )
}

const fn scheme(details: &VncDetails) -> &'static str {
    if details.tls { "wss" } else { "ws" }
}

/// Adapter for VNC consoles reached through the WebSocket proxy
pub struct VncAdapter {
    details: VncDetails,
    transport: Arc<dyn RemoteClient>,
    connect_timeout: Duration,
    canvas: Option<Arc<dyn CanvasSurface>>,
    handle: Option<ClientHandle>,
}

impl VncAdapter {
    /// Creates the adapter from its connection details and transport
    #[must_use]
    pub fn new(
        details: VncDetails,
        transport: Arc<dyn RemoteClient>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            details,
            transport,
            connect_timeout,
            canvas: None,
            handle: None,
        }
    }
}

impl ConsoleAdapter for VncAdapter {
    fn kind(&self) -> ConsoleKind {
        ConsoleKind::Vnc
    }

    fn mount(&mut self, targets: &MountTargets) -> ConsoleResult<()> {
        if self.canvas.is_some() {
            tracing::debug!("vnc adapter already mounted");
            return Ok(());
        }
        let canvas = targets.canvas.clone();
        canvas.bind();
        self.canvas = Some(canvas);
        Ok(())
    }

    fn connect(&mut self, events: EventSink) -> ConsoleResult<()> {
        if self.canvas.is_none() {
            return Err(ConsoleError::HandshakeFailed(
                "vnc adapter is not mounted".to_string(),
            ));
        }

        let request = ClientRequest {
            kind: ConsoleKind::Vnc,
            url: build_vnc_proxy_url(&self.details),
            ssl_thumbprint: None,
            connect_timeout: self.connect_timeout,
        };

        tracing::info!(
            node = %self.details.node,
            vm_id = %self.details.vm_id,
            vnc_port = self.details.vnc_port,
            "starting vnc console attempt"
        );

        let transport = Arc::clone(&self.transport);
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();
        let task = tokio::spawn(async move {
            transport.run(request, events, stop_rx).await;
        });
        self.handle = Some(ClientHandle::new(stop_tx, task));
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.shutdown();
        }
        if let Some(canvas) = self.canvas.take() {
            canvas.release();
        }
    }
}

impl Drop for VncAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}
